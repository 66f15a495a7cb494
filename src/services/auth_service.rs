use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    models::{Role, User},
    repository::RepoError,
    response::ApiResponse,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

async fn insert_user(state: &AppState, user: User) -> AppResult<User> {
    match state.users.get_by_email(&user.email).await {
        Ok(_) => return Err(AppError::Conflict("User already exist".into())),
        Err(RepoError::NotFound) => {}
        Err(err) => return Err(err.into()),
    }

    state.users.create(user).await.map_err(|err| match err {
        // Lost a race against a concurrent registration with the same email.
        RepoError::Conflict(_) => AppError::Conflict("User already exist".into()),
        other => other.into(),
    })
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        name,
        last_name,
        user_name,
        email,
        password,
    } = payload;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name,
        last_name,
        user_name,
        email,
        role: Role::User,
        password_hash: hash_password(&password)?,
        created_at: now,
        updated_at: now,
    };

    let user = insert_user(state, user).await?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::created("User created", user))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let user = match state.users.get_by_email(&email).await {
        Ok(user) => user,
        Err(RepoError::NotFound) => return Err(AppError::BadRequest(INVALID_CREDENTIALS.into())),
        Err(err) => return Err(err.into()),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let token = state.tokens.issue(&user.id.to_string(), user.role)?;
    tracing::debug!(user_id = %user.id, role = %user.role, "token issued");

    let resp = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.ttl().num_seconds(),
    };
    Ok(ApiResponse::success("Logged in", resp))
}

/// Creates the bootstrap administrator unless an account with `email` already exists.
/// Returns whether a new account was created.
pub async fn ensure_admin_account(
    state: &AppState,
    email: &str,
    password: &SecretString,
) -> AppResult<bool> {
    match state.users.get_by_email(email).await {
        Ok(existing) => {
            if existing.role != Role::Admin {
                tracing::warn!(email, "bootstrap admin email belongs to a non-admin account");
            }
            return Ok(false);
        }
        Err(RepoError::NotFound) => {}
        Err(err) => return Err(err.into()),
    }

    let now = Utc::now();
    let admin = User {
        id: Uuid::new_v4(),
        name: "Admin".to_string(),
        last_name: "Admin".to_string(),
        user_name: "admin".to_string(),
        email: email.to_string(),
        role: Role::Admin,
        password_hash: hash_password(password.expose_secret())?,
        created_at: now,
        updated_at: now,
    };

    let admin = insert_user(state, admin).await?;
    tracing::info!(user_id = %admin.id, email, "admin account seeded");
    Ok(true)
}
