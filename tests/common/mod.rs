#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use secrecy::SecretString;
use serde_json::{Value, json};
use storefront_api::{
    models::{Category, Product, Role, User},
    repository::{CategoryRepository, InMemoryStore, ProductRepository, UserRepository},
    routes::app,
    services::{
        auth_service::ensure_admin_account,
        payment_gateway::{ChargeRequest, GatewayError, PaymentGateway},
        token_service::TokenService,
    },
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "1234";

pub fn token_service() -> TokenService {
    TokenService::new(&SecretString::from(JWT_SECRET.to_string())).expect("token service")
}

/// Gateway double that answers every charge the same way and records what it was asked.
pub struct ScriptedGateway {
    configured: bool,
    delay: Duration,
    outcome: Result<String, String>,
    calls: Mutex<Vec<ChargeRequest>>,
}

impl ScriptedGateway {
    pub fn approving(transaction_id: &str) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            delay: Duration::ZERO,
            outcome: Ok(transaction_id.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn declining(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            delay: Duration::ZERO,
            outcome: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            configured: false,
            delay: Duration::ZERO,
            outcome: Err("no api key".to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Approves every charge, but only after `delay`, like a slow provider.
    pub fn approving_after(transaction_id: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            delay,
            outcome: Ok(transaction_id.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ChargeRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn charge(&self, request: &ChargeRequest) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            Ok(id) => Ok(id.clone()),
            Err(message) => Err(GatewayError::Rejected {
                status: 402,
                message: message.clone(),
            }),
        }
    }
}

pub fn test_state(gateway: Arc<dyn PaymentGateway>) -> (Arc<InMemoryStore>, AppState) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(store.clone(), token_service(), gateway);
    (store, state)
}

/// State plus router with the bootstrap admin already seeded.
pub async fn test_app(
    gateway: Arc<dyn PaymentGateway>,
) -> (Arc<InMemoryStore>, AppState, Router) {
    let (store, state) = test_state(gateway);
    ensure_admin_account(&state, ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD.to_string()))
        .await
        .expect("seed admin");
    let router = app(state.clone());
    (store, state, router)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "name": "Ada",
            "last_name": "Lovelace",
            "user_name": email.split('@').next().unwrap_or("user"),
            "email": email,
            "password": password,
        })),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

pub async fn register_and_login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = register(app, email, password).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    login(app, email, password).await
}

pub async fn admin_token(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

pub async fn seed_category(store: &InMemoryStore, name: &str) -> Category {
    let now = Utc::now();
    CategoryRepository::create(
        store,
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("category")
}

pub async fn seed_product(
    store: &InMemoryStore,
    category_id: Uuid,
    name: &str,
    price: f64,
) -> Product {
    let now = Utc::now();
    ProductRepository::create(
        store,
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            image_url: None,
            price,
            stock: 10,
            category_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("product")
}

/// Inserts a buyer directly, bypassing registration.
pub async fn seed_user(store: &InMemoryStore, email: &str) -> User {
    let now = Utc::now();
    UserRepository::create(
        store,
        User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            last_name: "Buyer".to_string(),
            user_name: "buyer".to_string(),
            email: email.to_string(),
            role: Role::User,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("user")
}
