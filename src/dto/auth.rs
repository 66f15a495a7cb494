use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "This field required"))]
    pub name: String,
    #[validate(length(min = 1, message = "This field required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "This field required"))]
    pub user_name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "This field required"))]
    pub password: String,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "This field required"))]
    pub email: String,
    #[validate(length(min = 1, message = "This field required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Lifetime of the token in seconds.
    pub expires_in: i64,
}
