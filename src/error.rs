use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{
    middleware::auth::AuthError,
    repository::RepoError,
    response::ApiResponse,
    services::{payment_gateway::GatewayError, token_service::TokenError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Bad token")]
    InvalidToken,

    #[error("Check permission")]
    Forbidden,

    #[error("You have no permission to perform this action")]
    PermissionDenied,

    #[error("{0}")]
    NotFound(String),

    #[error("Product with id {0} not found")]
    ProductNotFound(Uuid),

    #[error("{0}")]
    Conflict(String),

    #[error("Repository error")]
    Repository(#[from] RepoError),

    #[error("Payment gateway error")]
    Gateway(#[from] GatewayError),

    #[error("Token error")]
    Token(#[from] TokenError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::InvalidToken
            | AppError::PermissionDenied
            | AppError::NotFound(_)
            | AppError::ProductNotFound(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated | AppError::Forbidden => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Repository(_)
            | AppError::Gateway(_)
            | AppError::Token(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients. Server-side failures never leak their source.
    fn public_message(&self) -> String {
        match self {
            AppError::Repository(_) | AppError::Token(_) => "Internal Server Error".to_string(),
            AppError::Gateway(_) => "Error while processing payment".to_string(),
            AppError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => AppError::Unauthenticated,
            AuthError::InvalidToken => AppError::InvalidToken,
            AuthError::Forbidden => AppError::Forbidden,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        AppError::Validation(fields)
    }
}

fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    let message = match &err.message {
                        Some(message) => message.to_string(),
                        None => default_field_message(&err.code),
                    };
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn default_field_message(code: &str) -> String {
    match code {
        "required" | "length" => "This field required".to_string(),
        "email" => "Invalid email".to_string(),
        "url" => "Invalid url".to_string(),
        "range" => "Value out of range".to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        let data = match &self {
            AppError::Validation(fields) => Some(serde_json::json!({ "errors": fields })),
            _ => None,
        };

        let body = ApiResponse {
            status_code: status.as_u16(),
            message: self.public_message(),
            data,
        };

        body.into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
