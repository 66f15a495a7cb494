//! Payment provider seam.
//!
//! `PaymentGateway` is what the payment processor talks to; `StripeGateway`
//! implements it against the Stripe PaymentIntents API.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::StripeConfig;

pub const PAYMENT_CURRENCY: &str = "usd";
pub const TEST_PAYMENT_METHOD: &str = "pm_card_visa";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway API key is not configured")]
    MissingApiKey,

    #[error("invalid charge amount {0}")]
    InvalidAmount(f64),

    #[error("payment gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("payment rejected by gateway ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// A single immediate charge. Built by [`ChargeRequest::immediate`] with the
/// store's fixed currency and test payment method.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub amount: f64,
    pub currency: &'static str,
    pub payment_method: &'static str,
    pub confirm: bool,
}

impl ChargeRequest {
    pub fn immediate(amount: f64) -> Self {
        Self {
            amount,
            currency: PAYMENT_CURRENCY,
            payment_method: TEST_PAYMENT_METHOD,
            confirm: true,
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Whether credentials are present. Checked before any order is charged.
    fn is_configured(&self) -> bool {
        true
    }

    /// Charges the request and returns the gateway-assigned transaction id.
    async fn charge(&self, request: &ChargeRequest) -> Result<String, GatewayError>;
}

#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    code: Option<String>,
}

impl StripeGateway {
    pub fn new(config: &StripeConfig) -> Result<Self, GatewayError> {
        Self::with_timeout(config.api_base.clone(), config.api_key.clone(), config.timeout)
    }

    pub fn with_timeout(
        api_base: String,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn charge(&self, request: &ChargeRequest) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_ref().ok_or(GatewayError::MissingApiKey)?;
        let amount = to_minor_units(request.amount)?;

        let url = format!("{}/v1/payment_intents", self.api_base);
        let params = [
            ("amount", amount.to_string()),
            ("currency", request.currency.to_string()),
            ("payment_method", request.payment_method.to_string()),
            ("confirm", request.confirm.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("automatic_payment_methods[allow_redirects]", "never".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<StripeErrorResponse>().await {
                Ok(body) => {
                    let code = body.error.code.unwrap_or_default();
                    let message = body.error.message.unwrap_or_else(|| "unknown error".into());
                    if code.is_empty() {
                        message
                    } else {
                        format!("{code}: {message}")
                    }
                }
                Err(_) => "unreadable error body".to_string(),
            };
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntentResponse = response.json().await?;
        tracing::debug!(intent_id = %intent.id, intent_status = %intent.status, "payment intent created");
        Ok(intent.id)
    }
}

/// Stripe amounts are integers in the currency's smallest unit.
fn to_minor_units(amount: f64) -> Result<i64, GatewayError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(GatewayError::InvalidAmount(amount));
    }
    let cents = (amount * 100.0).round();
    if cents > i64::MAX as f64 {
        return Err(GatewayError::InvalidAmount(amount));
    }
    Ok(cents as i64)
}
