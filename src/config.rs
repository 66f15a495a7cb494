use std::{env, time::Duration};

use secrecy::SecretString;

const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_PASSWORD: &str = "1234";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub stripe: StripeConfig,
    pub admin: AdminSeed,
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Checked on every payment request, so a missing key is not fatal at startup.
    pub api_key: Option<SecretString>,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: SecretString,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET can't be empty");
        }

        let stripe = StripeConfig {
            api_key: env::var("STRIPE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_string()),
            timeout: Duration::from_secs(
                env::var("PAYMENT_GATEWAY_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(30),
            ),
        };

        let admin = AdminSeed {
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
            password: SecretString::from(
                env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
            ),
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret: SecretString::from(jwt_secret),
            stripe,
            admin,
        })
    }
}
