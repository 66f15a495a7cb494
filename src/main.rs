use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::{
    config::AppConfig,
    db::{MIGRATIONS_DIR, create_orm_conn, run_migrations},
    repository::SeaOrmStore,
    routes::app,
    services::{
        auth_service::ensure_admin_account, payment_gateway::StripeGateway,
        token_service::TokenService,
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm, MIGRATIONS_DIR).await?;

    let tokens = TokenService::new(&config.jwt_secret)?;
    let gateway = StripeGateway::new(&config.stripe)?;
    if config.stripe.api_key.is_none() {
        tracing::warn!("STRIPE_API_KEY is not set; payments will fail");
    }

    let state = AppState::new(Arc::new(SeaOrmStore::new(orm)), tokens, Arc::new(gateway));
    if ensure_admin_account(&state, &config.admin.email, &config.admin.password).await? {
        tracing::info!(email = %config.admin.email, "created bootstrap admin");
    }

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app(state)).await?;

    Ok(())
}
