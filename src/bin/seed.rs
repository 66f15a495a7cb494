use std::sync::Arc;

use chrono::Utc;
use storefront_api::{
    config::AppConfig,
    db::{MIGRATIONS_DIR, create_orm_conn, run_migrations},
    models::{Category, Product},
    repository::{CategoryRepository, ProductRepository, SeaOrmStore},
    services::{
        auth_service::ensure_admin_account, payment_gateway::StripeGateway,
        token_service::TokenService,
    },
    state::AppState,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm, MIGRATIONS_DIR).await?;
    let store = Arc::new(SeaOrmStore::new(orm));

    let state = AppState::new(
        store.clone(),
        TokenService::new(&config.jwt_secret)?,
        Arc::new(StripeGateway::new(&config.stripe)?),
    );
    if ensure_admin_account(&state, &config.admin.email, &config.admin.password).await? {
        println!("Created admin {}", config.admin.email);
    }

    seed_catalogue(store.as_ref()).await?;
    println!("Seed completed");
    Ok(())
}

async fn seed_catalogue(store: &SeaOrmStore) -> anyhow::Result<()> {
    let catalogue = [
        (
            "Books",
            vec![("Go Book", 20.0, 5), ("Async Rust", 32.5, 40)],
        ),
        (
            "Merch",
            vec![("Ferris Mug", 12.0, 100), ("Rust Sticker Pack", 4.99, 200)],
        ),
    ];

    let existing: Vec<String> = CategoryRepository::get_all(store)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    for (category_name, products) in catalogue {
        if existing.iter().any(|name| name == category_name) {
            println!("Category {category_name} already present, skipping");
            continue;
        }

        let now = Utc::now();
        let category = CategoryRepository::create(
            store,
            Category {
                id: Uuid::new_v4(),
                name: category_name.to_string(),
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        for (name, price, stock) in products {
            ProductRepository::create(
                store,
                Product {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    image_url: None,
                    price,
                    stock,
                    category_id: category.id,
                    created_at: now,
                    updated_at: now,
                },
            )
            .await?;
        }
        println!("Seeded category {category_name}");
    }

    Ok(())
}
