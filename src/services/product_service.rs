use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::{AppError, AppResult},
    models::Product,
    repository::RepoError,
    response::ApiResponse,
    state::AppState,
};

fn product_not_found(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::NotFound("Product not found".into()),
        other => other.into(),
    }
}

async fn ensure_category(state: &AppState, category_id: Uuid) -> AppResult<()> {
    match state.categories.get(category_id).await {
        Ok(_) => Ok(()),
        Err(RepoError::NotFound) => Err(AppError::BadRequest("Invalid category id".into())),
        Err(err) => Err(err.into()),
    }
}

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<Vec<Product>>> {
    let items = state.products.get_all().await?;
    Ok(ApiResponse::success("Products", items))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = state.products.get(id).await.map_err(product_not_found)?;
    Ok(ApiResponse::success("Product", product))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_category(state, payload.category_id).await?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        name: payload.name,
        image_url: payload.image_url,
        price: payload.price,
        stock: payload.stock,
        category_id: payload.category_id,
        created_at: now,
        updated_at: now,
    };
    let product = state.products.create(product).await.map_err(|err| match err {
        RepoError::Conflict(_) => AppError::BadRequest("Invalid category id".into()),
        other => other.into(),
    })?;

    tracing::info!(product_id = %product.id, category_id = %product.category_id, "product created");
    Ok(ApiResponse::created("Product created", product))
}

pub async fn update_product(
    state: &AppState,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = state
        .products
        .get(payload.id)
        .await
        .map_err(product_not_found)?;
    ensure_category(state, payload.category_id).await?;

    let product = Product {
        name: payload.name,
        image_url: payload.image_url,
        price: payload.price,
        stock: payload.stock,
        category_id: payload.category_id,
        updated_at: Utc::now(),
        ..existing
    };
    let product = state.products.update(product).await.map_err(|err| match err {
        RepoError::NotFound => AppError::NotFound("Product not found".into()),
        RepoError::Conflict(_) => AppError::BadRequest("Invalid category id".into()),
        other => other.into(),
    })?;
    Ok(ApiResponse::success("Product updated", product))
}

pub async fn delete_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.products.delete(id).await.map_err(|err| match err {
        RepoError::NotFound => AppError::NotFound("Product not found".into()),
        RepoError::Conflict(_) => {
            AppError::Conflict("Product is referenced by existing orders".into())
        }
        other => other.into(),
    })?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(ApiResponse::empty(
        axum::http::StatusCode::OK,
        "Product deleted",
    ))
}
