use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::{AppError, AppResult},
    models::Category,
    repository::RepoError,
    response::ApiResponse,
    state::AppState,
};

fn category_not_found(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::NotFound("Category not found".into()),
        other => other.into(),
    }
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<Vec<Category>>> {
    let items = state.categories.get_all().await?;
    Ok(ApiResponse::success("Categories", items))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = state.categories.get(id).await.map_err(category_not_found)?;
    Ok(ApiResponse::success("Category", category))
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let now = Utc::now();
    let category = Category {
        id: Uuid::new_v4(),
        name: payload.name,
        created_at: now,
        updated_at: now,
    };
    let category = state.categories.create(category).await?;
    tracing::info!(category_id = %category.id, "category created");
    Ok(ApiResponse::created("Category created", category))
}

pub async fn update_category(
    state: &AppState,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing = state
        .categories
        .get(payload.id)
        .await
        .map_err(category_not_found)?;

    let category = Category {
        name: payload.name,
        updated_at: Utc::now(),
        ..existing
    };
    let category = state
        .categories
        .update(category)
        .await
        .map_err(category_not_found)?;
    Ok(ApiResponse::success("Category updated", category))
}
