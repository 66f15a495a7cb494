use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::reviews::{CreateReviewRequest, UpdateReviewRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Review,
    repository::RepoError,
    response::ApiResponse,
    state::AppState,
};

fn review_not_found(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::NotFound("Review not found".into()),
        other => other.into(),
    }
}

async fn ensure_product(state: &AppState, product_id: Uuid) -> AppResult<()> {
    match state.products.get(product_id).await {
        Ok(_) => Ok(()),
        Err(RepoError::NotFound) => Err(AppError::ProductNotFound(product_id)),
        Err(err) => Err(err.into()),
    }
}

/// Loads a review and checks that `user` wrote it.
async fn authored_review(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Review> {
    let review = state.reviews.get(id).await.map_err(review_not_found)?;
    if review.user_id != user.user_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(review)
}

pub async fn get_review(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Review>> {
    let review = state.reviews.get(id).await.map_err(review_not_found)?;
    Ok(ApiResponse::success("Review", review))
}

pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let author = match state.users.get(user.user_id).await {
        Ok(author) => author,
        Err(RepoError::NotFound) => return Err(AppError::NotFound("User not found".into())),
        Err(err) => return Err(err.into()),
    };
    ensure_product(state, payload.product_id).await?;

    let now = Utc::now();
    let review = Review {
        id: Uuid::new_v4(),
        comment: payload.comment,
        product_id: payload.product_id,
        user_id: author.id,
        created_at: now,
        updated_at: now,
    };
    let review = state.reviews.create(review).await?;
    tracing::info!(review_id = %review.id, product_id = %review.product_id, user_id = %review.user_id, "review created");
    Ok(ApiResponse::created("Review created", review))
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let existing = authored_review(state, user, payload.id).await?;
    if existing.product_id != payload.product_id {
        ensure_product(state, payload.product_id).await?;
    }

    // Author and creation time never change.
    let review = Review {
        comment: payload.comment,
        product_id: payload.product_id,
        updated_at: Utc::now(),
        ..existing
    };
    let review = state.reviews.update(review).await.map_err(review_not_found)?;
    Ok(ApiResponse::success("Review updated", review))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let review = authored_review(state, user, id).await?;
    state
        .reviews
        .delete(review.id)
        .await
        .map_err(review_not_found)?;
    tracing::info!(review_id = %review.id, user_id = %user.user_id, "review deleted");
    Ok(ApiResponse::empty(
        axum::http::StatusCode::OK,
        "Review deleted",
    ))
}
