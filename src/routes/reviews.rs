use axum::{
    Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::reviews::{CreateReviewRequest, UpdateReviewRequest},
    error::AppResult,
    middleware::{auth::AuthUser, path::EntityId, validation::ValidatedJson},
    models::Review,
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/review", post(create_review).put(update_review))
        .route("/review/{id}", get(get_review).delete(delete_review))
}

#[utoipa::path(
    get,
    path = "/review/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Get review", body = ApiResponse<Review>),
        (status = 400, description = "Review not found")
    ),
    tag = "Reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    EntityId(id, _): EntityId<Review>,
) -> AppResult<ApiResponse<Review>> {
    review_service::get_review(&state, id).await
}

#[utoipa::path(
    post,
    path = "/review",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Create review", body = ApiResponse<Review>),
        (status = 400, description = "Product or user not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> AppResult<ApiResponse<Review>> {
    review_service::create_review(&state, &user, payload).await
}

#[utoipa::path(
    put,
    path = "/review",
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Update review", body = ApiResponse<Review>),
        (status = 400, description = "Not the author, or review not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
) -> AppResult<ApiResponse<Review>> {
    review_service::update_review(&state, &user, payload).await
}

#[utoipa::path(
    delete,
    path = "/review/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 400, description = "Not the author, or review not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    EntityId(id, _): EntityId<Review>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    review_service::delete_review(&state, &user, id).await
}
