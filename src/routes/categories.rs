use axum::{
    Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::AppResult,
    middleware::{auth::AdminUser, path::EntityId, validation::ValidatedJson},
    models::Category,
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/category",
            get(list_categories).post(create_category).put(update_category),
        )
        .route("/category/{id}", get(get_category))
}

#[utoipa::path(
    get,
    path = "/category",
    responses(
        (status = 200, description = "List categories", body = ApiResponse<Vec<Category>>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Category>>> {
    category_service::list_categories(&state).await
}

#[utoipa::path(
    get,
    path = "/category/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Get category", body = ApiResponse<Category>),
        (status = 400, description = "Category not found")
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    EntityId(id, _): EntityId<Category>,
) -> AppResult<ApiResponse<Category>> {
    category_service::get_category(&state, id).await
}

#[utoipa::path(
    post,
    path = "/category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Create category", body = ApiResponse<Category>),
        (status = 401, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<ApiResponse<Category>> {
    category_service::create_category(&state, payload).await
}

#[utoipa::path(
    put,
    path = "/category",
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Update category", body = ApiResponse<Category>),
        (status = 400, description = "Category not found"),
        (status = 401, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<ApiResponse<Category>> {
    category_service::update_category(&state, payload).await
}
