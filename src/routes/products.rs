use axum::{
    Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::AppResult,
    middleware::{auth::AdminUser, path::EntityId, validation::ValidatedJson},
    models::Product,
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/product",
            get(list_products).post(create_product).put(update_product),
        )
        .route("/product/{id}", get(get_product).delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/product",
    responses(
        (status = 200, description = "List products", body = ApiResponse<Vec<Product>>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Product>>> {
    product_service::list_products(&state).await
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 400, description = "Product not found")
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    EntityId(id, _): EntityId<Product>,
) -> AppResult<ApiResponse<Product>> {
    product_service::get_product(&state, id).await
}

#[utoipa::path(
    post,
    path = "/product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed or invalid category id"),
        (status = 401, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<ApiResponse<Product>> {
    product_service::create_product(&state, payload).await
}

#[utoipa::path(
    put,
    path = "/product",
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Update product", body = ApiResponse<Product>),
        (status = 400, description = "Product not found or invalid category id"),
        (status = 401, description = "Admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<ApiResponse<Product>> {
    product_service::update_product(&state, payload).await
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 400, description = "Product not found"),
        (status = 401, description = "Admin role required"),
        (status = 409, description = "Product is referenced by existing orders")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    EntityId(id, _): EntityId<Product>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    product_service::delete_product(&state, id).await
}
