use axum::{
    Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::orders::CreateOrderRequest,
    error::AppResult,
    middleware::{auth::AuthUser, path::EntityId, validation::ValidatedJson},
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(create_order))
        .route("/order/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Create order", body = ApiResponse<Order>),
        (status = 400, description = "Empty order or unknown product"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<ApiResponse<Order>> {
    order_service::create_order(&state, &user, payload).await
}

#[utoipa::path(
    get,
    path = "/order/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order", body = ApiResponse<Order>),
        (status = 400, description = "Order not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    EntityId(id, _): EntityId<Order>,
) -> AppResult<ApiResponse<Order>> {
    order_service::get_order(&state, &user, id).await
}
