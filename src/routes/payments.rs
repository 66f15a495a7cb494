use axum::{
    Router,
    extract::State,
    routing::post,
};

use crate::{
    error::AppResult,
    middleware::{auth::AuthUser, path::EntityId},
    models::{Order, Payment},
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/payment/{id}", post(pay_order))
}

#[utoipa::path(
    post,
    path = "/payment/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Payment succeeded", body = ApiResponse<Payment>),
        (status = 400, description = "Invalid order id, order not found or already paid"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Error while processing payment")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    user: AuthUser,
    EntityId(id, _): EntityId<Order>,
) -> AppResult<ApiResponse<Payment>> {
    payment_service::pay_order(&state, &user, id).await
}
