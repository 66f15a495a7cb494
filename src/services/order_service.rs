use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderLineRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, Role},
    repository::RepoError,
    response::ApiResponse,
    state::AppState,
};

/// Resolves every line against the product catalogue, prices it and stores the
/// order with its items in one unit.
///
/// Lines are resolved one at a time in input order. The first unknown product
/// aborts the whole order before anything is written. The total is accumulated
/// as `price * quantity` in that same order.
#[tracing::instrument(skip(state, lines), fields(lines = lines.len()))]
pub async fn assemble_order(
    state: &AppState,
    buyer_id: Uuid,
    lines: &[OrderLineRequest],
) -> AppResult<Order> {
    if lines.is_empty() {
        return Err(AppError::BadRequest(
            "Order must contain at least one product".into(),
        ));
    }

    let order_id = Uuid::new_v4();
    let now = Utc::now();
    let mut total_amount = 0.0_f64;
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let quantity = i32::try_from(line.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or_else(|| AppError::BadRequest("Quantity must be at least 1".into()))?;

        let product = match state.products.get(line.product_id).await {
            Ok(product) => product,
            Err(RepoError::NotFound) => return Err(AppError::ProductNotFound(line.product_id)),
            Err(err) => return Err(err.into()),
        };

        total_amount += product.price * f64::from(quantity);
        items.push(OrderItem {
            id: Uuid::new_v4(),
            order_id,
            product_id: product.id,
            quantity,
            product: Some(product),
            created_at: now,
            updated_at: now,
        });
    }

    let order = Order {
        id: order_id,
        user_id: buyer_id,
        items,
        total_amount,
        created_at: now,
        updated_at: now,
    };

    let stored = state.orders.create(order.clone()).await.map_err(|err| {
        tracing::error!(error = %err, order_id = %order_id, "failed to persist order");
        AppError::Repository(err)
    })?;
    tracing::info!(
        order_id = %stored.id,
        user_id = %buyer_id,
        total_amount = stored.total_amount,
        "order created"
    );

    // The store does not echo resolved products back.
    Ok(Order {
        items: order.items,
        ..stored
    })
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let order = assemble_order(state, user.user_id, &payload.products).await?;
    Ok(ApiResponse::created("Order created", order))
}

/// Loads an order visible to `user`: their own, or any order for an admin.
async fn find_visible_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<Order> {
    let order = match state.orders.get(id).await {
        Ok(order) => order,
        Err(RepoError::NotFound) => return Err(AppError::NotFound("Order not found".into())),
        Err(err) => return Err(err.into()),
    };
    if order.user_id != user.user_id && user.role != Role::Admin {
        return Err(AppError::NotFound("Order not found".into()));
    }
    Ok(order)
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = find_visible_order(state, user, id).await?;
    Ok(ApiResponse::success("Order", order))
}
