use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, Payment, PaymentStatus},
    repository::RepoError,
    response::ApiResponse,
    services::payment_gateway::ChargeRequest,
    state::AppState,
};

/// Charges `order.total_amount` once and records the outcome.
///
/// Exactly one payment row is written per call, with status `SUCCESS` or
/// `FAILED`. A rejected charge is stored with an empty transaction id and
/// then surfaced as [`AppError::Gateway`]. No retries.
#[tracing::instrument(skip(state, order), fields(order_id = %order.id, amount = order.total_amount))]
pub async fn process_payment(state: &AppState, order: &Order) -> AppResult<Payment> {
    let now = Utc::now();
    let mut payment = Payment {
        id: Uuid::new_v4(),
        transaction_id: String::new(),
        amount: order.total_amount,
        status: PaymentStatus::Pending,
        order_id: order.id,
        created_at: now,
        updated_at: now,
    };

    let charge = ChargeRequest::immediate(payment.amount);
    match state.gateway.charge(&charge).await {
        Ok(transaction_id) => {
            payment.status = PaymentStatus::Success;
            payment.transaction_id = transaction_id;
            payment.updated_at = Utc::now();

            let transaction_id = payment.transaction_id.clone();
            let payment = state.payments.create(payment).await.map_err(|err| match err {
                RepoError::Conflict(_) => {
                    tracing::error!(
                        order_id = %order.id,
                        transaction_id = %transaction_id,
                        "charged an order that already has a successful payment"
                    );
                    AppError::BadRequest("Order already paid".into())
                }
                other => AppError::Repository(other),
            })?;
            tracing::info!(
                payment_id = %payment.id,
                transaction_id = %payment.transaction_id,
                "payment succeeded"
            );
            Ok(payment)
        }
        Err(gateway_err) => {
            payment.status = PaymentStatus::Failed;
            payment.updated_at = Utc::now();

            match state.payments.create(payment).await {
                Ok(payment) => {
                    tracing::warn!(
                        payment_id = %payment.id,
                        error = %gateway_err,
                        "payment failed"
                    );
                    Err(AppError::Gateway(gateway_err))
                }
                Err(repo_err) => {
                    tracing::error!(
                        gateway_error = %gateway_err,
                        storage_error = %repo_err,
                        "payment failed and the failure could not be recorded"
                    );
                    Err(AppError::Repository(repo_err))
                }
            }
        }
    }
}

/// Pays one of the caller's own orders.
pub async fn pay_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    if !state.gateway.is_configured() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "payment gateway API key is not configured"
        )));
    }

    // Held until the outcome is stored, so the paid check and the charge act as one step.
    let _order_guard = state.payment_locks.acquire(order_id).await;

    let order = match state.orders.get(order_id).await {
        Ok(order) if order.user_id == user.user_id => order,
        Ok(_) | Err(RepoError::NotFound) => {
            return Err(AppError::NotFound("Order not found".into()));
        }
        Err(err) => return Err(err.into()),
    };

    let already_paid = state
        .payments
        .list_for_order(order.id)
        .await?
        .iter()
        .any(|payment| payment.status == PaymentStatus::Success);
    if already_paid {
        return Err(AppError::BadRequest("Order already paid".into()));
    }

    let payment = process_payment(state, &order).await?;
    Ok(ApiResponse::success("Success", payment))
}
