mod common;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use common::{
    ScriptedGateway, register_and_login, seed_category, seed_product, seed_user, send, test_app,
    test_state,
};
use serde_json::json;
use storefront_api::{
    dto::orders::OrderLineRequest,
    error::AppError,
    models::{Payment, PaymentStatus},
    repository::{PaymentRepository, RepoError, RepoResult},
    services::{order_service::assemble_order, payment_service::process_payment},
};
use uuid::Uuid;

struct BrokenPayments;

#[async_trait]
impl PaymentRepository for BrokenPayments {
    async fn create(&self, _payment: Payment) -> RepoResult<Payment> {
        Err(RepoError::Storage("disk full".into()))
    }

    async fn list_for_order(&self, _order_id: Uuid) -> RepoResult<Vec<Payment>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn successful_charge_stores_one_success_row() -> anyhow::Result<()> {
    let (store, state) = test_state(ScriptedGateway::approving("pi_ok"));
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 12.5).await;
    let buyer = seed_user(&store, "ok@x.com").await;
    let order = assemble_order(
        &state,
        buyer.id,
        &[OrderLineRequest { product_id: product.id, quantity: 2 }],
    )
    .await?;

    let payment = process_payment(&state, &order).await?;
    assert_eq!(payment.status, PaymentStatus::Success);
    assert_eq!(payment.transaction_id, "pi_ok");
    assert_eq!(payment.amount, 25.0);
    assert_eq!(payment.order_id, order.id);

    let stored = PaymentRepository::list_for_order(store.as_ref(), order.id).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, payment.id);
    Ok(())
}

#[tokio::test]
async fn declined_charge_stores_one_failed_row() -> anyhow::Result<()> {
    let (store, state) = test_state(ScriptedGateway::declining("card_declined"));
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 8.0).await;
    let buyer = seed_user(&store, "declined@x.com").await;
    let order = assemble_order(
        &state,
        buyer.id,
        &[OrderLineRequest { product_id: product.id, quantity: 1 }],
    )
    .await?;

    let err = process_payment(&state, &order).await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));

    let stored = PaymentRepository::list_for_order(store.as_ref(), order.id).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, PaymentStatus::Failed);
    assert_eq!(stored[0].transaction_id, "");
    assert_eq!(stored[0].amount, 8.0);
    Ok(())
}

#[tokio::test]
async fn unrecordable_failure_surfaces_the_storage_error() -> anyhow::Result<()> {
    let (store, mut state) = test_state(ScriptedGateway::declining("card_declined"));
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 8.0).await;
    let buyer = seed_user(&store, "declined@x.com").await;
    let order = assemble_order(
        &state,
        buyer.id,
        &[OrderLineRequest { product_id: product.id, quantity: 1 }],
    )
    .await?;

    state.payments = Arc::new(BrokenPayments);
    let err = process_payment(&state, &order).await.unwrap_err();
    assert!(matches!(err, AppError::Repository(RepoError::Storage(_))));
    assert_eq!(store.payment_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn declined_payment_over_http_is_a_generic_500() {
    let (store, _, app) = test_app(ScriptedGateway::declining("card_declined")).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 4.0).await;
    let user = register_and_login(&app, "d@x.com", "pw").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/order",
        Some(&user),
        Some(json!({ "products": [{ "product_id": product.id, "quantity": 1 }] })),
    )
    .await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/payment/{order_id}"),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error while processing payment");
    assert_eq!(store.payment_count().await, 1);
}

#[tokio::test]
async fn paid_orders_cannot_be_paid_again() {
    let gateway = ScriptedGateway::approving("pi_once");
    let (store, _, app) = test_app(gateway.clone()).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 4.0).await;
    let user = register_and_login(&app, "twice@x.com", "pw").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/order",
        Some(&user),
        Some(json!({ "products": [{ "product_id": product.id, "quantity": 1 }] })),
    )
    .await;
    let uri = format!("/payment/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Success");

    let (status, body) = send(&app, Method::POST, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order already paid");
    assert_eq!(gateway.calls().len(), 1);
    assert_eq!(store.payment_count().await, 1);
}

#[tokio::test]
async fn only_the_buyer_can_pay() {
    let gateway = ScriptedGateway::approving("pi_unused");
    let (store, _, app) = test_app(gateway.clone()).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 4.0).await;
    let buyer = register_and_login(&app, "buyer@x.com", "pw").await;
    let stranger = register_and_login(&app, "stranger@x.com", "pw").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/order",
        Some(&buyer),
        Some(json!({ "products": [{ "product_id": product.id, "quantity": 1 }] })),
    )
    .await;
    let uri = format!("/payment/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order not found");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/payment/{}", Uuid::new_v4()),
        Some(&buyer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(gateway.calls().is_empty());
    assert_eq!(store.payment_count().await, 0);
}

#[tokio::test]
async fn unconfigured_gateway_fails_before_touching_the_order() {
    let gateway = ScriptedGateway::unconfigured();
    let (store, _, app) = test_app(gateway.clone()).await;
    let user = register_and_login(&app, "nokey@x.com", "pw").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/payment/{}", Uuid::new_v4()),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Something went wrong");
    assert!(gateway.calls().is_empty());
    assert_eq!(store.payment_count().await, 0);
}

#[tokio::test]
async fn concurrent_payments_charge_once() {
    let gateway = ScriptedGateway::approving_after("pi_slow", Duration::from_millis(200));
    let (store, _, app) = test_app(gateway.clone()).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 9.0).await;
    let user = register_and_login(&app, "race@x.com", "pw").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/order",
        Some(&user),
        Some(json!({ "products": [{ "product_id": product.id, "quantity": 1 }] })),
    )
    .await;
    let uri = format!("/payment/{}", body["data"]["id"].as_str().unwrap());

    let (first, second) = tokio::join!(
        send(&app, Method::POST, &uri, Some(&user), None),
        send(&app, Method::POST, &uri, Some(&user), None),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
    let rejected = if first.0 == StatusCode::BAD_REQUEST { &first.1 } else { &second.1 };
    assert_eq!(rejected["message"], "Order already paid");

    assert_eq!(gateway.calls().len(), 1);
    assert_eq!(store.payment_count().await, 1);
}

#[tokio::test]
async fn store_refuses_a_second_success_for_one_order() -> anyhow::Result<()> {
    let (store, state) = test_state(ScriptedGateway::approving("pi_first"));
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "thing", 3.0).await;
    let buyer = seed_user(&store, "twice-stored@x.com").await;
    let order = assemble_order(
        &state,
        buyer.id,
        &[OrderLineRequest { product_id: product.id, quantity: 1 }],
    )
    .await?;

    let first = process_payment(&state, &order).await?;
    let again = PaymentRepository::create(
        store.as_ref(),
        Payment {
            id: Uuid::new_v4(),
            transaction_id: "pi_second".into(),
            ..first
        },
    )
    .await;
    assert!(matches!(again, Err(RepoError::Conflict(_))));

    let err = process_payment(&state, &order).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Order already paid"));
    assert_eq!(store.payment_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn malformed_order_id_is_a_json_400() {
    let gateway = ScriptedGateway::approving("pi_unused");
    let (_, _, app) = test_app(gateway.clone()).await;
    let user = register_and_login(&app, "badpay@x.com", "pw").await;

    let (status, body) = send(&app, Method::POST, "/payment/abc", Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 400);
    assert_eq!(body["message"], "Invalid order id");
    assert!(gateway.calls().is_empty());
}
