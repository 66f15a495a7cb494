mod common;

use axum::http::{Method, StatusCode};
use common::{ScriptedGateway, send, test_app};
use storefront_api::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.message, "Health check");

    let data = response.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn health_route_is_served_through_the_router() {
    let (_, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_a_404_envelope() {
    let (_, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;

    let (status, body) = send(&app, Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status_code"], 404);
    assert_eq!(body["message"], "Not Found");
}
