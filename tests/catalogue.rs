mod common;

use axum::http::{Method, StatusCode};
use common::{
    ScriptedGateway, admin_token, register_and_login, seed_category, seed_product, send, test_app,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn categories_are_public_to_read_and_admin_to_write() {
    let (_, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let admin = admin_token(&app).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/category",
        Some(&admin),
        Some(json!({ "name": "Books" })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/category",
        Some(&admin),
        Some(json!({ "id": id, "name": "Novels" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Novels");

    let (status, body) = send(&app, Method::GET, &format!("/category/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Novels");

    let (status, body) = send(&app, Method::GET, "/category", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/category/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn products_need_an_existing_category() {
    let (_, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/product",
        Some(&admin),
        Some(json!({
            "name": "Orphan",
            "price": 1.0,
            "stock": 1,
            "category_id": Uuid::new_v4(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category id");

    let (status, body) = send(&app, Method::GET, "/product", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn negative_price_fails_validation() {
    let (store, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let category = seed_category(&store, "Misc").await;
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/product",
        Some(&admin),
        Some(json!({
            "name": "Cheap",
            "price": -1.0,
            "stock": 1,
            "category_id": category.id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["errors"][0]["field"], "price");
}

#[tokio::test]
async fn admin_updates_and_deletes_products() {
    let (store, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "Mug", 10.0).await;
    let admin = admin_token(&app).await;
    let user = register_and_login(&app, "u@x.com", "pw").await;

    let update = json!({
        "id": product.id,
        "name": "Big Mug",
        "image_url": "https://example.com/mug.png",
        "price": 12.0,
        "stock": 3,
        "category_id": category.id,
    });

    let (status, _) = send(&app, Method::PUT, "/product", Some(&user), Some(update.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::PUT, "/product", Some(&admin), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Big Mug");
    assert_eq!(body["data"]["price"].as_f64(), Some(12.0));

    let uri = format!("/product/{}", product.id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn ordered_products_cannot_be_deleted() {
    let (store, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "Mug", 10.0).await;
    let admin = admin_token(&app).await;
    let user = register_and_login(&app, "buyer@x.com", "pw").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/order",
        Some(&user),
        Some(json!({ "products": [{ "product_id": product.id, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/product/{}", product.id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn reviews_belong_to_their_author() {
    let (store, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "Mug", 10.0).await;
    let author = register_and_login(&app, "author@x.com", "pw").await;
    let other = register_and_login(&app, "other@x.com", "pw").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/review",
        Some(&author),
        Some(json!({ "comment": "Great mug", "product_id": product.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = body["data"]["id"].as_str().unwrap().to_string();
    let author_id = body["data"]["user_id"].clone();

    let (status, body) = send(&app, Method::GET, &format!("/review/{review_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comment"], "Great mug");

    let edit = json!({ "id": review_id, "comment": "Mine now", "product_id": product.id });
    let (status, body) = send(&app, Method::PUT, "/review", Some(&other), Some(edit)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have no permission to perform this action");

    let edit = json!({ "id": review_id, "comment": "Still great", "product_id": product.id });
    let (status, body) = send(&app, Method::PUT, "/review", Some(&author), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comment"], "Still great");
    assert_eq!(body["data"]["user_id"], author_id);

    let uri = format!("/review/{review_id}");
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&author), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Review not found");
}

#[tokio::test]
async fn review_needs_a_known_product_and_author() {
    let (store, state, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let category = seed_category(&store, "Misc").await;
    let product = seed_product(&store, category.id, "Mug", 10.0).await;
    let user = register_and_login(&app, "r@x.com", "pw").await;

    let missing = Uuid::new_v4();
    let (status, body) = send(
        &app,
        Method::POST,
        "/review",
        Some(&user),
        Some(json!({ "comment": "?", "product_id": missing })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], format!("Product with id {missing} not found"));

    // Valid signature, but the subject has no user row.
    let ghost = state
        .tokens
        .issue(&Uuid::new_v4().to_string(), storefront_api::models::Role::User)
        .unwrap();
    let (status, body) = send(
        &app,
        Method::POST,
        "/review",
        Some(&ghost),
        Some(json!({ "comment": "boo", "product_id": product.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn malformed_ids_answer_with_the_json_envelope() {
    let (_, _, app) = test_app(ScriptedGateway::approving("pi_unused")).await;
    let admin = admin_token(&app).await;

    for (uri, message) in [
        ("/product/abc", "Invalid product id"),
        ("/category/abc", "Invalid category id"),
        ("/review/abc", "Invalid review id"),
    ] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status_code"], 400, "{uri}");
        assert_eq!(body["message"], message, "{uri}");
    }

    let (status, body) = send(&app, Method::DELETE, "/product/123", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid product id");
}
