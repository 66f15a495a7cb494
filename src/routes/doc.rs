use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        categories::{CreateCategoryRequest, UpdateCategoryRequest},
        orders::{CreateOrderRequest, OrderLineRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        reviews::{CreateReviewRequest, UpdateReviewRequest},
    },
    error::FieldError,
    models::{Category, Order, OrderItem, Payment, PaymentStatus, Product, Review, Role, User},
    routes::{auth, categories, health, orders, payments, products, reviews},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        reviews::get_review,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
        orders::create_order,
        orders::get_order,
        payments::pay_order
    ),
    components(
        schemas(
            Role,
            PaymentStatus,
            User,
            Category,
            Product,
            Review,
            Order,
            OrderItem,
            Payment,
            FieldError,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateReviewRequest,
            UpdateReviewRequest,
            CreateOrderRequest,
            OrderLineRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payment endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
