use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "This field required"))]
    pub name: String,
    #[validate(url(message = "Invalid url"))]
    pub image_url: Option<String>,
    #[validate(range(min = 0.0, message = "Price can't be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "Stock can't be negative"))]
    pub stock: i32,
    pub category_id: Uuid,
}

/// Full replacement of a product's editable fields.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    pub id: Uuid,
    #[validate(length(min = 1, message = "This field required"))]
    pub name: String,
    #[validate(url(message = "Invalid url"))]
    pub image_url: Option<String>,
    #[validate(range(min = 0.0, message = "Price can't be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "Stock can't be negative"))]
    pub stock: i32,
    pub category_id: Uuid,
}
