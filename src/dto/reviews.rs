use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "This field required"))]
    pub comment: String,
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    pub id: Uuid,
    #[validate(length(min = 1, message = "This field required"))]
    pub comment: String,
    pub product_id: Uuid,
}
