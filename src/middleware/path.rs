use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Category, Order, Product, Review},
};

/// Resource addressed by an `{id}` path segment.
pub trait PathEntity {
    /// Lowercase name used in the "Invalid <name> id" message.
    const NAME: &'static str;
}

impl PathEntity for Category {
    const NAME: &'static str = "category";
}

impl PathEntity for Product {
    const NAME: &'static str = "product";
}

impl PathEntity for Review {
    const NAME: &'static str = "review";
}

impl PathEntity for Order {
    const NAME: &'static str = "order";
}

/// `{id}` path parameter parsed as a UUID. A malformed id is answered with a
/// 400 envelope naming the entity instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct EntityId<E>(pub Uuid, pub PhantomData<fn() -> E>);

impl<E> EntityId<E> {
    pub fn new(id: Uuid) -> Self {
        Self(id, PhantomData)
    }
}

impl<S, E> FromRequestParts<S> for EntityId<E>
where
    E: PathEntity,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, entity = E::NAME, "path id rejected");
                AppError::BadRequest(format!("Invalid {} id", E::NAME))
            })?;
        Ok(Self::new(id))
    }
}
