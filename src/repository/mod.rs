//! Storage interfaces, one trait per entity.
//!
//! `SeaOrmStore` backs the running service; `InMemoryStore` is a drop-in
//! replacement used by tests and local experiments.

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Category, Order, Payment, Product, Review, User};

pub mod memory;
pub mod sea;

pub use memory::InMemoryStore;
pub use sea::SeaOrmStore;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("constraint violated: {0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<DbErr> for RepoError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
            other => match other.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg))
                | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Conflict(msg),
                _ => RepoError::Storage(other.to_string()),
            },
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> RepoResult<Category>;
    async fn get_all(&self) -> RepoResult<Vec<Category>>;
    async fn create(&self, category: Category) -> RepoResult<Category>;
    async fn update(&self, category: Category) -> RepoResult<Category>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> RepoResult<Product>;
    async fn get_all(&self) -> RepoResult<Vec<Product>>;
    async fn create(&self, product: Product) -> RepoResult<Product>;
    async fn update(&self, product: Product) -> RepoResult<Product>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> RepoResult<User>;
    async fn get_by_email(&self, email: &str) -> RepoResult<User>;
    async fn create(&self, user: User) -> RepoResult<User>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> RepoResult<Review>;
    async fn create(&self, review: Review) -> RepoResult<Review>;
    async fn update(&self, review: Review) -> RepoResult<Review>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Loads the order with its items in the order they were submitted.
    async fn get(&self, id: Uuid) -> RepoResult<Order>;
    /// Writes the order and all of its items as one unit.
    async fn create(&self, order: Order) -> RepoResult<Order>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> RepoResult<Payment>;
    async fn list_for_order(&self, order_id: Uuid) -> RepoResult<Vec<Payment>>;
}
