use std::sync::Arc;

use crate::{
    repository::{
        CategoryRepository, OrderRepository, PaymentRepository, ProductRepository,
        ReviewRepository, UserRepository,
    },
    services::{
        order_locks::OrderLocks, payment_gateway::PaymentGateway, token_service::TokenService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    /// Serialises payment attempts per order.
    pub payment_locks: Arc<OrderLocks>,
}

impl AppState {
    /// Wires every repository handle to the same backing store.
    pub fn new<S>(store: Arc<S>, tokens: TokenService, gateway: Arc<dyn PaymentGateway>) -> Self
    where
        S: CategoryRepository
            + ProductRepository
            + UserRepository
            + ReviewRepository
            + OrderRepository
            + PaymentRepository
            + 'static,
    {
        Self {
            tokens: Arc::new(tokens),
            categories: store.clone(),
            products: store.clone(),
            users: store.clone(),
            reviews: store.clone(),
            orders: store.clone(),
            payments: store,
            gateway,
            payment_locks: Arc::new(OrderLocks::new()),
        }
    }
}
