use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Category, Order, Payment, PaymentStatus, Product, Review, User};

use super::{
    CategoryRepository, OrderRepository, PaymentRepository, ProductRepository, RepoError,
    RepoResult, ReviewRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    users: Vec<User>,
    reviews: Vec<Review>,
    orders: Vec<Order>,
    payments: Vec<Payment>,
}

/// Process-local store. Rows are kept in insertion order and every operation
/// holds the table lock for its whole duration, so multi-row writes are atomic.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }
}

fn replace<T: Clone>(rows: &mut [T], value: T, matches: impl Fn(&T) -> bool) -> RepoResult<T> {
    let slot = rows.iter_mut().find(|row| matches(row)).ok_or(RepoError::NotFound)?;
    *slot = value.clone();
    Ok(value)
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> RepoResult<Category> {
        let tables = self.tables.read().await;
        tables
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_all(&self) -> RepoResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn create(&self, category: Category) -> RepoResult<Category> {
        self.tables.write().await.categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> RepoResult<Category> {
        let id = category.id;
        let mut tables = self.tables.write().await;
        replace(&mut tables.categories, category, |c| c.id == id)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> RepoResult<Product> {
        let tables = self.tables.read().await;
        tables
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_all(&self) -> RepoResult<Vec<Product>> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn create(&self, product: Product) -> RepoResult<Product> {
        let mut tables = self.tables.write().await;
        if !tables.categories.iter().any(|c| c.id == product.category_id) {
            return Err(RepoError::Conflict("products.category_id".into()));
        }
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> RepoResult<Product> {
        let id = product.id;
        let mut tables = self.tables.write().await;
        replace(&mut tables.products, product, |p| p.id == id)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        let referenced = tables
            .orders
            .iter()
            .flat_map(|o| o.items.iter())
            .any(|item| item.product_id == id);
        if referenced {
            return Err(RepoError::Conflict("order_items.product_id".into()));
        }
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Err(RepoError::NotFound);
        }
        tables.reviews.retain(|r| r.product_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> RepoResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, user: User) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict("users.email".into()));
        }
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> RepoResult<Review> {
        let tables = self.tables.read().await;
        tables
            .reviews
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, review: Review) -> RepoResult<Review> {
        self.tables.write().await.reviews.push(review.clone());
        Ok(review)
    }

    async fn update(&self, review: Review) -> RepoResult<Review> {
        let id = review.id;
        let mut tables = self.tables.write().await;
        replace(&mut tables.reviews, review, |r| r.id == id)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.reviews.len();
        tables.reviews.retain(|r| r.id != id);
        if tables.reviews.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> RepoResult<Order> {
        let tables = self.tables.read().await;
        let mut order = tables
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)?;
        for item in &mut order.items {
            item.product = tables.products.iter().find(|p| p.id == item.product_id).cloned();
        }
        Ok(order)
    }

    async fn create(&self, order: Order) -> RepoResult<Order> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == order.user_id) {
            return Err(RepoError::Conflict("orders.user_id".into()));
        }
        let dangling = order
            .items
            .iter()
            .find(|item| !tables.products.iter().any(|p| p.id == item.product_id));
        if let Some(item) = dangling {
            return Err(RepoError::Conflict(format!(
                "order_items.product_id {}",
                item.product_id
            )));
        }
        tables.orders.push(order.clone());
        Ok(order)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn create(&self, payment: Payment) -> RepoResult<Payment> {
        let mut tables = self.tables.write().await;
        if !tables.orders.iter().any(|o| o.id == payment.order_id) {
            return Err(RepoError::Conflict("payments.order_id".into()));
        }
        let already_paid = payment.status == PaymentStatus::Success
            && tables
                .payments
                .iter()
                .any(|p| p.order_id == payment.order_id && p.status == PaymentStatus::Success);
        if already_paid {
            return Err(RepoError::Conflict("payments_one_success_per_order".into()));
        }
        tables.payments.push(payment.clone());
        Ok(payment)
    }

    async fn list_for_order(&self, order_id: Uuid) -> RepoResult<Vec<Payment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect())
    }
}
