use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories, Model as CategoryModel},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Entity as Orders},
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments, Model as PaymentModel},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products, Model as ProductModel},
        reviews::{ActiveModel as ReviewActive, Entity as Reviews, Model as ReviewModel},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    models::{Category, Order, OrderItem, Payment, Product, Review, User},
};

use super::{
    CategoryRepository, OrderRepository, PaymentRepository, ProductRepository, RepoError,
    RepoResult, ReviewRepository, UserRepository,
};

/// PostgreSQL-backed store over a shared SeaORM connection pool.
#[derive(Clone)]
pub struct SeaOrmStore {
    conn: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmStore {
    async fn get(&self, id: Uuid) -> RepoResult<Category> {
        Categories::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(category_from_entity)
            .ok_or(RepoError::NotFound)
    }

    async fn get_all(&self) -> RepoResult<Vec<Category>> {
        let items = Categories::find()
            .order_by_asc(CategoryCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(category_from_entity)
            .collect();
        Ok(items)
    }

    async fn create(&self, category: Category) -> RepoResult<Category> {
        let model = CategoryActive {
            id: Set(category.id),
            name: Set(category.name),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        }
        .insert(&self.conn)
        .await?;
        Ok(category_from_entity(model))
    }

    async fn update(&self, category: Category) -> RepoResult<Category> {
        let model = CategoryActive {
            id: Set(category.id),
            name: Set(category.name),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        }
        .update(&self.conn)
        .await?;
        Ok(category_from_entity(model))
    }
}

#[async_trait]
impl ProductRepository for SeaOrmStore {
    async fn get(&self, id: Uuid) -> RepoResult<Product> {
        Products::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(product_from_entity)
            .ok_or(RepoError::NotFound)
    }

    async fn get_all(&self) -> RepoResult<Vec<Product>> {
        let items = Products::find()
            .order_by_asc(ProdCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn create(&self, product: Product) -> RepoResult<Product> {
        let model = product_active(product).insert(&self.conn).await?;
        Ok(product_from_entity(model))
    }

    async fn update(&self, product: Product) -> RepoResult<Product> {
        let model = product_active(product).update(&self.conn).await?;
        Ok(product_from_entity(model))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = Products::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SeaOrmStore {
    async fn get(&self, id: Uuid) -> RepoResult<User> {
        let model = Users::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(RepoError::NotFound)?;
        user_from_entity(model)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        let model = Users::find()
            .filter(UserCol::Email.eq(email))
            .one(&self.conn)
            .await?
            .ok_or(RepoError::NotFound)?;
        user_from_entity(model)
    }

    async fn create(&self, user: User) -> RepoResult<User> {
        let model = UserActive {
            id: Set(user.id),
            name: Set(user.name),
            last_name: Set(user.last_name),
            user_name: Set(user.user_name),
            email: Set(user.email),
            role: Set(user.role.as_str().to_string()),
            password_hash: Set(user.password_hash),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
        .insert(&self.conn)
        .await?;
        user_from_entity(model)
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmStore {
    async fn get(&self, id: Uuid) -> RepoResult<Review> {
        Reviews::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(review_from_entity)
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, review: Review) -> RepoResult<Review> {
        let model = review_active(review).insert(&self.conn).await?;
        Ok(review_from_entity(model))
    }

    async fn update(&self, review: Review) -> RepoResult<Review> {
        let model = review_active(review).update(&self.conn).await?;
        Ok(review_from_entity(model))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = Reviews::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for SeaOrmStore {
    async fn get(&self, id: Uuid) -> RepoResult<Order> {
        let order = Orders::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(RepoError::NotFound)?;

        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order.id))
            .order_by_asc(OrderItemCol::Position)
            .find_also_related(Products)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|(item, product)| order_item_from_entity(item, product.map(product_from_entity)))
            .collect();

        Ok(Order {
            id: order.id,
            user_id: order.user_id,
            items,
            total_amount: order.total_amount,
            created_at: order.created_at.with_timezone(&Utc),
            updated_at: order.updated_at.with_timezone(&Utc),
        })
    }

    async fn create(&self, order: Order) -> RepoResult<Order> {
        let txn = self.conn.begin().await?;

        OrderActive {
            id: Set(order.id),
            user_id: Set(order.user_id),
            total_amount: Set(order.total_amount),
            created_at: Set(order.created_at.into()),
            updated_at: Set(order.updated_at.into()),
        }
        .insert(&txn)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| RepoError::Storage("order has too many items".into()))?;
            OrderItemActive {
                id: Set(item.id),
                order_id: Set(order.id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                position: Set(position),
                created_at: Set(item.created_at.into()),
                updated_at: Set(item.updated_at.into()),
            }
            .insert(&txn)
            .await?;
        }

        // Dropping `txn` on any error above rolls the whole order back.
        txn.commit().await?;
        Ok(order)
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmStore {
    async fn create(&self, payment: Payment) -> RepoResult<Payment> {
        let model = PaymentActive {
            id: Set(payment.id),
            transaction_id: Set(payment.transaction_id),
            amount: Set(payment.amount),
            status: Set(payment.status.as_str().to_string()),
            order_id: Set(payment.order_id),
            created_at: Set(payment.created_at.into()),
            updated_at: Set(payment.updated_at.into()),
        }
        .insert(&self.conn)
        .await?;
        payment_from_entity(model)
    }

    async fn list_for_order(&self, order_id: Uuid) -> RepoResult<Vec<Payment>> {
        Payments::find()
            .filter(PaymentCol::OrderId.eq(order_id))
            .order_by_asc(PaymentCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(payment_from_entity)
            .collect()
    }
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn product_active(product: Product) -> ProductActive {
    ProductActive {
        id: Set(product.id),
        name: Set(product.name),
        image_url: Set(product.image_url),
        price: Set(product.price),
        stock: Set(product.stock),
        category_id: Set(product.category_id),
        created_at: Set(product.created_at.into()),
        updated_at: Set(product.updated_at.into()),
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        image_url: model.image_url,
        price: model.price,
        stock: model.stock,
        category_id: model.category_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn user_from_entity(model: UserModel) -> RepoResult<User> {
    let role = model.role.parse().map_err(RepoError::Storage)?;
    Ok(User {
        id: model.id,
        name: model.name,
        last_name: model.last_name,
        user_name: model.user_name,
        email: model.email,
        role,
        password_hash: model.password_hash,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn review_active(review: Review) -> ReviewActive {
    ReviewActive {
        id: Set(review.id),
        comment: Set(review.comment),
        product_id: Set(review.product_id),
        user_id: Set(review.user_id),
        created_at: Set(review.created_at.into()),
        updated_at: Set(review.updated_at.into()),
    }
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        comment: model.comment,
        product_id: model.product_id,
        user_id: model.user_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel, product: Option<Product>) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        product,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn payment_from_entity(model: PaymentModel) -> RepoResult<Payment> {
    let status = model.status.parse().map_err(RepoError::Storage)?;
    Ok(Payment {
        id: model.id,
        transaction_id: model.transaction_id,
        amount: model.amount,
        status,
        order_id: model.order_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
