use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{NewOrder, Order, OrderItem, OrderStatus},
};

pub mod memory;
pub mod orm;

pub use memory::InMemoryOrderRepository;
pub use orm::OrmOrderRepository;

/// Storage for orders and their line items.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the order and all of its items atomically.
    async fn create_with_items(&self, order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Order, Vec<OrderItem>)>>;

    /// Oldest first.
    async fn find_page(&self, status: Option<OrderStatus>, skip: u64, take: u64)
    -> AppResult<Vec<Order>>;

    async fn count(&self, status: Option<OrderStatus>) -> AppResult<u64>;

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;

    async fn mark_paid(&self, id: Uuid, payment_reference: Option<String>) -> AppResult<Order>;
}

pub(crate) fn order_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Order with id {id} not found"))
}
