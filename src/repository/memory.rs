use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{OrderRepository, order_not_found};
use crate::{
    error::AppResult,
    models::{NewOrder, Order, OrderItem, OrderStatus},
};

/// Process-local repository with the same semantics as the database one.
///
/// Orders are kept in insertion order, which doubles as creation order.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<(Order, Vec<OrderItem>)>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(order: &Order, status: Option<OrderStatus>) -> bool {
    status.is_none_or(|status| order.status == status)
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_with_items(&self, new_order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            total_amount: new_order.total_amount,
            total_items: new_order.total_items,
            status: OrderStatus::default(),
            paid: false,
            paid_at: None,
            payment_reference: None,
            created_at: now,
            updated_at: now,
        };
        let items: Vec<OrderItem> = new_order
            .items
            .into_iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
                created_at: now,
            })
            .collect();

        self.orders
            .write()
            .await
            .push((order.clone(), items.clone()));

        Ok((order, items))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Order, Vec<OrderItem>)>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|(order, _)| order.id == id).cloned())
    }

    async fn find_page(
        &self,
        status: Option<OrderStatus>,
        skip: u64,
        take: u64,
    ) -> AppResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .map(|(order, _)| order)
            .filter(|order| matches(order, status))
            .skip(skip as usize)
            .take(take as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, status: Option<OrderStatus>) -> AppResult<u64> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|(order, _)| matches(order, status))
            .count() as u64)
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let mut orders = self.orders.write().await;
        let (order, _) = orders
            .iter_mut()
            .find(|(order, _)| order.id == id)
            .ok_or_else(|| order_not_found(id))?;

        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn mark_paid(&self, id: Uuid, payment_reference: Option<String>) -> AppResult<Order> {
        let mut orders = self.orders.write().await;
        let (order, _) = orders
            .iter_mut()
            .find(|(order, _)| order.id == id)
            .ok_or_else(|| order_not_found(id))?;

        let now = Utc::now();
        order.paid = true;
        order.paid_at = Some(now);
        order.status = OrderStatus::Paid;
        order.payment_reference = payment_reference;
        order.updated_at = now;
        Ok(order.clone())
    }
}
