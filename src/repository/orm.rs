use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{OrderRepository, order_not_found};
use crate::{
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::AppResult,
    models::{NewOrder, Order, OrderItem, OrderStatus},
};

/// PostgreSQL-backed repository using SeaORM.
#[derive(Clone)]
pub struct OrmOrderRepository {
    conn: DatabaseConnection,
}

impl OrmOrderRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<OrderModel> {
        Orders::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| order_not_found(id))
    }
}

fn status_condition(status: Option<OrderStatus>) -> Condition {
    let mut condition = Condition::all();
    if let Some(status) = status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    condition
}

#[async_trait]
impl OrderRepository for OrmOrderRepository {
    async fn create_with_items(&self, new_order: NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        let txn = self.conn.begin().await?;

        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            total_amount: Set(new_order.total_amount),
            total_items: Set(new_order.total_items),
            status: Set(OrderStatus::default()),
            paid: Set(false),
            paid_at: Set(None),
            payment_reference: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for (position, line) in (0_i32..).zip(new_order.items) {
            let item = OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                price: Set(line.price),
                position: Set(position),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
            items.push(order_item_from_entity(item));
        }

        txn.commit().await?;

        Ok((order_from_entity(order), items))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Order, Vec<OrderItem>)>> {
        let Some(order) = Orders::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order.id))
            .order_by_asc(OrderItemCol::Position)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect();

        Ok(Some((order_from_entity(order), items)))
    }

    async fn find_page(
        &self,
        status: Option<OrderStatus>,
        skip: u64,
        take: u64,
    ) -> AppResult<Vec<Order>> {
        let orders = Orders::find()
            .filter(status_condition(status))
            .order_by_asc(OrderCol::CreatedAt)
            .order_by_asc(OrderCol::Id)
            .offset(skip)
            .limit(take)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect();
        Ok(orders)
    }

    async fn count(&self, status: Option<OrderStatus>) -> AppResult<u64> {
        let total = Orders::find()
            .filter(status_condition(status))
            .count(&self.conn)
            .await?;
        Ok(total)
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let existing = self.find_model(id).await?;

        let mut active: OrderActive = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());
        let order = active.update(&self.conn).await?;

        Ok(order_from_entity(order))
    }

    async fn mark_paid(&self, id: Uuid, payment_reference: Option<String>) -> AppResult<Order> {
        let existing = self.find_model(id).await?;

        let now = Utc::now();
        let mut active: OrderActive = existing.into();
        active.paid = Set(true);
        active.paid_at = Set(Some(now.into()));
        active.status = Set(OrderStatus::Paid);
        active.payment_reference = Set(payment_reference);
        active.updated_at = Set(now.into());
        let order = active.update(&self.conn).await?;

        Ok(order_from_entity(order))
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        total_amount: model.total_amount,
        total_items: model.total_items,
        status: model.status,
        paid: model.paid,
        paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
        payment_reference: model.payment_reference,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
