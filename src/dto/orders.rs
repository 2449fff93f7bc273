use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Order, OrderItemView, OrderStatus};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateOrderItem {
    #[validate(length(min = 1, message = "product_id must not be empty"))]
    pub product_id: String,
    #[validate(range(min = 1, message = "quantity must be a positive number"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "items must contain at least one item"), nested)]
    pub items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct ChangeOrderStatusRequest {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct PayOrderRequest {
    #[validate(length(min = 1, max = 255, message = "payment_reference must be 1-255 characters"))]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
