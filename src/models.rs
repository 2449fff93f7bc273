use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use crate::entity::sea_orm_active_enums::OrderStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub total_amount: Decimal,
    pub total_items: i32,
    pub status: OrderStatus,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A stored line item joined with the product name resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItemView {
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
    pub name: Option<String>,
}

/// Product record as returned by the products service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_product_id")]
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

/// Everything the repository needs to persist an order and its items.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub total_amount: Decimal,
    pub total_items: i32,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
}

// Product ids are opaque strings here, but some products services emit numbers.
fn deserialize_product_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Int(id) => id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_accepts_numeric_ids_and_float_prices() {
        let products: Vec<Product> =
            serde_json::from_str(r#"[{"id": 7, "name": "Mouse", "price": 19.99}, {"id": "P2", "name": "Pad", "price": "5"}]"#)
                .unwrap();

        assert_eq!(products[0].id, "7");
        assert_eq!(products[0].price, Decimal::new(1999, 2));
        assert_eq!(products[1].id, "P2");
        assert_eq!(products[1].price, Decimal::from(5));
    }
}
