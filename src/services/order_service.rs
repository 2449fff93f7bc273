use std::collections::{HashMap, HashSet};

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    clients::ProductClientError,
    dto::orders::{
        ChangeOrderStatusRequest, CreateOrderItem, CreateOrderRequest, OrderList, OrderWithItems,
        PayOrderRequest,
    },
    error::{AppError, AppResult},
    models::{NewOrder, NewOrderItem, Order, OrderItem, OrderItemView, Product},
    repository::order_not_found,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let product_ids = distinct_product_ids(payload.items.iter().map(|item| &item.product_id));
    let products = state.products.validate_products(&product_ids).await?;

    let new_order = price_order(&payload.items, &products)?;
    let (order, items) = state.orders.create_with_items(new_order).await?;

    tracing::info!(
        order_id = %order.id,
        total_amount = %order.total_amount,
        total_items = order.total_items,
        "order created"
    );

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order,
            items: with_product_names(items, &products),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, skip) = query.normalize();

    let total = state.orders.count(query.status).await?;
    let orders = state.orders.find_page(query.status, skip, limit).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = find_order(state, id).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn change_order_status(
    state: &AppState,
    id: Uuid,
    payload: ChangeOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let current = find_order(state, id).await?;

    let status = match payload.status {
        Some(status) if status != current.order.status => status,
        _ => {
            return Ok(ApiResponse::success(
                "Order unchanged",
                current,
                Some(Meta::empty()),
            ));
        }
    };

    let updated = state.orders.update_status(id, status).await?;
    tracing::info!(
        order_id = %id,
        from = current.order.status.as_str(),
        to = updated.status.as_str(),
        "order status changed"
    );

    Ok(ApiResponse::success(
        "Order updated",
        OrderWithItems {
            order: updated,
            items: current.items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn pay_order(
    state: &AppState,
    id: Uuid,
    payload: PayOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let (order, _) = load_order(state, id).await?;

    if order.paid {
        return Err(AppError::BadRequest("Order already paid".into()));
    }

    let order = state.orders.mark_paid(id, payload.payment_reference).await?;
    tracing::info!(order_id = %order.id, "payment recorded");

    Ok(ApiResponse::success(
        "Payment recorded",
        order,
        Some(Meta::empty()),
    ))
}

/// Loads an order and annotates its items with names from the products service.
async fn find_order(state: &AppState, id: Uuid) -> AppResult<OrderWithItems> {
    let (order, items) = load_order(state, id).await?;

    let product_ids = distinct_product_ids(items.iter().map(|item| &item.product_id));
    let products = if product_ids.is_empty() {
        Vec::new()
    } else {
        state.products.validate_products(&product_ids).await?
    };

    Ok(OrderWithItems {
        order,
        items: with_product_names(items, &products),
    })
}

async fn load_order(state: &AppState, id: Uuid) -> AppResult<(Order, Vec<OrderItem>)> {
    state
        .orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

/// First-seen order, duplicates dropped.
fn distinct_product_ids<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: HashSet<&'a String> = HashSet::new();
    ids.filter(|id| seen.insert(*id)).cloned().collect()
}

/// Largest amount a `NUMERIC(12, 2)` column holds.
fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Snapshots unit prices and derives the order totals.
///
/// Prices are rounded to cents before summing so the stored total always
/// equals the sum of the stored lines. A product the products service did
/// not return is priced at 0.
fn price_order(items: &[CreateOrderItem], products: &[Product]) -> AppResult<NewOrder> {
    let catalog: HashMap<&str, &Product> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut total_amount = Decimal::ZERO;
    let mut total_items: i32 = 0;
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        let price = match catalog.get(item.product_id.as_str()) {
            Some(product) => unit_price(product)?,
            None => {
                tracing::warn!(
                    product_id = %item.product_id,
                    "product missing from products service reply, pricing at 0"
                );
                Decimal::ZERO
            }
        };

        total_amount = price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line_total| total_amount.checked_add(line_total))
            .filter(|total| *total <= max_amount())
            .ok_or_else(|| AppError::Validation(vec!["items: order total is too large".into()]))?;
        total_items = total_items
            .checked_add(item.quantity)
            .ok_or_else(|| AppError::Validation(vec!["items: total quantity is too large".into()]))?;

        lines.push(NewOrderItem {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            price,
        });
    }

    Ok(NewOrder {
        total_amount,
        total_items,
        items: lines,
    })
}

fn unit_price(product: &Product) -> AppResult<Decimal> {
    if product.price < Decimal::ZERO {
        return Err(ProductClientError::Decode(format!(
            "product {} has a negative price",
            product.id
        ))
        .into());
    }
    let price = product
        .price
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if price > max_amount() {
        return Err(AppError::Validation(vec![format!(
            "items: price of product {} is too large",
            product.id
        )]));
    }
    Ok(price)
}

fn with_product_names(items: Vec<OrderItem>, products: &[Product]) -> Vec<OrderItemView> {
    items
        .into_iter()
        .map(|item| {
            let name = products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|p| p.name.clone());
            OrderItemView {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                name,
            }
        })
        .collect()
}
