use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::orders::{
        ChangeOrderStatusRequest, CreateOrderItem, CreateOrderRequest, OrderList, OrderWithItems,
        PayOrderRequest,
    },
    models::{Order, OrderItem, OrderItemView, OrderStatus, Product},
    response::{ApiResponse, Meta},
    routes::{health, orders, params},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::change_order_status,
        orders::pay_order,
    ),
    components(
        schemas(
            Order,
            OrderItem,
            OrderItemView,
            OrderStatus,
            Product,
            CreateOrderItem,
            CreateOrderRequest,
            ChangeOrderStatusRequest,
            PayOrderRequest,
            OrderList,
            OrderWithItems,
            params::OrderListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
