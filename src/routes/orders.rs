use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use crate::{
    dto::orders::{
        ChangeOrderStatusRequest, CreateOrderRequest, OrderList, OrderWithItems, PayOrderRequest,
    },
    error::AppResult,
    middleware::validation::{OrderId, ValidatedJson, ValidatedQuery},
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(change_order_status))
        .route("/{id}/pay", post(pay_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Invalid payload or rejected products"),
        (status = 502, description = "Products service unavailable"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let response = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Page of orders", body = ApiResponse<OrderList>),
        (status = 400, description = "Invalid pagination or status"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(order_service::list_orders(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = uuid::Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Products service unavailable"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    OrderId(id): OrderId,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    Ok(Json(order_service::get_order(&state, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(("id" = uuid::Uuid, Path, description = "Order ID")),
    request_body = ChangeOrderStatusRequest,
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Products service unavailable"),
    ),
    tag = "Orders"
)]
pub async fn change_order_status(
    State(state): State<AppState>,
    OrderId(id): OrderId,
    ValidatedJson(payload): ValidatedJson<ChangeOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    Ok(Json(
        order_service::change_order_status(&state, id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/pay",
    params(("id" = uuid::Uuid, Path, description = "Order ID")),
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Payment recorded", body = ApiResponse<Order>),
        (status = 400, description = "Order already paid"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    OrderId(id): OrderId,
    ValidatedJson(payload): ValidatedJson<PayOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(order_service::pay_order(&state, id, payload).await?))
}
