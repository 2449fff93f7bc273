use std::sync::Arc;

use crate::{clients::ProductValidator, repository::OrderRepository};

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub products: Arc<dyn ProductValidator>,
}

impl AppState {
    pub fn new(orders: Arc<dyn OrderRepository>, products: Arc<dyn ProductValidator>) -> Self {
        Self { orders, products }
    }
}
