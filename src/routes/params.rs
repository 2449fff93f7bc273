use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::OrderStatus;

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be a positive number"))]
    pub page: u64,
    /// Page size, 1 to 100.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u64,
    pub status: Option<OrderStatus>,
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            status: None,
        }
    }
}

impl OrderListQuery {
    /// Returns `(page, limit, skip)`.
    pub fn normalize(&self) -> (u64, u64, u64) {
        let skip = self.page.saturating_sub(1).saturating_mul(self.limit);
        (self.page, self.limit, skip)
    }
}
