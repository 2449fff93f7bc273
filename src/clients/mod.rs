//! Clients for the products service.
//!
//! The order service only sees [`ProductValidator`]; which transport backs it
//! is decided once at startup from [`ProductsTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::{config::ProductsTransport, models::Product};

pub mod http;
pub mod nats;

pub use http::HttpProductClient;
pub use nats::NatsProductClient;

#[derive(Debug, Error)]
pub enum ProductClientError {
    /// The products service could not be reached or did not answer.
    #[error("Products service unavailable: {0}")]
    Unavailable(String),

    /// The products service answered with an error payload.
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        payload: Value,
    },

    #[error("Invalid products service response: {0}")]
    Decode(String),
}

impl ProductClientError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProductClientError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ProductClientError::Unavailable(_) | ProductClientError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            ProductClientError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Builds a rejection from whatever error payload the products service sent.
    ///
    /// Accepts `{status | statusCode, message}` objects, bare strings, and
    /// anything else (kept verbatim under `payload`).
    pub fn rejected(default_status: u16, payload: Value) -> Self {
        let status = payload
            .get("status")
            .or_else(|| payload.get("statusCode"))
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(default_status);
        let message = match &payload {
            Value::String(message) => message.clone(),
            other => match other.get("message") {
                Some(Value::String(message)) => message.clone(),
                Some(Value::Array(messages)) => messages
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => other.to_string(),
            },
        };
        ProductClientError::Rejected {
            status,
            message,
            payload,
        }
    }
}

/// Resolves product ids to product records through the products service.
#[async_trait]
pub trait ProductValidator: Send + Sync {
    async fn validate_products(&self, ids: &[String]) -> Result<Vec<Product>, ProductClientError>;
}

/// Builds the client for the configured transport.
pub async fn connect(transport: &ProductsTransport) -> anyhow::Result<Arc<dyn ProductValidator>> {
    let client: Arc<dyn ProductValidator> = match transport {
        ProductsTransport::Nats { servers } => {
            tracing::info!(servers = ?servers, "using NATS products transport");
            Arc::new(NatsProductClient::connect(servers).await?)
        }
        ProductsTransport::Http { host, port } => {
            tracing::info!(%host, port, "using HTTP products transport");
            Arc::new(HttpProductClient::new(&format!("http://{host}:{port}")))
        }
    };
    Ok(client)
}
