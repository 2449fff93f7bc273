use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{ProductClientError, ProductValidator};
use crate::models::Product;

const VALIDATE_PRODUCTS_CMD: &str = "validate_products";

/// Request envelope understood by message-pattern handlers on the bus.
#[derive(Serialize)]
struct PatternRequest<'a, T: Serialize> {
    pattern: &'a Value,
    data: T,
    id: String,
}

#[derive(Deserialize)]
struct PatternReply {
    #[serde(default)]
    err: Option<Value>,
    #[serde(default)]
    response: Option<Value>,
}

/// Products service reached through NATS request/reply.
pub struct NatsProductClient {
    client: async_nats::Client,
}

impl NatsProductClient {
    pub async fn connect(servers: &[String]) -> Result<Self, async_nats::ConnectError> {
        let client = async_nats::connect(servers.join(",")).await?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProductValidator for NatsProductClient {
    async fn validate_products(&self, ids: &[String]) -> Result<Vec<Product>, ProductClientError> {
        let pattern = json!({ "cmd": VALIDATE_PRODUCTS_CMD });
        let (subject, payload) = encode_request(&pattern, ids)?;

        let message = self
            .client
            .request(subject, payload.into())
            .await
            .map_err(|e| ProductClientError::Unavailable(e.to_string()))?;

        decode_reply(&message.payload)
    }
}

fn encode_request(pattern: &Value, ids: &[String]) -> Result<(String, Vec<u8>), ProductClientError> {
    let subject = pattern.to_string();
    let request = PatternRequest {
        pattern,
        data: ids,
        id: Uuid::new_v4().to_string(),
    };
    let payload =
        serde_json::to_vec(&request).map_err(|e| ProductClientError::Decode(e.to_string()))?;
    Ok((subject, payload))
}

fn decode_reply(payload: &[u8]) -> Result<Vec<Product>, ProductClientError> {
    let reply: PatternReply =
        serde_json::from_slice(payload).map_err(|e| ProductClientError::Decode(e.to_string()))?;

    if let Some(err) = reply.err.filter(|err| !err.is_null()) {
        return Err(ProductClientError::rejected(400, err));
    }

    let response = reply
        .response
        .ok_or_else(|| ProductClientError::Decode("reply carried no response".into()))?;
    serde_json::from_value(response).map_err(|e| ProductClientError::Decode(e.to_string()))
}
