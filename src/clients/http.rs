use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ProductClientError, ProductValidator};
use crate::models::Product;

#[derive(Serialize)]
struct ValidateProductsRequest<'a> {
    ids: &'a [String],
}

/// Accepts either a bare product array or the `{data: [...]}` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ValidateProductsResponse {
    List(Vec<Product>),
    Envelope { data: Vec<Product> },
}

/// Products service reached over HTTP.
pub struct HttpProductClient {
    client: Client,
    base_url: String,
}

impl HttpProductClient {
    /// `base_url` is the service root, e.g. `http://products:3001`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ProductValidator for HttpProductClient {
    async fn validate_products(&self, ids: &[String]) -> Result<Vec<Product>, ProductClientError> {
        let response = self
            .client
            .post(format!("{}/api/products/validate", self.base_url))
            .json(&ValidateProductsRequest { ids })
            .send()
            .await
            .map_err(|e| ProductClientError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProductClientError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            let payload = serde_json::from_slice::<Value>(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
            return Err(ProductClientError::rejected(status.as_u16(), payload));
        }

        decode_products(&body)
    }
}

fn decode_products(body: &[u8]) -> Result<Vec<Product>, ProductClientError> {
    match serde_json::from_slice::<ValidateProductsResponse>(body) {
        Ok(ValidateProductsResponse::List(products)) => Ok(products),
        Ok(ValidateProductsResponse::Envelope { data }) => Ok(data),
        Err(e) => Err(ProductClientError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_list_and_envelope() {
        let list = decode_products(br#"[{"id": "P1", "name": "A", "price": 10}]"#).unwrap();
        assert_eq!(list[0].name, "A");

        let wrapped = decode_products(br#"{"data": [{"id": 2, "name": "B", "price": 5.5}]}"#).unwrap();
        assert_eq!(wrapped[0].id, "2");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_products(b"{\"ok\": true}"),
            Err(ProductClientError::Decode(_))
        ));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = HttpProductClient::new("http://products:3001/");
        assert_eq!(client.base_url, "http://products:3001");
    }
}
