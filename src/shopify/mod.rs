//! Shopify Admin GraphQL API client.
//!
//! One `ShopifyClient` per app instance; requests are plain POSTs to
//! the shop's `/admin/api/<version>/graphql.json` endpoint with the
//! access token header. Every call carries connect and request
//! timeouts; a timeout surfaces as `AppError::Remote`.

pub mod catalog;
pub mod definitions;
pub mod functions;
pub mod metafields;

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::get_config;
use crate::errors::AppError;
use crate::log_remote;

pub struct ShopifyClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl ShopifyClient {
    /// Build a client from the global configuration.
    pub fn from_config() -> Result<Self, AppError> {
        let config = get_config();
        let token = config
            .shopify
            .admin_token
            .clone()
            .ok_or_else(|| AppError::Internal("SHOPIFY_ADMIN_TOKEN is not set".to_string()))?;

        Self::new(
            config.graphql_endpoint(),
            token,
            config.shopify.request_timeout_secs,
            config.shopify.connect_timeout_secs,
        )
    }

    pub fn new(
        endpoint: String,
        token: String,
        request_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, endpoint, token })
    }

    /// Execute a GraphQL query/mutation and return the `data` payload.
    ///
    /// Top-level GraphQL `errors` and non-2xx HTTP statuses surface as
    /// `AppError::Remote`. Mutation-level `userErrors` are the caller's
    /// responsibility (see `collect_user_errors`).
    pub async fn graphql(&self, query: &str, variables: Option<Value>) -> Result<Value, AppError> {
        let mut body = serde_json::json!({ "query": query });
        if let Some(vars) = variables {
            body["variables"] = vars;
        }

        // Redacting logger: variables may carry tokens or keys.
        log_remote!("GraphQL request", &body);

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "Admin API returned HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        let mut json: Value = response
            .json()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to parse Admin API response: {}", e)))?;

        if let Some(errors) = json.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown error")
                            .to_string()
                    })
                    .collect();
                return Err(AppError::Remote(messages.join("; ")));
            }
        }

        Ok(json.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }
}

/// Flatten a mutation payload's `userErrors` array into messages.
/// Empty when the payload has none.
pub fn collect_user_errors(payload: &Value) -> Vec<String> {
    payload
        .get("userErrors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|e| {
                    let field = e
                        .get("field")
                        .and_then(Value::as_array)
                        .map(|f| {
                            f.iter()
                                .filter_map(Value::as_str)
                                .collect::<Vec<_>>()
                                .join(".")
                        })
                        .unwrap_or_default();
                    let message = e.get("message").and_then(Value::as_str).unwrap_or("");
                    format!("{}: {}", field, message)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_user_errors_flattens_fields() {
        let payload = serde_json::json!({
            "userErrors": [
                { "field": ["metafields", "0", "value"], "message": "Value is invalid" }
            ]
        });
        let errors = collect_user_errors(&payload);
        assert_eq!(errors, vec!["metafields.0.value: Value is invalid"]);
    }

    #[test]
    fn collect_user_errors_empty_when_absent() {
        assert!(collect_user_errors(&serde_json::json!({})).is_empty());
        assert!(collect_user_errors(&serde_json::json!({ "userErrors": [] })).is_empty());
    }
}
