//! One-time setup: register the deployed discount function as an
//! automatic discount.

use serde_json::Value;

use super::{collect_user_errors, ShopifyClient};
use crate::errors::AppError;
use crate::log_info;

const FUNCTIONS_QUERY: &str = "
    query ShopifyFunctions {
        shopifyFunctions(first: 50) {
            edges {
                node {
                    app {
                        title
                    }
                    id
                    title
                    apiType
                }
            }
        }
    }";

const AUTOMATIC_DISCOUNT_CREATE_MUTATION: &str = "
    mutation discountAutomaticAppCreate($automaticAppDiscount: DiscountAutomaticAppInput!) {
        discountAutomaticAppCreate(automaticAppDiscount: $automaticAppDiscount) {
            automaticAppDiscount {
                discountId
            }
            userErrors {
                field
                message
            }
        }
    }";

/// Find this app's product-discount function and create an automatic
/// discount backed by it. Returns the new discount id, or `None` when
/// no product-discount function is deployed yet (nothing to register).
pub async fn register_automatic_discount(
    client: &ShopifyClient,
    title: &str,
    starts_at: &str,
) -> Result<Option<String>, AppError> {
    let data = client.graphql(FUNCTIONS_QUERY, None).await?;

    let function_id = data
        .pointer("/shopifyFunctions/edges")
        .and_then(Value::as_array)
        .and_then(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .find(|node| {
                    node.get("apiType").and_then(Value::as_str) == Some("product_discounts")
                })
        })
        .and_then(|node| node.get("id").and_then(Value::as_str))
        .map(str::to_string);

    let Some(function_id) = function_id else {
        return Ok(None);
    };

    let data = client
        .graphql(
            AUTOMATIC_DISCOUNT_CREATE_MUTATION,
            Some(serde_json::json!({
                "automaticAppDiscount": {
                    "title": title,
                    "functionId": function_id,
                    "startsAt": starts_at,
                }
            })),
        )
        .await?;

    let payload = data
        .get("discountAutomaticAppCreate")
        .cloned()
        .unwrap_or(Value::Null);

    let user_errors = collect_user_errors(&payload);
    if !user_errors.is_empty() {
        return Err(AppError::Remote(format!(
            "discountAutomaticAppCreate failed: {}",
            user_errors.join("; ")
        )));
    }

    let discount_id = payload
        .pointer("/automaticAppDiscount/discountId")
        .and_then(Value::as_str)
        .map(str::to_string);

    log_info!("SHOPIFY", "Automatic discount registered", serde_json::json!({
        "function_id": function_id,
        "discount_id": discount_id,
    }));

    Ok(discount_id)
}
