//! Metafield definition manager.
//!
//! A metafield definition must exist before a value can be written
//! under its (namespace, key). `ensure_definition` is idempotent and
//! called before every write. Concurrent first-time creation is not
//! transaction-protected; for single-operator admin traffic the worst
//! case is a rejected duplicate create.

use serde_json::Value;

use super::{collect_user_errors, ShopifyClient};
use crate::errors::AppError;

/// Namespace/key of the discount-rule metafield on a variant.
pub const DISCOUNT_NAMESPACE: &str = "discount_data";
pub const DISCOUNT_KEY: &str = "discount_info";

/// Namespace/key of the secondary custom-message metafield.
pub const MESSAGE_NAMESPACE: &str = "discount_data_msg";
pub const MESSAGE_KEY: &str = "discount_msg";

/// Metafields here always hang off a product variant.
pub const VARIANT_OWNER_TYPE: &str = "PRODUCTVARIANT";

const DEFINITION_CHECK_QUERY: &str = "
    query DiscountDefinitionCheck($namespace: String!, $key: String!, $ownerType: MetafieldOwnerType!) {
        metafieldDefinitions(first: 1, namespace: $namespace, key: $key, ownerType: $ownerType) {
            edges {
                node {
                    id
                    name
                }
            }
        }
    }";

const DEFINITION_CREATE_MUTATION: &str = "
    mutation CreateMetafieldDefinition($definition: MetafieldDefinitionInput!) {
        metafieldDefinitionCreate(definition: $definition) {
            createdDefinition {
                id
                name
            }
            userErrors {
                field
                message
                code
            }
        }
    }";

/// Return the id of the definition for (namespace, key, owner_type),
/// creating it with a fixed `multi_line_text_field` schema when absent.
pub async fn ensure_definition(
    client: &ShopifyClient,
    namespace: &str,
    key: &str,
    owner_type: &str,
    name: &str,
    description: &str,
) -> Result<String, AppError> {
    let data = client
        .graphql(
            DEFINITION_CHECK_QUERY,
            Some(serde_json::json!({
                "namespace": namespace,
                "key": key,
                "ownerType": owner_type,
            })),
        )
        .await?;

    let existing = data
        .pointer("/metafieldDefinitions/edges/0/node/id")
        .and_then(Value::as_str);
    if let Some(id) = existing {
        return Ok(id.to_string());
    }

    let data = client
        .graphql(
            DEFINITION_CREATE_MUTATION,
            Some(serde_json::json!({
                "definition": {
                    "name": name,
                    "namespace": namespace,
                    "key": key,
                    "description": description,
                    "type": "multi_line_text_field",
                    "ownerType": owner_type,
                }
            })),
        )
        .await?;

    let payload = data
        .get("metafieldDefinitionCreate")
        .cloned()
        .unwrap_or(Value::Null);

    let user_errors = collect_user_errors(&payload);
    if !user_errors.is_empty() {
        return Err(AppError::Remote(user_errors.join("; ")));
    }

    payload
        .pointer("/createdDefinition/id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::DefinitionCreationFailed {
            namespace: namespace.to_string(),
            key: key.to_string(),
        })
}

/// Convenience wrapper for the discount-info definition.
pub async fn ensure_discount_definition(client: &ShopifyClient) -> Result<String, AppError> {
    ensure_definition(
        client,
        DISCOUNT_NAMESPACE,
        DISCOUNT_KEY,
        VARIANT_OWNER_TYPE,
        "Discount Info",
        "Discount information related to product variants.",
    )
    .await
}

/// Convenience wrapper for the custom-message definition.
pub async fn ensure_message_definition(client: &ShopifyClient) -> Result<String, AppError> {
    ensure_definition(
        client,
        MESSAGE_NAMESPACE,
        MESSAGE_KEY,
        VARIANT_OWNER_TYPE,
        "Discount Message",
        "Discount custom message related to product variants.",
    )
    .await
}
