//! Metafield synchronizer.
//!
//! Mirrors a discount row onto its variant as metafield values. The
//! rule payload is double-encoded: the `DiscountInfo` is serialized to
//! JSON text, and that text is the metafield's string value. The
//! storefront theme and the discount function parse it back.

use serde_json::Value;

use super::definitions::{
    ensure_discount_definition, ensure_message_definition, DISCOUNT_KEY, DISCOUNT_NAMESPACE,
    MESSAGE_KEY, MESSAGE_NAMESPACE,
};
use super::{collect_user_errors, ShopifyClient};
use crate::errors::AppError;
use crate::models::discount::DiscountInfo;

const METAFIELDS_SET_MUTATION: &str = "
    mutation VariantMetafieldsSet($metafields: [MetafieldsSetInput!]!) {
        metafieldsSet(metafields: $metafields) {
            metafields {
                id
                key
            }
            userErrors {
                field
                message
                code
            }
        }
    }";

const METAFIELDS_DELETE_MUTATION: &str = "
    mutation MetafieldsDelete($metafields: [MetafieldIdentifierInput!]!) {
        metafieldsDelete(metafields: $metafields) {
            deletedMetafields {
                key
                namespace
                ownerId
            }
            userErrors {
                field
                message
            }
        }
    }";

const VARIANT_METAFIELD_QUERY: &str = "
    query ProductVariantMetafield($namespace: String!, $key: String!, $ownerId: ID!) {
        productVariant(id: $ownerId) {
            metafield(namespace: $namespace, key: $key) {
                value
            }
        }
    }";

async fn set_metafield(
    client: &ShopifyClient,
    owner_id: &str,
    namespace: &str,
    key: &str,
    value: &str,
) -> Result<(), AppError> {
    let data = client
        .graphql(
            METAFIELDS_SET_MUTATION,
            Some(serde_json::json!({
                "metafields": [{
                    "ownerId": owner_id,
                    "namespace": namespace,
                    "key": key,
                    "type": "multi_line_text_field",
                    "value": value,
                }]
            })),
        )
        .await?;

    let payload = data.get("metafieldsSet").cloned().unwrap_or(Value::Null);
    let user_errors = collect_user_errors(&payload);
    if !user_errors.is_empty() {
        return Err(AppError::Remote(format!(
            "metafieldsSet failed for {}.{}: {}",
            namespace,
            key,
            user_errors.join("; ")
        )));
    }

    Ok(())
}

async fn delete_metafield(
    client: &ShopifyClient,
    owner_id: &str,
    namespace: &str,
    key: &str,
) -> Result<(), AppError> {
    let data = client
        .graphql(
            METAFIELDS_DELETE_MUTATION,
            Some(serde_json::json!({
                "metafields": [{
                    "ownerId": owner_id,
                    "namespace": namespace,
                    "key": key,
                }]
            })),
        )
        .await?;

    let payload = data.get("metafieldsDelete").cloned().unwrap_or(Value::Null);
    let user_errors = collect_user_errors(&payload);
    if !user_errors.is_empty() {
        return Err(AppError::Remote(format!(
            "metafieldsDelete failed for {}.{}: {}",
            namespace,
            key,
            user_errors.join("; ")
        )));
    }

    Ok(())
}

/// Write the discount-rule metafield on the variant named by the
/// payload. Ensures the definition exists first.
pub async fn write_discount_metafield(
    client: &ShopifyClient,
    info: &DiscountInfo,
) -> Result<(), AppError> {
    ensure_discount_definition(client).await?;

    let value = serde_json::to_string(info)
        .map_err(|e| AppError::Internal(format!("Failed to serialize discount payload: {}", e)))?;

    set_metafield(client, &info.variant_id, DISCOUNT_NAMESPACE, DISCOUNT_KEY, &value).await
}

/// Delete the discount-rule metafield, then the custom-message
/// metafield. The message delete is a fixed side effect of removing
/// the rule: a variant without a rule must not keep a stale message.
pub async fn delete_discount_metafield(
    client: &ShopifyClient,
    variant_id: &str,
) -> Result<(), AppError> {
    delete_metafield(client, variant_id, DISCOUNT_NAMESPACE, DISCOUNT_KEY).await?;
    delete_custom_message_metafield(client, variant_id).await
}

/// Write the custom-message metafield (plain string, not JSON).
pub async fn write_custom_message_metafield(
    client: &ShopifyClient,
    variant_id: &str,
    message: &str,
) -> Result<(), AppError> {
    ensure_message_definition(client).await?;
    set_metafield(client, variant_id, MESSAGE_NAMESPACE, MESSAGE_KEY, message).await
}

pub async fn delete_custom_message_metafield(
    client: &ShopifyClient,
    variant_id: &str,
) -> Result<(), AppError> {
    delete_metafield(client, variant_id, MESSAGE_NAMESPACE, MESSAGE_KEY).await
}

/// Read the live discount-rule metafield value on a variant. `None`
/// when the variant has no value under the namespace/key (or the
/// variant itself is gone).
pub async fn read_discount_metafield(
    client: &ShopifyClient,
    variant_id: &str,
) -> Result<Option<String>, AppError> {
    let data = client
        .graphql(
            VARIANT_METAFIELD_QUERY,
            Some(serde_json::json!({
                "namespace": DISCOUNT_NAMESPACE,
                "key": DISCOUNT_KEY,
                "ownerId": variant_id,
            })),
        )
        .await?;

    Ok(data
        .pointer("/productVariant/metafield/value")
        .and_then(Value::as_str)
        .map(str::to_string))
}
