//! Reconciliation sweep.
//!
//! The record store is the source of truth; variant metafields are a
//! mirror that can drift (manual edits in the admin, a failed write,
//! an older payload shape). On every paginated listing the sweep
//! re-reads each row's live metafield and rewrites it when it differs.
//! Cost: one remote read plus an optional write per listed row.

use serde_json::Value;

use crate::models::discount::{Discount, DiscountInfo};
use crate::shopify::metafields::{read_discount_metafield, write_discount_metafield};
use crate::shopify::ShopifyClient;
use crate::{log_debug, log_warn};

/// Fields the record store owns that never appear in the mirror.
/// Older payloads that still carry them are not treated as drift.
const STORE_ONLY_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Stringify a JSON value the way the drift comparison needs: bare
/// strings stay bare, integral numbers drop the trailing ".0", so that
/// a metafield holding `"3"` matches a row holding `3`.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    format!("{}", f as i64)
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Whether a raw metafield value already mirrors the row. False on
/// unparseable text, on any field mismatch (by string equality), and
/// on a payload missing one of the mirrored fields.
pub fn metafield_matches(raw: &str, info: &DiscountInfo) -> bool {
    let parsed_map = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => return false,
    };
    let expected = match serde_json::to_value(info) {
        Ok(Value::Object(map)) => map,
        _ => return false,
    };

    // Every mirrored field present and equal
    for (key, want) in &expected {
        match parsed_map.get(key) {
            Some(have) if value_to_string(have) == value_to_string(want) => {}
            _ => return false,
        }
    }

    // Every extra field must be store-only
    for key in parsed_map.keys() {
        if !expected.contains_key(key) && !STORE_ONLY_KEYS.contains(&key.as_str()) {
            return false;
        }
    }

    true
}

/// Re-sync the metafield mirror for each listed discount. Failures on
/// one row are logged and do not stop the sweep — the listing must
/// still render.
pub async fn reconcile_discounts(client: &ShopifyClient, discounts: &[Discount]) {
    for discount in discounts {
        let info = DiscountInfo::from(discount);

        let live = match read_discount_metafield(client, &discount.variant_id).await {
            Ok(live) => live,
            Err(e) => {
                log_warn!("SYNC", &format!(
                    "Skipping reconcile for {}: metafield read failed: {}",
                    discount.variant_id, e
                ));
                continue;
            }
        };

        let in_sync = live.as_deref().map(|raw| metafield_matches(raw, &info)).unwrap_or(false);
        if in_sync {
            continue;
        }

        log_debug!("SYNC", "Rewriting drifted metafield", serde_json::json!({
            "variant_id": discount.variant_id,
            "had_value": live.is_some(),
        }));

        if let Err(e) = write_discount_metafield(client, &info).await {
            log_warn!("SYNC", &format!(
                "Metafield rewrite failed for {}: {}",
                discount.variant_id, e
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DiscountInfo {
        DiscountInfo {
            product_id: "gid://shopify/Product/100".to_string(),
            variant_id: "gid://shopify/ProductVariant/1".to_string(),
            quantity: 3,
            percentage: 50.0,
            sale_message: "Sale!".to_string(),
            store_url: "my-store.myshopify.com".to_string(),
        }
    }

    #[test]
    fn matches_own_serialization() {
        let raw = serde_json::to_string(&info()).unwrap();
        assert!(metafield_matches(&raw, &info()));
    }

    #[test]
    fn matches_numeric_fields_stored_as_strings() {
        let raw = r#"{
            "productId": "gid://shopify/Product/100",
            "variantId": "gid://shopify/ProductVariant/1",
            "quantity": "3",
            "percentage": "50",
            "saleMessage": "Sale!",
            "storeUrl": "my-store.myshopify.com"
        }"#;
        assert!(metafield_matches(raw, &info()));
    }

    #[test]
    fn ignores_store_only_keys() {
        let mut value = serde_json::to_value(info()).unwrap();
        value["id"] = serde_json::json!(42);
        value["createdAt"] = serde_json::json!("2025-04-01T00:00:00Z");
        value["updatedAt"] = serde_json::json!("2025-04-02T00:00:00Z");
        assert!(metafield_matches(&value.to_string(), &info()));
    }

    #[test]
    fn detects_drifted_field() {
        let mut value = serde_json::to_value(info()).unwrap();
        value["percentage"] = serde_json::json!(60.0);
        assert!(!metafield_matches(&value.to_string(), &info()));
    }

    #[test]
    fn detects_missing_field() {
        let mut value = serde_json::to_value(info()).unwrap();
        value.as_object_mut().unwrap().remove("storeUrl");
        assert!(!metafield_matches(&value.to_string(), &info()));
    }

    #[test]
    fn rejects_unknown_extra_field() {
        let mut value = serde_json::to_value(info()).unwrap();
        value["somethingElse"] = serde_json::json!("x");
        assert!(!metafield_matches(&value.to_string(), &info()));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(!metafield_matches("not json", &info()));
        assert!(!metafield_matches("[1, 2]", &info()));
        assert!(!metafield_matches("", &info()));
    }
}
