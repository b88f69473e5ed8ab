use serde::{Deserialize, Serialize};

/// A persisted discount rule: buy `quantity` of `variant_id`, get
/// `percentage` off, with `sale_message` shown to the shopper.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Discount {
    pub id: i64,
    pub store_url: String,
    pub product_id: String,
    pub variant_id: String,
    pub quantity: i64,
    pub percentage: f64,
    pub sale_message: String,
    pub custom_message: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscountPayload {
    pub product_id: String,
    pub variant_id: String,
    pub quantity: i64,
    pub percentage: f64,
    pub sale_message: String,
    pub store_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDiscountPayload {
    pub product_id: String,
    pub variant_id: String,
    pub quantity: i64,
    pub percentage: f64,
    pub sale_message: String,
    pub custom_message: String,
    pub store_url: String,
}

/// The metafield mirror of a discount row. Serialized once to JSON text,
/// and that text becomes the metafield's string value (the storefront
/// theme and the discount function both parse it back).
///
/// Namespace `discount_data`, key `discount_info`, owner PRODUCTVARIANT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountInfo {
    pub product_id: String,
    pub variant_id: String,
    pub quantity: i64,
    pub percentage: f64,
    pub sale_message: String,
    pub store_url: String,
}

impl From<&Discount> for DiscountInfo {
    fn from(d: &Discount) -> Self {
        Self {
            product_id: d.product_id.clone(),
            variant_id: d.variant_id.clone(),
            quantity: d.quantity,
            percentage: d.percentage,
            sale_message: d.sale_message.clone(),
            store_url: d.store_url.clone(),
        }
    }
}

/// Pagination block of the listing response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total: i64,
}

/// Listing response envelope: `{success, data, pagination}`
#[derive(Debug, Clone, Serialize)]
pub struct DiscountListResponse {
    pub success: bool,
    pub data: Vec<Discount>,
    pub pagination: Pagination,
}

/// Outcome of the "add discount" flow. "Already exists" is a distinct
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum AddDiscountOutcome {
    Created,
    AlreadyExists,
}

/// Outcome of the "edit discount" flow. A missing target row is a
/// distinct non-success outcome, not a server error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum UpdateDiscountOutcome {
    Updated,
    NotFound,
}

/// Delete response; `page_decrement` tells the client to navigate back
/// one page when the last row on the last page was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDiscountResponse {
    pub success: bool,
    pub page_decrement: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_info_serializes_camel_case() {
        let info = DiscountInfo {
            product_id: "gid://shopify/Product/1".to_string(),
            variant_id: "gid://shopify/ProductVariant/2".to_string(),
            quantity: 3,
            percentage: 50.0,
            sale_message: "Sale!".to_string(),
            store_url: "my-store.myshopify.com".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&info).unwrap();
        assert_eq!(json["productId"], "gid://shopify/Product/1");
        assert_eq!(json["variantId"], "gid://shopify/ProductVariant/2");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["percentage"], 50.0);
        assert_eq!(json["saleMessage"], "Sale!");
        assert_eq!(json["storeUrl"], "my-store.myshopify.com");
    }

    #[test]
    fn discount_info_round_trips() {
        let info = DiscountInfo {
            product_id: "gid://shopify/Product/1".to_string(),
            variant_id: "gid://shopify/ProductVariant/2".to_string(),
            quantity: 5,
            percentage: 12.5,
            sale_message: "Bulk deal".to_string(),
            store_url: "my-store.myshopify.com".to_string(),
        };

        let text = serde_json::to_string(&info).unwrap();
        let back: DiscountInfo = serde_json::from_str(&text).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn delete_response_carries_page_decrement() {
        let resp = DeleteDiscountResponse { success: true, page_decrement: true };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["pageDecrement"], true);
    }
}
