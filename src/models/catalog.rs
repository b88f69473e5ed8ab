use serde::{Deserialize, Serialize};

/// Product as shown in the admin product picker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
}

/// Variant option for a selected product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantOption {
    pub id: String,
    pub title: String,
    pub price: String,
}

/// Product + matched variant detail for the edit page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantDetail {
    pub product_title: String,
    pub variant_title: Option<String>,
    pub variant_price: Option<String>,
}
