use crate::errors::AppError;
use crate::models::catalog::{ProductSummary, ProductVariantDetail, VariantOption};
use crate::shopify::catalog;
use crate::validation;
use crate::AppState;

/// Products for the admin picker (first 50).
pub async fn get_products(state: &AppState) -> Result<Vec<ProductSummary>, AppError> {
    catalog::list_products(&state.shopify).await
}

/// Variant options for a selected product. Empty when the product id
/// does not resolve.
pub async fn get_variants(
    state: &AppState,
    product_id: &str,
) -> Result<Vec<VariantOption>, AppError> {
    validation::validate_gid(product_id, "Product").map_err(AppError::Validation)?;
    catalog::list_variants(&state.shopify, product_id).await
}

/// Product title plus matched variant title/price for the edit header.
pub async fn get_product_detail(
    state: &AppState,
    product_id: &str,
    variant_id: &str,
) -> Result<ProductVariantDetail, AppError> {
    validation::validate_gid(product_id, "Product").map_err(AppError::Validation)?;
    validation::validate_gid(variant_id, "Variant").map_err(AppError::Validation)?;
    catalog::fetch_product_by_id(&state.shopify, product_id, variant_id).await
}
