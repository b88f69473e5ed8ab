//! Product and variant lookups for the admin pickers.

use serde_json::Value;

use super::ShopifyClient;
use crate::errors::AppError;
use crate::models::catalog::{ProductSummary, ProductVariantDetail, VariantOption};

const PRODUCTS_QUERY: &str = "
    query Products {
        products(first: 50) {
            edges {
                node {
                    id
                    title
                }
            }
        }
    }";

const VARIANTS_QUERY: &str = "
    query GetVariants($id: ID!) {
        product(id: $id) {
            variants(first: 20) {
                edges {
                    node {
                        id
                        title
                        price
                    }
                }
            }
        }
    }";

const PRODUCT_WITH_VARIANTS_QUERY: &str = "
    query GetProductWithVariants($productId: ID!) {
        product(id: $productId) {
            title
            variants(first: 50) {
                edges {
                    node {
                        id
                        title
                        price
                    }
                }
            }
        }
    }";

fn node_str(node: &Value, field: &str) -> String {
    node.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// First 50 products of the shop, for the product picker.
pub async fn list_products(client: &ShopifyClient) -> Result<Vec<ProductSummary>, AppError> {
    let data = client.graphql(PRODUCTS_QUERY, None).await?;

    let products = data
        .pointer("/products/edges")
        .and_then(Value::as_array)
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .map(|node| ProductSummary {
                    id: node_str(node, "id"),
                    title: node_str(node, "title"),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(products)
}

/// Variant options for one product. Empty when the product is missing.
pub async fn list_variants(
    client: &ShopifyClient,
    product_id: &str,
) -> Result<Vec<VariantOption>, AppError> {
    let data = client
        .graphql(VARIANTS_QUERY, Some(serde_json::json!({ "id": product_id })))
        .await?;

    let variants = data
        .pointer("/product/variants/edges")
        .and_then(Value::as_array)
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .map(|node| VariantOption {
                    id: node_str(node, "id"),
                    title: node_str(node, "title"),
                    price: node_str(node, "price"),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(variants)
}

/// Product title plus the matched variant's title/price, for the edit
/// page header.
pub async fn fetch_product_by_id(
    client: &ShopifyClient,
    product_id: &str,
    variant_id: &str,
) -> Result<ProductVariantDetail, AppError> {
    let data = client
        .graphql(
            PRODUCT_WITH_VARIANTS_QUERY,
            Some(serde_json::json!({ "productId": product_id })),
        )
        .await?;

    let product = data
        .get("product")
        .filter(|p| !p.is_null())
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;

    let matched = product
        .pointer("/variants/edges")
        .and_then(Value::as_array)
        .and_then(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge.get("node"))
                .find(|node| node.get("id").and_then(Value::as_str) == Some(variant_id))
        });

    Ok(ProductVariantDetail {
        product_title: node_str(product, "title"),
        variant_title: matched.map(|n| node_str(n, "title")),
        variant_price: matched.map(|n| node_str(n, "price")),
    })
}
