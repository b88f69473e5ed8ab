//! Input validation module
//!
//! Centralized validation for the admin form payloads:
//! - Shopify global IDs (products, variants)
//! - Discount rule fields (quantity threshold, percentage)
//! - Shopper-facing messages
//! - Pagination query parameters

/// Validation result type
pub type ValidationResult = Result<(), String>;

/// Validate a Shopify global ID, e.g. "gid://shopify/ProductVariant/123"
pub fn validate_gid(gid: &str, resource: &str) -> ValidationResult {
    let trimmed = gid.trim();

    if trimmed.is_empty() {
        return Err("Missing required fields".into());
    }

    if trimmed.len() > 256 {
        return Err(format!("{} id is too long", resource));
    }

    if !trimmed.starts_with("gid://shopify/") {
        return Err(format!("{} id must be a Shopify global id", resource));
    }

    Ok(())
}

/// Validate the quantity threshold (minimum cart quantity)
pub fn validate_quantity(quantity: i64) -> ValidationResult {
    if quantity < 1 {
        return Err("Quantity must be at least 1".into());
    }

    if quantity > 1_000_000 {
        return Err("Quantity is too large".into());
    }

    Ok(())
}

/// Validate the discount percentage: must be in (0, 100]
pub fn validate_percentage(percentage: f64) -> ValidationResult {
    if percentage.is_nan() || percentage.is_infinite() {
        return Err("Percentage is not a valid number".into());
    }

    if percentage <= 0.0 {
        return Err("Percentage must be greater than 0".into());
    }

    if percentage > 100.0 {
        return Err("Percentage cannot exceed 100".into());
    }

    Ok(())
}

/// Validate the shopper-facing sale message
pub fn validate_sale_message(message: &str) -> ValidationResult {
    let trimmed = message.trim();

    if trimmed.is_empty() {
        return Err("Missing required fields".into());
    }

    if trimmed.len() > 500 {
        return Err("Sale message is too long (max 500 characters)".into());
    }

    Ok(())
}

/// Validate the optional custom message metafield value
pub fn validate_custom_message(message: &str) -> ValidationResult {
    let trimmed = message.trim();

    if trimmed.is_empty() {
        return Err("Missing required fields".into());
    }

    if trimmed.len() > 500 {
        return Err("Custom message is too long (max 500 characters)".into());
    }

    Ok(())
}

/// Validate the tenant store URL (shop domain from the session)
pub fn validate_store_url(store_url: &str) -> ValidationResult {
    let trimmed = store_url.trim();

    if trimmed.is_empty() {
        return Err("Missing required fields".into());
    }

    if trimmed.len() > 254 {
        return Err("Store URL is too long".into());
    }

    if !trimmed.chars().all(|c| c.is_alphanumeric() || ".-".contains(c)) {
        return Err("Store URL may only contain letters, digits, '.' and '-'".into());
    }

    Ok(())
}

/// Validate listing query parameters; returns (page, limit) with defaults
/// applied (page=1, limit=2).
pub fn validate_page_params(page: Option<i64>, limit: Option<i64>) -> Result<(i64, i64), String> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(2);

    if page < 1 {
        return Err("Page must be at least 1".into());
    }

    if limit < 1 || limit > 100 {
        return Err("Limit must be between 1 and 100".into());
    }

    Ok((page, limit))
}

/// Combined validation for the "add discount" form
pub struct CreateDiscountValidation<'a> {
    pub product_id: &'a str,
    pub variant_id: &'a str,
    pub quantity: i64,
    pub percentage: f64,
    pub sale_message: &'a str,
    pub store_url: &'a str,
}

pub fn validate_create_discount(data: &CreateDiscountValidation) -> ValidationResult {
    validate_gid(data.product_id, "Product")?;
    validate_gid(data.variant_id, "Variant")?;
    validate_quantity(data.quantity)?;
    validate_percentage(data.percentage)?;
    validate_sale_message(data.sale_message)?;
    validate_store_url(data.store_url)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_gid() {
        assert!(validate_gid("gid://shopify/ProductVariant/50246121259319", "Variant").is_ok());
    }

    #[test]
    fn rejects_plain_numeric_id() {
        assert!(validate_gid("50246121259319", "Variant").is_err());
        assert!(validate_gid("", "Variant").is_err());
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(3).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage(0.5).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(0.0).is_err());
        assert!(validate_percentage(100.1).is_err());
        assert!(validate_percentage(f64::NAN).is_err());
    }

    #[test]
    fn store_url_charset_and_length() {
        assert!(validate_store_url("my-store.myshopify.com").is_ok());
        assert!(validate_store_url("shop123.myshopify.com").is_ok());
        assert_eq!(validate_store_url("").unwrap_err(), "Missing required fields");
        assert_eq!(validate_store_url("   ").unwrap_err(), "Missing required fields");
        assert!(validate_store_url("my store.myshopify.com").is_err());
        assert!(validate_store_url("https://my-store.myshopify.com").is_err());
        assert!(validate_store_url(&"a".repeat(255)).is_err());
    }

    #[test]
    fn custom_message_bounds() {
        assert!(validate_custom_message("Limited time offer").is_ok());
        assert_eq!(validate_custom_message("  ").unwrap_err(), "Missing required fields");
        assert!(validate_custom_message(&"x".repeat(500)).is_ok());
        assert!(validate_custom_message(&"x".repeat(501)).is_err());
    }

    #[test]
    fn page_params_defaults() {
        assert_eq!(validate_page_params(None, None).unwrap(), (1, 2));
        assert_eq!(validate_page_params(Some(3), Some(10)).unwrap(), (3, 10));
        assert!(validate_page_params(Some(0), None).is_err());
        assert!(validate_page_params(None, Some(0)).is_err());
    }

    #[test]
    fn create_discount_requires_all_fields() {
        let valid = CreateDiscountValidation {
            product_id: "gid://shopify/Product/1",
            variant_id: "gid://shopify/ProductVariant/2",
            quantity: 3,
            percentage: 50.0,
            sale_message: "Sale!",
            store_url: "my-store.myshopify.com",
        };
        assert!(validate_create_discount(&valid).is_ok());

        let missing_msg = CreateDiscountValidation { sale_message: "  ", ..valid };
        assert_eq!(
            validate_create_discount(&missing_msg).unwrap_err(),
            "Missing required fields"
        );
    }
}
