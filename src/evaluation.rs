//! Discount evaluation function.
//!
//! Pure cart evaluation, invoked by the platform per checkout event.
//! Each cart line arrives with the variant's discount-rule metafield
//! already resolved onto it; the function parses the rule and emits a
//! percentage discount when the line quantity meets the threshold.
//! No I/O, no external calls — a malformed or mismatched rule skips
//! the line, it never fails the run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::log_debug;

pub const FALLBACK_MESSAGE: &str = "Special Discount";

// ---- Input shape (resolved by the platform) ----

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionInput {
    pub cart: Cart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: i64,
    pub merchandise: Merchandise,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Merchandise {
    pub id: String,
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metafield {
    pub value: String,
}

// ---- Output shape (Shopify function result) ----

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountApplicationStrategy {
    First,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    pub discount_application_strategy: DiscountApplicationStrategy,
    pub discounts: Vec<DiscountEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountEntry {
    pub targets: Vec<Target>,
    pub value: DiscountValue,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub cart_line: CartLineTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineTarget {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountValue {
    pub percentage: Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentage {
    pub value: String,
}

/// Rule extracted from a line's metafield. `None` when the payload is
/// malformed, names a different variant, or has non-numeric fields.
struct LineRule {
    quantity: i64,
    percentage: f64,
    sale_message: Option<String>,
}

fn parse_rule(raw: &str, merchandise_id: &str) -> Option<LineRule> {
    let parsed: Value = serde_json::from_str(raw).ok()?;

    let rule_variant = parsed.get("variantId")?.as_str()?;
    if rule_variant != merchandise_id {
        return None;
    }

    let quantity = parsed.get("quantity")?.as_i64()?;
    let percentage = parsed.get("percentage")?.as_f64()?;

    let sale_message = parsed
        .get("saleMessage")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(LineRule { quantity, percentage, sale_message })
}

/// "50" rather than "50.0" for whole percentages, matching what the
/// admin wrote into the rule.
fn format_percentage(percentage: f64) -> String {
    if percentage.fract() == 0.0 {
        format!("{}", percentage as i64)
    } else {
        percentage.to_string()
    }
}

/// Evaluate the cart. Zero qualifying lines yields the fixed empty
/// result (strategy FIRST, no discounts); otherwise strategy ALL with
/// one entry per qualifying line.
pub fn run(input: &FunctionInput) -> FunctionResult {
    let mut discounts = Vec::new();

    for line in &input.cart.lines {
        let Some(metafield) = &line.merchandise.metafield else {
            continue;
        };

        let Some(rule) = parse_rule(&metafield.value, &line.merchandise.id) else {
            log_debug!("EVALUATE", &format!(
                "Skipping line {}: missing or malformed discount rule",
                line.id
            ));
            continue;
        };

        if line.quantity >= rule.quantity {
            discounts.push(DiscountEntry {
                targets: vec![Target {
                    cart_line: CartLineTarget { id: line.id.clone() },
                }],
                value: DiscountValue {
                    percentage: Percentage { value: format_percentage(rule.percentage) },
                },
                message: rule.sale_message.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            });
        }
    }

    if discounts.is_empty() {
        log_debug!("EVALUATE", "No qualifying variants for discount");
        return FunctionResult {
            discount_application_strategy: DiscountApplicationStrategy::First,
            discounts: vec![],
        };
    }

    FunctionResult {
        discount_application_strategy: DiscountApplicationStrategy::All,
        discounts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_json(variant_id: &str, quantity: i64, percentage: f64, message: &str) -> String {
        serde_json::json!({
            "productId": "gid://shopify/Product/100",
            "variantId": variant_id,
            "quantity": quantity,
            "percentage": percentage,
            "saleMessage": message,
            "storeUrl": "my-store.myshopify.com"
        })
        .to_string()
    }

    fn line(id: &str, variant_id: &str, quantity: i64, metafield: Option<String>) -> CartLine {
        CartLine {
            id: id.to_string(),
            quantity,
            merchandise: Merchandise {
                id: variant_id.to_string(),
                metafield: metafield.map(|value| Metafield { value }),
            },
        }
    }

    fn cart(lines: Vec<CartLine>) -> FunctionInput {
        FunctionInput { cart: Cart { lines } }
    }

    const V1: &str = "gid://shopify/ProductVariant/1";
    const V2: &str = "gid://shopify/ProductVariant/2";

    #[test]
    fn emits_discount_when_quantity_meets_threshold() {
        let input = cart(vec![line("l1", V1, 3, Some(rule_json(V1, 3, 50.0, "Sale!")))]);
        let result = run(&input);

        assert_eq!(result.discount_application_strategy, DiscountApplicationStrategy::All);
        assert_eq!(result.discounts.len(), 1);
        let entry = &result.discounts[0];
        assert_eq!(entry.targets[0].cart_line.id, "l1");
        assert_eq!(entry.value.percentage.value, "50");
        assert_eq!(entry.message, "Sale!");
    }

    #[test]
    fn no_discount_below_threshold() {
        let input = cart(vec![line("l1", V1, 2, Some(rule_json(V1, 3, 50.0, "Sale!")))]);
        let result = run(&input);

        assert_eq!(result.discount_application_strategy, DiscountApplicationStrategy::First);
        assert!(result.discounts.is_empty());
    }

    #[test]
    fn exactly_one_entry_per_qualifying_line() {
        let input = cart(vec![
            line("l1", V1, 5, Some(rule_json(V1, 3, 50.0, "Sale!"))),
            line("l2", V2, 1, Some(rule_json(V2, 3, 60.0, "Big sale"))),
        ]);
        let result = run(&input);

        assert_eq!(result.discounts.len(), 1);
        assert_eq!(result.discounts[0].targets[0].cart_line.id, "l1");
    }

    #[test]
    fn malformed_payload_is_skipped_silently() {
        let input = cart(vec![
            line("l1", V1, 5, Some("not json at all".to_string())),
            line("l2", V2, 5, Some(rule_json(V2, 2, 25.0, "Deal"))),
        ]);
        let result = run(&input);

        assert_eq!(result.discounts.len(), 1);
        assert_eq!(result.discounts[0].targets[0].cart_line.id, "l2");
    }

    #[test]
    fn mismatched_variant_id_is_skipped() {
        // Rule names V2 but rides on V1's line
        let input = cart(vec![line("l1", V1, 5, Some(rule_json(V2, 3, 50.0, "Sale!")))]);
        let result = run(&input);

        assert!(result.discounts.is_empty());
    }

    #[test]
    fn non_numeric_fields_are_skipped() {
        let raw = serde_json::json!({
            "variantId": V1,
            "quantity": "lots",
            "percentage": 50.0,
            "saleMessage": "Sale!"
        })
        .to_string();
        let input = cart(vec![line("l1", V1, 5, Some(raw))]);

        assert!(run(&input).discounts.is_empty());
    }

    #[test]
    fn missing_metafield_is_skipped() {
        let input = cart(vec![line("l1", V1, 5, None)]);
        assert!(run(&input).discounts.is_empty());
    }

    #[test]
    fn missing_sale_message_uses_fallback() {
        let raw = serde_json::json!({
            "variantId": V1,
            "quantity": 1,
            "percentage": 10.0
        })
        .to_string();
        let input = cart(vec![line("l1", V1, 1, Some(raw))]);

        assert_eq!(run(&input).discounts[0].message, FALLBACK_MESSAGE);
    }

    #[test]
    fn evaluation_is_pure() {
        let input = cart(vec![line("l1", V1, 3, Some(rule_json(V1, 3, 12.5, "Sale!")))]);
        assert_eq!(run(&input), run(&input));
    }

    #[test]
    fn output_serializes_to_platform_shape() {
        let input = cart(vec![line("l1", V1, 3, Some(rule_json(V1, 3, 50.0, "Sale!")))]);
        let json = serde_json::to_value(run(&input)).unwrap();

        assert_eq!(json["discountApplicationStrategy"], "ALL");
        assert_eq!(json["discounts"][0]["targets"][0]["cartLine"]["id"], "l1");
        assert_eq!(json["discounts"][0]["value"]["percentage"]["value"], "50");
        assert_eq!(json["discounts"][0]["message"], "Sale!");
    }

    #[test]
    fn empty_result_serializes_with_first_strategy() {
        let json = serde_json::to_value(run(&cart(vec![]))).unwrap();
        assert_eq!(json["discountApplicationStrategy"], "FIRST");
        assert_eq!(json["discounts"], serde_json::json!([]));
    }

    #[test]
    fn fractional_percentage_keeps_fraction() {
        let input = cart(vec![line("l1", V1, 3, Some(rule_json(V1, 3, 12.5, "Sale!")))]);
        assert_eq!(run(&input).discounts[0].value.percentage.value, "12.5");
    }
}
