use crate::errors::AppError;
use crate::shopify::functions;
use crate::AppState;

/// Default title/start for the one-time registration.
const DEFAULT_TITLE: &str = "Automatic Discount Sale";
const DEFAULT_STARTS_AT: &str = "2025-04-01T00:00:00";

/// One-time setup: register the deployed product-discount function as
/// an automatic discount. Returns the discount id, or `None` when the
/// function is not deployed yet (a no-op, not an error).
pub async fn register_discount_function(
    state: &AppState,
    title: Option<&str>,
    starts_at: Option<&str>,
) -> Result<Option<String>, AppError> {
    functions::register_automatic_discount(
        &state.shopify,
        title.unwrap_or(DEFAULT_TITLE),
        starts_at.unwrap_or(DEFAULT_STARTS_AT),
    )
    .await
}
