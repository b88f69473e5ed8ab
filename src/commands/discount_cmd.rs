use crate::database::repository;
use crate::errors::AppError;
use crate::models::catalog::ProductVariantDetail;
use crate::models::discount::{
    AddDiscountOutcome, CreateDiscountPayload, DeleteDiscountResponse, Discount,
    DiscountInfo, DiscountListResponse, Pagination, UpdateDiscountOutcome,
    UpdateDiscountPayload,
};
use crate::shopify::{catalog, metafields};
use crate::validation;
use crate::AppState;
use crate::{log_error, log_info};

/// Ceiling division for the pagination block; 0 rows means 0 pages.
fn total_pages(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Paginated listing for the admin table. Defaults: page=1, limit=2.
/// Every call runs the reconciliation sweep over the returned page so
/// metafield state converges to the record store on read.
pub async fn get_discounts(
    state: &AppState,
    store_url: &str,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<DiscountListResponse, AppError> {
    validation::validate_store_url(store_url).map_err(AppError::Validation)?;
    let (page, limit) =
        validation::validate_page_params(page, limit).map_err(AppError::Validation)?;

    let skip = (page - 1) * limit;
    let (discounts, total) = repository::find_page(&state.db, store_url, skip, limit).await?;

    crate::sync::reconcile_discounts(&state.shopify, &discounts).await;

    Ok(DiscountListResponse {
        success: true,
        data: discounts,
        pagination: Pagination {
            page,
            limit,
            total_pages: total_pages(total, limit),
            total,
        },
    })
}

/// "Add discount" flow: guard with a lookup, mirror to the metafield,
/// then insert the row. An existing row for the (store, variant) pair
/// is a distinct outcome, not an error. Note the guard is check-then-
/// act: two concurrent adds for the same variant can both pass.
pub async fn add_discount(
    state: &AppState,
    payload: CreateDiscountPayload,
) -> Result<AddDiscountOutcome, AppError> {
    validation::validate_create_discount(&validation::CreateDiscountValidation {
        product_id: &payload.product_id,
        variant_id: &payload.variant_id,
        quantity: payload.quantity,
        percentage: payload.percentage,
        sale_message: &payload.sale_message,
        store_url: &payload.store_url,
    })
    .map_err(AppError::Validation)?;

    let existing =
        repository::find_one(&state.db, &payload.variant_id, &payload.store_url, None).await?;
    if existing.is_some() {
        return Ok(AddDiscountOutcome::AlreadyExists);
    }

    let info = DiscountInfo {
        product_id: payload.product_id.clone(),
        variant_id: payload.variant_id.clone(),
        quantity: payload.quantity,
        percentage: payload.percentage,
        sale_message: payload.sale_message.clone(),
        store_url: payload.store_url.clone(),
    };
    metafields::write_discount_metafield(&state.shopify, &info).await?;

    repository::create(&state.db, &payload).await?;

    log_info!("DISCOUNT", "Discount created", serde_json::json!({
        "variant_id": payload.variant_id,
        "store_url": payload.store_url,
        "quantity": payload.quantity,
        "percentage": payload.percentage,
    }));

    Ok(AddDiscountOutcome::Created)
}

/// "Edit discount" flow: rewrite both metafields, then update the row
/// found by (variant, store, product). A missing row is the NotFound
/// outcome, distinct from a server error.
pub async fn update_discount(
    state: &AppState,
    payload: UpdateDiscountPayload,
) -> Result<UpdateDiscountOutcome, AppError> {
    validation::validate_create_discount(&validation::CreateDiscountValidation {
        product_id: &payload.product_id,
        variant_id: &payload.variant_id,
        quantity: payload.quantity,
        percentage: payload.percentage,
        sale_message: &payload.sale_message,
        store_url: &payload.store_url,
    })
    .map_err(AppError::Validation)?;
    validation::validate_custom_message(&payload.custom_message).map_err(AppError::Validation)?;

    // The rule metafield never carries the custom message; that lives
    // in its own namespace.
    let info = DiscountInfo {
        product_id: payload.product_id.clone(),
        variant_id: payload.variant_id.clone(),
        quantity: payload.quantity,
        percentage: payload.percentage,
        sale_message: payload.sale_message.clone(),
        store_url: payload.store_url.clone(),
    };
    metafields::write_discount_metafield(&state.shopify, &info).await?;
    metafields::write_custom_message_metafield(
        &state.shopify,
        &payload.variant_id,
        &payload.custom_message,
    )
    .await?;

    let existing = repository::find_one(
        &state.db,
        &payload.variant_id,
        &payload.store_url,
        Some(&payload.product_id),
    )
    .await?;

    let Some(existing) = existing else {
        return Ok(UpdateDiscountOutcome::NotFound);
    };

    repository::update(&state.db, existing.id, &payload).await?;

    log_info!("DISCOUNT", "Discount updated", serde_json::json!({
        "id": existing.id,
        "variant_id": payload.variant_id,
    }));

    Ok(UpdateDiscountOutcome::Updated)
}

/// "Delete discount" flow: remove the rows, then both metafields.
/// `page_decrement` tells the client to step back one page when it was
/// showing the last remaining row of the last page.
pub async fn delete_discount(
    state: &AppState,
    store_url: &str,
    variant_id: &str,
) -> Result<DeleteDiscountResponse, AppError> {
    validation::validate_store_url(store_url).map_err(AppError::Validation)?;
    validation::validate_gid(variant_id, "Variant").map_err(AppError::Validation)?;

    let removed = repository::delete_many(&state.db, store_url, variant_id).await?;

    if let Err(e) = metafields::delete_discount_metafield(&state.shopify, variant_id).await {
        // The row is already gone; surface the failure instead of
        // reporting success over a stale metafield.
        log_error!("DISCOUNT", "Metafield delete failed after row delete", e.to_string());
        return Err(e);
    }

    log_info!("DISCOUNT", "Discount deleted", serde_json::json!({
        "variant_id": variant_id,
        "rows_removed": removed,
    }));

    Ok(DeleteDiscountResponse { success: true, page_decrement: true })
}

/// Data for the edit page: the stored row plus the product/variant
/// titles fetched from the catalog. `None` when no discount exists for
/// the variant.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDiscountData {
    pub discount: Discount,
    pub detail: ProductVariantDetail,
}

pub async fn load_discount_for_edit(
    state: &AppState,
    variant_id: &str,
    store_url: &str,
) -> Result<Option<EditDiscountData>, AppError> {
    validation::validate_gid(variant_id, "Variant").map_err(AppError::Validation)?;
    validation::validate_store_url(store_url).map_err(AppError::Validation)?;

    let Some(discount) = repository::find_one(&state.db, variant_id, store_url, None).await? else {
        return Ok(None);
    };

    let detail = catalog::fetch_product_by_id(
        &state.shopify,
        &discount.product_id,
        &discount.variant_id,
    )
    .await?;

    Ok(Some(EditDiscountData { discount, detail }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(5, 2), 3);
        assert_eq!(total_pages(4, 2), 2);
        assert_eq!(total_pages(1, 2), 1);
        assert_eq!(total_pages(0, 2), 0);
    }
}
