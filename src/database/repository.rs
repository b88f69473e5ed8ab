//! Discount repository operations.
//!
//! All queries are tenant-scoped by `store_url`. The one-row-per-
//! (store_url, variant_id) invariant is enforced by callers running
//! `find_one` before `create`; two concurrent creates for the same
//! variant can both pass the check. Accepted for single-operator admin
//! traffic.

use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::discount::{CreateDiscountPayload, Discount, UpdateDiscountPayload};

/// Scoped lookup. When `product_id` is supplied all three fields must
/// match; otherwise (variant_id, store_url) alone.
pub async fn find_one(
    pool: &SqlitePool,
    variant_id: &str,
    store_url: &str,
    product_id: Option<&str>,
) -> Result<Option<Discount>, AppError> {
    let discount = match product_id {
        Some(pid) => {
            sqlx::query_as::<_, Discount>(
                "SELECT * FROM discounts
                 WHERE variant_id = ? AND store_url = ? AND product_id = ?",
            )
            .bind(variant_id)
            .bind(store_url)
            .bind(pid)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Discount>(
                "SELECT * FROM discounts WHERE variant_id = ? AND store_url = ?",
            )
            .bind(variant_id)
            .bind(store_url)
            .fetch_optional(pool)
            .await?
        }
    };

    Ok(discount)
}

/// One page of the tenant's discounts plus the total row count.
/// Creation order (id ASC) so pages are stable across requests.
pub async fn find_page(
    pool: &SqlitePool,
    store_url: &str,
    skip: i64,
    limit: i64,
) -> Result<(Vec<Discount>, i64), AppError> {
    let discounts = sqlx::query_as::<_, Discount>(
        "SELECT * FROM discounts WHERE store_url = ? ORDER BY id ASC LIMIT ? OFFSET ?",
    )
    .bind(store_url)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM discounts WHERE store_url = ?")
        .bind(store_url)
        .fetch_one(pool)
        .await?;

    Ok((discounts, total))
}

/// Insert a new discount row. `custom_message` is not written on create;
/// it only exists after the edit flow. Returns the new row id.
pub async fn create(pool: &SqlitePool, payload: &CreateDiscountPayload) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO discounts (product_id, variant_id, quantity, percentage, sale_message, store_url)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.product_id)
    .bind(&payload.variant_id)
    .bind(payload.quantity)
    .bind(payload.percentage)
    .bind(&payload.sale_message)
    .bind(&payload.store_url)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Full replace of the mutable fields on the given row id.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    payload: &UpdateDiscountPayload,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE discounts
         SET product_id = ?, variant_id = ?, quantity = ?, percentage = ?,
             sale_message = ?, custom_message = ?, store_url = ?,
             updated_at = CURRENT_TIMESTAMP
         WHERE id = ?",
    )
    .bind(&payload.product_id)
    .bind(&payload.variant_id)
    .bind(payload.quantity)
    .bind(payload.percentage)
    .bind(&payload.sale_message)
    .bind(&payload.custom_message)
    .bind(&payload.store_url)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete all rows matching (store_url, variant_id) — normally 0 or 1.
/// Returns the number of rows removed. Callers follow up with the
/// metafield delete for the variant.
pub async fn delete_many(
    pool: &SqlitePool,
    store_url: &str,
    variant_id: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM discounts WHERE variant_id = ? AND store_url = ?")
        .bind(variant_id)
        .bind(store_url)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::init_test_db;

    fn payload(variant: &str) -> CreateDiscountPayload {
        CreateDiscountPayload {
            product_id: "gid://shopify/Product/100".to_string(),
            variant_id: variant.to_string(),
            quantity: 3,
            percentage: 50.0,
            sale_message: "Sale!".to_string(),
            store_url: "my-store.myshopify.com".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_one_returns_equal_fields() {
        let pool = init_test_db().await;
        let p = payload("gid://shopify/ProductVariant/1");
        create(&pool, &p).await.unwrap();

        let found = find_one(&pool, &p.variant_id, &p.store_url, None)
            .await
            .unwrap()
            .expect("row should exist");

        assert_eq!(found.product_id, p.product_id);
        assert_eq!(found.variant_id, p.variant_id);
        assert_eq!(found.quantity, 3);
        assert_eq!(found.percentage, 50.0);
        assert_eq!(found.sale_message, "Sale!");
        assert_eq!(found.store_url, p.store_url);
        assert!(found.custom_message.is_none());
    }

    #[tokio::test]
    async fn find_one_scopes_by_product_id_when_supplied() {
        let pool = init_test_db().await;
        let p = payload("gid://shopify/ProductVariant/1");
        create(&pool, &p).await.unwrap();

        let hit = find_one(&pool, &p.variant_id, &p.store_url, Some(&p.product_id))
            .await
            .unwrap();
        assert!(hit.is_some());

        let miss = find_one(
            &pool,
            &p.variant_id,
            &p.store_url,
            Some("gid://shopify/Product/999"),
        )
        .await
        .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn find_one_scopes_by_store() {
        let pool = init_test_db().await;
        let p = payload("gid://shopify/ProductVariant/1");
        create(&pool, &p).await.unwrap();

        let other_store = find_one(&pool, &p.variant_id, "other.myshopify.com", None)
            .await
            .unwrap();
        assert!(other_store.is_none());
    }

    #[tokio::test]
    async fn find_page_returns_page_and_total() {
        let pool = init_test_db().await;
        for i in 1..=5 {
            let p = payload(&format!("gid://shopify/ProductVariant/{}", i));
            create(&pool, &p).await.unwrap();
        }

        let (page, total) = find_page(&pool, "my-store.myshopify.com", 0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(total, 5);
        assert_eq!(page[0].variant_id, "gid://shopify/ProductVariant/1");
        assert_eq!(page[1].variant_id, "gid://shopify/ProductVariant/2");

        // Last page holds the single remaining row
        let (last, total) = find_page(&pool, "my-store.myshopify.com", 4, 2).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(total, 5);
        assert_eq!(last[0].variant_id, "gid://shopify/ProductVariant/5");
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let pool = init_test_db().await;
        let p = payload("gid://shopify/ProductVariant/1");
        let id = create(&pool, &p).await.unwrap();

        let upd = UpdateDiscountPayload {
            product_id: p.product_id.clone(),
            variant_id: p.variant_id.clone(),
            quantity: 10,
            percentage: 25.0,
            sale_message: "New deal".to_string(),
            custom_message: "Limited time".to_string(),
            store_url: p.store_url.clone(),
        };
        update(&pool, id, &upd).await.unwrap();

        let found = find_one(&pool, &p.variant_id, &p.store_url, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.quantity, 10);
        assert_eq!(found.percentage, 25.0);
        assert_eq!(found.sale_message, "New deal");
        assert_eq!(found.custom_message.as_deref(), Some("Limited time"));
    }

    #[tokio::test]
    async fn delete_many_then_find_one_returns_none() {
        let pool = init_test_db().await;
        let p = payload("gid://shopify/ProductVariant/1");
        create(&pool, &p).await.unwrap();

        let removed = delete_many(&pool, &p.store_url, &p.variant_id).await.unwrap();
        assert_eq!(removed, 1);

        let found = find_one(&pool, &p.variant_id, &p.store_url, None).await.unwrap();
        assert!(found.is_none());

        // Deleting again is a no-op
        let removed = delete_many(&pool, &p.store_url, &p.variant_id).await.unwrap();
        assert_eq!(removed, 0);
    }
}
