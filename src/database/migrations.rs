use sqlx::SqlitePool;

/// Run all database migrations (CREATE TABLE IF NOT EXISTS + indexes).
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // ═══════════════════════════════════════
    // TABLE: discounts
    // ═══════════════════════════════════════
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS discounts (
            id             INTEGER  PRIMARY KEY AUTOINCREMENT,
            store_url      TEXT     NOT NULL,
            product_id     TEXT     NOT NULL,
            variant_id     TEXT     NOT NULL,
            quantity       INTEGER  NOT NULL CHECK(quantity >= 1),
            percentage     REAL     NOT NULL CHECK(percentage > 0 AND percentage <= 100),
            sale_message   TEXT     NOT NULL,
            custom_message TEXT,
            created_at     DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at     DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    // Lookup path for every repository operation. Deliberately not
    // unique: the one-row-per-(store, variant) invariant is enforced
    // by the find-before-create guard at the application level.
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_discounts_store_variant
         ON discounts(store_url, variant_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_discounts_store ON discounts(store_url)")
        .execute(pool)
        .await?;

    Ok(())
}
