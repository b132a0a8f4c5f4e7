use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::COLUMNS;
use crate::models::CleanRecord;
use crate::traits::Sink;

/// Replaces a Postgres table wholesale with the dataset's rows.
///
/// Replace semantics mirror the reference loader: drop the table if it
/// exists, recreate it with the output schema, insert every row. The whole
/// write happens in one transaction; no index column is persisted.
pub struct PostgresSink {
    db_url: String,
    table: String,
}

impl PostgresSink {
    pub fn new(db_url: String, table: String) -> Self {
        Self { db_url, table }
    }
}

/// Table names end up interpolated into DDL, so only plain identifiers
/// are accepted.
fn validate_table_name(table: &str) -> Result<()> {
    if table.is_empty()
        || !table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        bail!("invalid table name: {table:?}");
    }
    Ok(())
}

#[async_trait]
impl Sink for PostgresSink {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn load(&self, records: &[CleanRecord]) -> Result<()> {
        validate_table_name(&self.table)?;

        let pool = PgPool::connect(&self.db_url)
            .await
            .context("failed to connect to Postgres")?;
        let mut tx = pool.begin().await?;

        sqlx::query(&format!(r#"DROP TABLE IF EXISTS "{}""#, self.table))
            .execute(&mut *tx)
            .await?;

        sqlx::query(&format!(
            r#"CREATE TABLE "{}" (
                "Title" TEXT NOT NULL,
                "Price (IDR)" BIGINT NOT NULL,
                "Rating" DOUBLE PRECISION NOT NULL,
                "Colors" BIGINT NOT NULL,
                "Size" TEXT NOT NULL,
                "Gender" TEXT NOT NULL,
                "timestamp" TIMESTAMPTZ NOT NULL
            )"#,
            self.table
        ))
        .execute(&mut *tx)
        .await?;

        let insert = format!(
            r#"INSERT INTO "{}" ("{}") VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
            self.table,
            COLUMNS.join(r#"", ""#)
        );
        for record in records {
            sqlx::query(&insert)
                .bind(&record.title)
                .bind(record.price_idr)
                .bind(record.rating)
                .bind(record.colors)
                .bind(&record.size)
                .bind(&record.gender)
                .bind(record.extracted_at)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(table = %self.table, rows = records.len(), "Saved dataset to Postgres");
        Ok(())
    }
}
