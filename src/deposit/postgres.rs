//! PostgreSQL deposit store
//!
//! Table layout lives in `migrations/0001_create_deposits.sql`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::error::StoreError;
use super::store::DepositStore;
use super::types::{DepositRecord, DepositStatus, InsertOutcome, UpdateOutcome};

const SELECT_COLUMNS: &str = r#"tx_hash, network, asset, amount, from_address, to_address,
       confirmations, status, merchant_id, occurred_at, created_at, updated_at"#;

pub struct PgDepositStore {
    pool: PgPool,
}

impl PgDepositStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &PgRow) -> Result<DepositRecord, StoreError> {
        let status: String = row.try_get("status")?;
        let status = status.parse::<DepositStatus>().map_err(StoreError::Corrupt)?;

        let confirmations: i64 = row.try_get("confirmations")?;
        let confirmations = u32::try_from(confirmations).map_err(|_| {
            StoreError::Corrupt(format!("confirmations out of range: {}", confirmations))
        })?;

        Ok(DepositRecord {
            tx_hash: row.try_get("tx_hash")?,
            network: row.try_get("network")?,
            asset: row.try_get("asset")?,
            amount: row.try_get::<Decimal, _>("amount")?,
            from_address: row.try_get("from_address")?,
            to_address: row.try_get("to_address")?,
            confirmations,
            status,
            merchant_id: row.try_get("merchant_id")?,
            occurred_at: row.try_get::<DateTime<Utc>, _>("occurred_at")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

#[async_trait]
impl DepositStore for PgDepositStore {
    async fn try_insert(&self, record: &DepositRecord) -> Result<InsertOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // The primary key arbitrates concurrent inserts; losers see 0 rows
        let result = sqlx::query(
            r#"
            INSERT INTO deposits
                (tx_hash, network, asset, amount, from_address, to_address,
                 confirmations, status, merchant_id, occurred_at, created_at, updated_at)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
            ON CONFLICT (tx_hash) DO NOTHING
            "#,
        )
        .bind(&record.tx_hash)
        .bind(&record.network)
        .bind(&record.asset)
        .bind(record.amount)
        .bind(&record.from_address)
        .bind(&record.to_address)
        .bind(i64::from(record.confirmations))
        .bind(record.status.as_str())
        .bind(&record.merchant_id)
        .bind(record.occurred_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if result.rows_affected() > 0 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    async fn update_status(
        &self,
        tx_hash: &str,
        status: DepositStatus,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE deposits
            SET status = $1, updated_at = NOW()
            WHERE tx_hash = $2
            "#,
        )
        .bind(status.as_str())
        .bind(tx_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Updated)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    async fn list_by_merchant(
        &self,
        merchant_id: Option<&str>,
    ) -> Result<Vec<DepositRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM deposits
             WHERE ($1::VARCHAR IS NULL OR merchant_id = $1)
             ORDER BY created_at DESC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(merchant_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn get(&self, tx_hash: &str) -> Result<Option<DepositRecord>, StoreError> {
        let sql = format!("SELECT {} FROM deposits WHERE tx_hash = $1", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(tx_hash)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
