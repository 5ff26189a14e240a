//! MySQL implementation of the OtpStore trait.
//!
//! One row per (identifier, purpose), enforced by a unique key. Issuance is a
//! single `INSERT ... ON DUPLICATE KEY UPDATE`; verification is a single
//! conditional `UPDATE` whose affected-row count decides the outcome.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use vh_core::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use vh_core::errors::DomainError;
use vh_core::repositories::OtpStore;

use super::db_error;

const CREATE_OTP_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS otp_records (
        id CHAR(36) NOT NULL,
        identifier VARCHAR(320) NOT NULL,
        purpose VARCHAR(32) NOT NULL,
        code CHAR(6) NOT NULL,
        expires_at DATETIME(6) NOT NULL,
        used BOOLEAN NOT NULL DEFAULT FALSE,
        created_at DATETIME(6) NOT NULL,
        PRIMARY KEY (id),
        UNIQUE KEY uq_otp_records_identifier_purpose (identifier, purpose),
        KEY idx_otp_records_expires_at (expires_at)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
"#;

pub struct MySqlOtpStore {
    pool: MySqlPool,
}

impl MySqlOtpStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &MySqlRow) -> Result<OtpRecord, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("decode otp id", e))?;
        let purpose: String = row
            .try_get("purpose")
            .map_err(|e| db_error("decode otp purpose", e))?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Persistence {
                message: format!("Invalid otp UUID: {}", e),
            })?,
            identifier: row
                .try_get("identifier")
                .map_err(|e| db_error("decode otp identifier", e))?,
            code: row
                .try_get("code")
                .map_err(|e| db_error("decode otp code", e))?,
            purpose: purpose.parse().map_err(|e| DomainError::Persistence {
                message: format!("Stored otp row has {}", e),
            })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| db_error("decode otp expires_at", e))?,
            used: row
                .try_get("used")
                .map_err(|e| db_error("decode otp used", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("decode otp created_at", e))?,
        })
    }
}

#[async_trait]
impl OtpStore for MySqlOtpStore {
    async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_OTP_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("create otp_records", e))?;
        tracing::info!("otp_records table ready");
        Ok(())
    }

    async fn upsert(&self, record: &OtpRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO otp_records (id, identifier, purpose, code, expires_at, used, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                id = VALUES(id),
                code = VALUES(code),
                expires_at = VALUES(expires_at),
                used = VALUES(used),
                created_at = VALUES(created_at)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.identifier)
            .bind(record.purpose.as_str())
            .bind(&record.code)
            .bind(record.expires_at)
            .bind(record.used)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("upsert otp", e))?;

        Ok(())
    }

    async fn consume(
        &self,
        identifier: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE otp_records
            SET used = TRUE
            WHERE identifier = ? AND purpose = ? AND code = ?
              AND used = FALSE AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(identifier)
            .bind(purpose.as_str())
            .bind(code)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("consume otp", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_active(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = r#"
            SELECT id, identifier, purpose, code, expires_at, used, created_at
            FROM otp_records
            WHERE identifier = ? AND purpose = ? AND used = FALSE AND expires_at > ?
        "#;

        let row = sqlx::query(query)
            .bind(identifier)
            .bind(purpose.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find active otp", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = r#"
            SELECT id, identifier, purpose, code, expires_at, used, created_at
            FROM otp_records
            WHERE identifier = ? AND purpose = ?
        "#;

        let row = sqlx::query(query)
            .bind(identifier)
            .bind(purpose.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find otp", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn invalidate_all(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE otp_records SET used = TRUE WHERE identifier = ? AND purpose = ? AND used = FALSE",
        )
        .bind(identifier)
        .bind(purpose.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("invalidate otps", e))?;

        Ok(result.rows_affected())
    }

    async fn invalidate_issued(&self, record: &OtpRecord) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE otp_records SET used = TRUE WHERE id = ? AND used = FALSE")
            .bind(record.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("invalidate issued otp", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM otp_records WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("purge expired otps", e))?;

        Ok(result.rows_affected())
    }
}
