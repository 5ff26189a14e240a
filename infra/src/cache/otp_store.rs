//! Redis implementation of the OtpStore trait.
//!
//! Each (identifier, purpose) pair is one hash at
//! `{prefix}:{PURPOSE}:{identifier}` with fields `id`, `code`, `used`,
//! `expires_at_ms` and `created_at_ms`. Issuance replaces the hash in a
//! MULTI/EXEC block and sets `PEXPIREAT` to the record's expiry, so expired
//! records disappear without a sweep. Consume and invalidate run as Lua
//! scripts so the check and the write are one server-side step; they run
//! once, without retry, so a lost reply cannot repeat a state change.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use redis::{AsyncCommands, Script};
use std::collections::HashMap;
use uuid::Uuid;

use vh_core::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use vh_core::errors::DomainError;
use vh_core::repositories::OtpStore;

use super::redis_client::RedisClient;

const FIELD_ID: &str = "id";
const FIELD_CODE: &str = "code";
const FIELD_USED: &str = "used";
const FIELD_EXPIRES_AT: &str = "expires_at_ms";
const FIELD_CREATED_AT: &str = "created_at_ms";

static CONSUME_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local f = redis.call('HMGET', KEYS[1], 'code', 'used', 'expires_at_ms')
        local expires = tonumber(f[3])
        if f[1] == ARGV[1] and f[2] == '0' and expires and expires > tonumber(ARGV[2]) then
            redis.call('HSET', KEYS[1], 'used', '1')
            return 1
        end
        return 0
        "#,
    )
});

static INVALIDATE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        if redis.call('HGET', KEYS[1], 'used') == '0' then
            redis.call('HSET', KEYS[1], 'used', '1')
            return 1
        end
        return 0
        "#,
    )
});

static INVALIDATE_ISSUED_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local f = redis.call('HMGET', KEYS[1], 'id', 'used')
        if f[1] == ARGV[1] and f[2] == '0' then
            redis.call('HSET', KEYS[1], 'used', '1')
            return 1
        end
        return 0
        "#,
    )
});

pub struct RedisOtpStore {
    client: RedisClient,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(&self, identifier: &str, purpose: OtpPurpose) -> String {
        otp_key(self.client.key_prefix(), identifier, purpose)
    }

    async fn load(&self, identifier: &str, purpose: OtpPurpose) -> Result<Option<OtpRecord>, DomainError> {
        let key = self.key(identifier, purpose);
        let fields = self
            .client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.hgetall::<_, HashMap<String, String>>(key).await })
            })
            .await
            .map_err(|e| cache_error("load otp", e))?;

        record_from_fields(identifier, purpose, &fields)
    }
}

/// Storage key for a pair
pub(crate) fn otp_key(prefix: &str, identifier: &str, purpose: OtpPurpose) -> String {
    format!("{}:{}:{}", prefix, purpose.as_str(), identifier)
}

/// Hash fields written on issuance
pub(crate) fn record_to_fields(record: &OtpRecord) -> Vec<(&'static str, String)> {
    vec![
        (FIELD_ID, record.id.to_string()),
        (FIELD_CODE, record.code.clone()),
        (FIELD_USED, if record.used { "1" } else { "0" }.to_string()),
        (FIELD_EXPIRES_AT, record.expires_at.timestamp_millis().to_string()),
        (FIELD_CREATED_AT, record.created_at.timestamp_millis().to_string()),
    ]
}

/// Rebuild a record from HGETALL output. An empty map means no record.
pub(crate) fn record_from_fields(
    identifier: &str,
    purpose: OtpPurpose,
    fields: &HashMap<String, String>,
) -> Result<Option<OtpRecord>, DomainError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let get = |name: &str| {
        fields.get(name).ok_or_else(|| DomainError::Persistence {
            message: format!("Stored otp hash is missing field '{}'", name),
        })
    };

    let id = Uuid::parse_str(get(FIELD_ID)?).map_err(|e| DomainError::Persistence {
        message: format!("Invalid otp UUID: {}", e),
    })?;

    Ok(Some(OtpRecord {
        id,
        identifier: identifier.to_string(),
        code: get(FIELD_CODE)?.clone(),
        purpose,
        expires_at: parse_millis(FIELD_EXPIRES_AT, get(FIELD_EXPIRES_AT)?)?,
        used: get(FIELD_USED)? != "0",
        created_at: parse_millis(FIELD_CREATED_AT, get(FIELD_CREATED_AT)?)?,
    }))
}

fn parse_millis(field: &str, value: &str) -> Result<DateTime<Utc>, DomainError> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .ok_or_else(|| DomainError::Persistence {
            message: format!("Invalid timestamp in field '{}': {}", field, value),
        })
}

fn cache_error(operation: &'static str, e: redis::RedisError) -> DomainError {
    tracing::error!(operation = operation, error = %e, "Redis operation failed");
    DomainError::Persistence {
        message: format!("{} failed: {}", operation, e),
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn upsert(&self, record: &OtpRecord) -> Result<(), DomainError> {
        let key = self.key(&record.identifier, record.purpose);
        let fields = record_to_fields(record);
        let expire_at_ms = record.expires_at.timestamp_millis();

        self.client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                let fields = fields.clone();
                Box::pin(async move {
                    redis::pipe()
                        .atomic()
                        .del(&key)
                        .ignore()
                        .hset_multiple(&key, &fields)
                        .ignore()
                        .cmd("PEXPIREAT")
                        .arg(&key)
                        .arg(expire_at_ms)
                        .ignore()
                        .query_async::<_, ()>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| cache_error("upsert otp", e))
    }

    async fn consume(
        &self,
        identifier: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let key = self.key(identifier, purpose);
        let code = code.to_string();
        let now_ms = now.timestamp_millis();

        let flipped = self
            .client
            .execute_once(|mut conn| {
                let key = key.clone();
                let code = code.clone();
                Box::pin(async move {
                    CONSUME_SCRIPT
                        .key(key)
                        .arg(code)
                        .arg(now_ms)
                        .invoke_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| cache_error("consume otp", e))?;

        Ok(flipped == 1)
    }

    async fn find_active(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        Ok(self
            .load(identifier, purpose)
            .await?
            .filter(|record| record.is_active_at(now)))
    }

    async fn find(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.load(identifier, purpose).await
    }

    async fn invalidate_all(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, DomainError> {
        let key = self.key(identifier, purpose);

        let changed = self
            .client
            .execute_once(|mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    INVALIDATE_SCRIPT
                        .key(key)
                        .invoke_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| cache_error("invalidate otps", e))?;

        Ok(changed.max(0) as u64)
    }

    async fn invalidate_issued(&self, record: &OtpRecord) -> Result<bool, DomainError> {
        let key = self.key(&record.identifier, record.purpose);
        let id = record.id.to_string();

        let changed = self
            .client
            .execute_once(|mut conn| {
                let key = key.clone();
                let id = id.clone();
                Box::pin(async move {
                    INVALIDATE_ISSUED_SCRIPT
                        .key(key)
                        .arg(id)
                        .invoke_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| cache_error("invalidate issued otp", e))?;

        Ok(changed == 1)
    }

    /// Keys carry their own expiry, so there is nothing to sweep
    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, DomainError> {
        Ok(0)
    }
}
