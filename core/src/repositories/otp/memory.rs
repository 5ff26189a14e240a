//! Process-local passcode store backed by a locked map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

use super::trait_::OtpStore;

type PairKey = (String, OtpPurpose);

/// In-memory `OtpStore`
///
/// Every mutating operation runs under the write lock, so the match and the
/// flag flip in `consume` cannot interleave with another caller.
#[derive(Clone, Default)]
pub struct InMemoryOtpStore {
    records: Arc<RwLock<HashMap<PairKey, OtpRecord>>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, in any state
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn key(identifier: &str, purpose: OtpPurpose) -> PairKey {
        (identifier.to_string(), purpose)
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn upsert(&self, record: &OtpRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.insert(
            Self::key(&record.identifier, record.purpose),
            record.clone(),
        );
        Ok(())
    }

    async fn consume(
        &self,
        identifier: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&Self::key(identifier, purpose)) {
            Some(record)
                if !record.used
                    && record.expires_at > now
                    && constant_time_eq(record.code.as_bytes(), code.as_bytes()) =>
            {
                record.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_active(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(&Self::key(identifier, purpose))
            .filter(|record| !record.used && record.expires_at > now)
            .cloned())
    }

    async fn find(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&Self::key(identifier, purpose)).cloned())
    }

    async fn invalidate_all(
        &self,
        identifier: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&Self::key(identifier, purpose)) {
            Some(record) if !record.used => {
                record.used = true;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn invalidate_issued(&self, record: &OtpRecord) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&Self::key(&record.identifier, record.purpose)) {
            Some(stored) if stored.id == record.id && !stored.used => {
                stored.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.expires_at > now);
        Ok((before - records.len()) as u64)
    }
}
