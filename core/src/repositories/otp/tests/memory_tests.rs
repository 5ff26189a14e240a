//! Unit tests for the in-memory passcode store

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::repositories::otp::{InMemoryOtpStore, OtpStore};

fn record(identifier: &str, purpose: OtpPurpose, code: &str, ttl: Duration) -> OtpRecord {
    OtpRecord::issued_at(identifier, purpose, code, Utc::now(), ttl)
}

#[tokio::test]
async fn test_upsert_replaces_record_for_same_pair() {
    let store = InMemoryOtpStore::new();
    store
        .upsert(&record("a@x.com", OtpPurpose::Registration, "111111", Duration::minutes(15)))
        .await
        .unwrap();
    store
        .upsert(&record("a@x.com", OtpPurpose::Registration, "222222", Duration::minutes(15)))
        .await
        .unwrap();

    assert_eq!(store.len().await, 1);
    let stored = store.find("a@x.com", OtpPurpose::Registration).await.unwrap().unwrap();
    assert_eq!(stored.code, "222222");
}

#[tokio::test]
async fn test_pairs_are_independent_per_purpose() {
    let store = InMemoryOtpStore::new();
    store
        .upsert(&record("a@x.com", OtpPurpose::Registration, "111111", Duration::minutes(15)))
        .await
        .unwrap();
    store
        .upsert(&record("a@x.com", OtpPurpose::PasswordReset, "222222", Duration::minutes(15)))
        .await
        .unwrap();

    assert_eq!(store.len().await, 2);
    assert!(!store
        .consume("a@x.com", "111111", OtpPurpose::PasswordReset, Utc::now())
        .await
        .unwrap());
}

#[tokio::test]
async fn test_consume_succeeds_once() {
    let store = InMemoryOtpStore::new();
    store
        .upsert(&record("a@x.com", OtpPurpose::Registration, "123456", Duration::minutes(15)))
        .await
        .unwrap();

    let now = Utc::now();
    assert!(store.consume("a@x.com", "123456", OtpPurpose::Registration, now).await.unwrap());
    assert!(!store.consume("a@x.com", "123456", OtpPurpose::Registration, now).await.unwrap());
}

#[tokio::test]
async fn test_consume_rejects_expired_record() {
    let store = InMemoryOtpStore::new();
    store
        .upsert(&record("a@x.com", OtpPurpose::Registration, "123456", Duration::minutes(-1)))
        .await
        .unwrap();

    assert!(!store
        .consume("a@x.com", "123456", OtpPurpose::Registration, Utc::now())
        .await
        .unwrap());
    let stored = store.find("a@x.com", OtpPurpose::Registration).await.unwrap().unwrap();
    assert!(!stored.used);
}

#[tokio::test]
async fn test_concurrent_consume_has_single_winner() {
    let store = Arc::new(InMemoryOtpStore::new());
    store
        .upsert(&record("a@x.com", OtpPurpose::Registration, "123456", Duration::minutes(15)))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .consume("a@x.com", "123456", OtpPurpose::Registration, Utc::now())
                .await
                .unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_invalidate_all_ignores_expiry() {
    let store = InMemoryOtpStore::new();
    store
        .upsert(&record("a@x.com", OtpPurpose::PasswordReset, "123456", Duration::minutes(-5)))
        .await
        .unwrap();

    assert_eq!(store.invalidate_all("a@x.com", OtpPurpose::PasswordReset).await.unwrap(), 1);
    assert_eq!(store.invalidate_all("a@x.com", OtpPurpose::PasswordReset).await.unwrap(), 0);
    assert_eq!(store.invalidate_all("b@x.com", OtpPurpose::PasswordReset).await.unwrap(), 0);
}

#[tokio::test]
async fn test_purge_expired_keeps_live_records() {
    let store = InMemoryOtpStore::new();
    store
        .upsert(&record("old@x.com", OtpPurpose::Registration, "111111", Duration::minutes(-1)))
        .await
        .unwrap();
    store
        .upsert(&record("new@x.com", OtpPurpose::Registration, "222222", Duration::minutes(15)))
        .await
        .unwrap();

    assert_eq!(store.purge_expired(Utc::now()).await.unwrap(), 1);
    assert!(store.find("old@x.com", OtpPurpose::Registration).await.unwrap().is_none());
    assert!(store
        .find_active("new@x.com", OtpPurpose::Registration, Utc::now())
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_invalidate_issued_spares_replacement() {
    let store = InMemoryOtpStore::new();
    let first = record("a@x.com", OtpPurpose::Registration, "111111", Duration::minutes(15));
    let second = record("a@x.com", OtpPurpose::Registration, "222222", Duration::minutes(15));
    store.upsert(&first).await.unwrap();
    store.upsert(&second).await.unwrap();

    assert!(!store.invalidate_issued(&first).await.unwrap());
    let stored = store.find("a@x.com", OtpPurpose::Registration).await.unwrap().unwrap();
    assert_eq!(stored.id, second.id);
    assert!(!stored.used);

    assert!(store.invalidate_issued(&second).await.unwrap());
    assert!(!store.invalidate_issued(&second).await.unwrap());
}
