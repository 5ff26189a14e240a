//! Unit tests for the passcode cleanup service

use chrono::{Duration, Utc};
use std::sync::Arc;
use vh_shared::config::{OtpConfig, OtpStoreBackend};

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::repositories::{InMemoryOtpStore, OtpStore};
use crate::services::otp::{CleanupResult, OtpCleanupConfig, OtpCleanupService};

#[tokio::test]
async fn test_run_cleanup_purges_expired_records() {
    let store = Arc::new(InMemoryOtpStore::new());
    let stale = OtpRecord::issued_at(
        "old@x.com",
        OtpPurpose::Registration,
        "111111",
        Utc::now() - Duration::hours(1),
        Duration::minutes(15),
    );
    store.upsert(&stale).await.unwrap();
    store
        .upsert(&OtpRecord::new("new@x.com", OtpPurpose::Registration, Duration::minutes(15)))
        .await
        .unwrap();

    let service = OtpCleanupService::new(store.clone(), OtpCleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert_eq!(result.expired_records_deleted, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let store = Arc::new(InMemoryOtpStore::new());
    let stale = OtpRecord::issued_at(
        "old@x.com",
        OtpPurpose::Registration,
        "111111",
        Utc::now() - Duration::hours(1),
        Duration::minutes(15),
    );
    store.upsert(&stale).await.unwrap();

    let config = OtpCleanupConfig {
        enabled: false,
        ..Default::default()
    };
    let service = Arc::new(OtpCleanupService::new(store.clone(), config));

    assert_eq!(service.run_cleanup().await.unwrap(), CleanupResult::default());
    assert!(service.clone().start_background_task().is_none());
    assert_eq!(store.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let store = Arc::new(InMemoryOtpStore::new());
    let config = OtpCleanupConfig {
        interval_seconds: 60,
        enabled: true,
    };
    let service = Arc::new(OtpCleanupService::new(store.clone(), config));
    let handle = service.start_background_task().unwrap();

    // Already expired, so the next tick removes it
    let stale = OtpRecord::issued_at(
        "old@x.com",
        OtpPurpose::Registration,
        "111111",
        Utc::now() - Duration::hours(1),
        Duration::minutes(15),
    );
    store.upsert(&stale).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(61)).await;
    assert!(store.is_empty().await);

    handle.abort();
}

#[test]
fn test_cleanup_disabled_for_native_expiry_backend() {
    let otp_config = OtpConfig {
        store: OtpStoreBackend::Redis,
        ..Default::default()
    };
    assert!(!OtpCleanupConfig::from(&otp_config).enabled);

    let otp_config = OtpConfig {
        store: OtpStoreBackend::Mysql,
        ..Default::default()
    };
    assert!(OtpCleanupConfig::from(&otp_config).enabled);
}
