//! End-to-end passcode lifecycle through the public API

use std::sync::Arc;

use vh_core::{InMemoryOtpStore, OtpManager, OtpManagerConfig, OtpPurpose};

fn manager() -> OtpManager<InMemoryOtpStore> {
    OtpManager::new(Arc::new(InMemoryOtpStore::new()), OtpManagerConfig::default())
}

#[tokio::test]
async fn test_issue_then_verify_twice() {
    let manager = manager();

    let record = manager.issue("a@x.com", OtpPurpose::Registration).await.unwrap();
    assert!(!record.used);
    assert_eq!(record.code.len(), 6);

    assert!(manager.verify("a@x.com", &record.code, OtpPurpose::Registration).await.unwrap());
    assert!(!manager.verify("a@x.com", &record.code, OtpPurpose::Registration).await.unwrap());
}

#[tokio::test]
async fn test_second_issue_supersedes_first() {
    let manager = manager();

    let first = manager.issue("a@x.com", OtpPurpose::Registration).await.unwrap();
    let mut second = manager.issue("a@x.com", OtpPurpose::Registration).await.unwrap();
    while second.code == first.code {
        second = manager.issue("a@x.com", OtpPurpose::Registration).await.unwrap();
    }

    assert!(!manager.verify("a@x.com", &first.code, OtpPurpose::Registration).await.unwrap());
    assert!(manager.verify("a@x.com", &second.code, OtpPurpose::Registration).await.unwrap());
}

#[tokio::test]
async fn test_dyn_store_behaves_the_same() {
    let store: Arc<dyn vh_core::OtpStore> = Arc::new(InMemoryOtpStore::new());
    let manager = OtpManager::new(store, OtpManagerConfig::default());

    let record = manager.issue("b@x.com", OtpPurpose::EmailVerification).await.unwrap();
    assert!(manager.has_active("b@x.com", OtpPurpose::EmailVerification).await.unwrap());
    assert!(manager
        .verify("b@x.com", &record.code, OtpPurpose::EmailVerification)
        .await
        .unwrap());
    assert!(!manager.has_active("b@x.com", OtpPurpose::EmailVerification).await.unwrap());
}
