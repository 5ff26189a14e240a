use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;

use vh_core::domain::entities::otp_record::{OtpPurpose, OtpRecord};

use crate::cache::otp_store::{otp_key, record_from_fields, record_to_fields};

fn sample_record() -> OtpRecord {
    let issued_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    OtpRecord::issued_at(
        "alice@example.com".to_string(),
        OtpPurpose::Registration,
        "042917".to_string(),
        issued_at,
        Duration::minutes(15),
    )
}

fn as_map(fields: Vec<(&'static str, String)>) -> HashMap<String, String> {
    fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[test]
fn test_key_layout() {
    assert_eq!(
        otp_key("otp", "alice@example.com", OtpPurpose::PasswordReset),
        "otp:PASSWORD_RESET:alice@example.com"
    );
}

#[test]
fn test_keys_differ_per_purpose() {
    let a = otp_key("otp", "alice@example.com", OtpPurpose::Registration);
    let b = otp_key("otp", "alice@example.com", OtpPurpose::EmailVerification);
    assert_ne!(a, b);
}

#[test]
fn test_fields_rebuild_same_record() {
    let record = sample_record();
    let fields = as_map(record_to_fields(&record));

    let rebuilt = record_from_fields(&record.identifier, record.purpose, &fields)
        .unwrap()
        .unwrap();

    assert_eq!(rebuilt, record);
    assert_eq!(fields["used"], "0");
    assert_eq!(fields["code"], "042917");
}

#[test]
fn test_empty_hash_is_absent() {
    let result = record_from_fields("bob@example.com", OtpPurpose::Registration, &HashMap::new());
    assert!(result.unwrap().is_none());
}

#[test]
fn test_used_flag_decodes() {
    let record = sample_record();
    let mut fields = as_map(record_to_fields(&record));
    fields.insert("used".to_string(), "1".to_string());

    let rebuilt = record_from_fields(&record.identifier, record.purpose, &fields)
        .unwrap()
        .unwrap();
    assert!(rebuilt.used);
}

#[test]
fn test_partial_hash_is_persistence_error() {
    let record = sample_record();
    let mut fields = as_map(record_to_fields(&record));
    fields.remove("expires_at_ms");

    let err = record_from_fields(&record.identifier, record.purpose, &fields).unwrap_err();
    assert!(err.to_string().contains("expires_at_ms"));
}
