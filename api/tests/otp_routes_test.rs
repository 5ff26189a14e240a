mod common;

use actix_web::{http::StatusCode, test};
use serde_json::json;

use vh_api::create_app;
use vh_core::{OtpPurpose, OtpStore};

fn post(uri: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

#[actix_web::test]
async fn test_send_then_verify_once() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "alice@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Verification code sent successfully");

    let code = ctx.sender.last_code_for("alice@example.com").unwrap();
    let verify = json!({ "email": "alice@example.com", "otp": code, "type": "REGISTRATION" });

    let (status, body) = common::send(&app, post("/api/v1/auth/verify-otp", verify.clone()).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP verified successfully");

    let (status, body) = common::send(&app, post("/api/v1/auth/verify-otp", verify).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired OTP");
}

#[actix_web::test]
async fn test_email_is_normalized_for_issue_and_verify() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "  Bob@Example.COM " })).to_request(),
    )
    .await;
    let code = ctx.sender.last_code_for("bob@example.com").unwrap();

    let (status, _) = common::send(
        &app,
        post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "bob@example.com", "otp": code, "type": "REGISTRATION" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_send_otp_requires_email() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, body) = common::send(&app, post("/api/v1/auth/send-otp", json!({})).to_request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Email is required");
    assert_eq!(ctx.sender.sent_count(), 0);
}

#[actix_web::test]
async fn test_send_otp_rejects_malformed_email() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "not-an-email" })).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_EMAIL");
}

#[actix_web::test]
async fn test_send_otp_rejects_existing_account() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    ctx.state
        .auth_service
        .register("carol@example.com", "carol", common::STRONG_PASSWORD)
        .await
        .unwrap();

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "carol@example.com" })).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "USER_ALREADY_EXISTS");
    assert_eq!(ctx.sender.sent_count(), 0);
}

#[actix_web::test]
async fn test_delivery_failure_is_503_and_code_is_unusable() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;
    ctx.sender.fail(true);

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "dave@example.com" })).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "EMAIL_DELIVERY_FAILED");
    assert!(body["message"].as_str().unwrap().contains("quota exceeded"));

    let record = ctx
        .otp_store
        .find("dave@example.com", OtpPurpose::Registration)
        .await
        .unwrap()
        .expect("record is committed before delivery");
    assert!(record.used);
}

#[actix_web::test]
async fn test_delivery_failure_keeps_code_when_configured() {
    let ctx = common::context_with(|config| config.otp.invalidate_on_delivery_failure = false);
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;
    ctx.sender.fail(true);

    let (status, _) = common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "erin@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let record = ctx
        .otp_store
        .find("erin@example.com", OtpPurpose::Registration)
        .await
        .unwrap()
        .unwrap();
    assert!(!record.used);
}

#[actix_web::test]
async fn test_verify_rejects_unknown_type() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    for otp_type in ["LOGIN", "registration", ""] {
        let (status, body) = common::send(
            &app,
            post(
                "/api/v1/auth/verify-otp",
                json!({ "email": "frank@example.com", "otp": "123456", "type": otp_type }),
            )
            .to_request(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "type {:?}", otp_type);
        let expected = if otp_type.is_empty() { "VALIDATION_ERROR" } else { "INVALID_OTP_TYPE" };
        assert_eq!(body["error"], expected, "type {:?}", otp_type);
    }
}

#[actix_web::test]
async fn test_code_is_bound_to_purpose() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "gina@example.com" })).to_request(),
    )
    .await;
    let code = ctx.sender.last_code_for("gina@example.com").unwrap();

    let (status, body) = common::send(
        &app,
        post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "gina@example.com", "otp": code, "type": "PASSWORD_RESET" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OTP");

    // The REGISTRATION code is still intact
    let (status, _) = common::send(
        &app,
        post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "gina@example.com", "otp": code, "type": "REGISTRATION" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_resend_replaces_previous_code() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "hank@example.com" })).to_request(),
    )
    .await;
    let first = ctx.sender.last_code_for("hank@example.com").unwrap();

    common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "hank@example.com" })).to_request(),
    )
    .await;
    let second = ctx.sender.last_code_for("hank@example.com").unwrap();

    if first != second {
        let (status, _) = common::send(
            &app,
            post(
                "/api/v1/auth/verify-otp",
                json!({ "email": "hank@example.com", "otp": first, "type": "REGISTRATION" }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = common::send(
        &app,
        post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "hank@example.com", "otp": second, "type": "REGISTRATION" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_malformed_code_is_plain_denial() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, body) = common::send(
        &app,
        post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "ivy@example.com", "otp": "12ab56", "type": "REGISTRATION" }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired OTP");
}
