mod common;

use actix_web::{http::StatusCode, test};
use serde_json::json;

use common::STRONG_PASSWORD;
use vh_api::create_app;
use vh_core::OtpPurpose;

const RESET_MESSAGE: &str =
    "If an account exists with this email, you will receive password reset instructions.";

fn post(uri: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

fn put(uri: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::put().uri(uri).set_json(body)
}

fn register_body(email: &str, username: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "username": username, "password": password })
}

#[actix_web::test]
async fn test_register_returns_profile_without_hash() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, body) = common::send(
        &app,
        post(
            "/api/v1/auth/register",
            register_body("Alice@Example.com", "alice", STRONG_PASSWORD),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body.to_string().contains(STRONG_PASSWORD));
}

#[actix_web::test]
async fn test_register_reports_policy_violations() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/register", register_body("bob@example.com", "bob", "weak")).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "WEAK_PASSWORD");
    let violations = body["details"]["violations"].as_array().unwrap();
    assert!(violations.len() >= 3);
}

#[actix_web::test]
async fn test_register_rejects_duplicates() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, _) = common::send(
        &app,
        post("/api/v1/auth/register", register_body("carol@example.com", "carol", STRONG_PASSWORD))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/register", register_body("other@example.com", "carol", STRONG_PASSWORD))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "USERNAME_TAKEN");

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/register", register_body("CAROL@example.com", "carol2", STRONG_PASSWORD))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "USER_ALREADY_EXISTS");
}

#[actix_web::test]
async fn test_login_does_not_reveal_which_part_was_wrong() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;
    ctx.state
        .auth_service
        .register("dave@example.com", "dave", STRONG_PASSWORD)
        .await
        .unwrap();

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/login", json!({ "email": "dave@example.com", "password": STRONG_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], "dave");

    let (wrong_status, wrong_password) = common::send(
        &app,
        post("/api/v1/auth/login", json!({ "email": "dave@example.com", "password": "Wr0ng!Pass" }))
            .to_request(),
    )
    .await;
    let (unknown_status, unknown_email) = common::send(
        &app,
        post("/api/v1/auth/login", json!({ "email": "nobody@example.com", "password": STRONG_PASSWORD }))
            .to_request(),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], unknown_email["error"]);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[actix_web::test]
async fn test_reset_request_is_uniform_for_unknown_email() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/reset-password", json!({ "email": "ghost@example.com" })).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], RESET_MESSAGE);
    assert_eq!(ctx.sender.sent_count(), 0);
}

#[actix_web::test]
async fn test_reset_request_is_uniform_when_delivery_fails() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;
    ctx.state
        .auth_service
        .register("erin@example.com", "erin", STRONG_PASSWORD)
        .await
        .unwrap();
    ctx.sender.fail(true);

    let (status, body) = common::send(
        &app,
        post("/api/v1/auth/reset-password", json!({ "email": "erin@example.com" })).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], RESET_MESSAGE);
}

#[actix_web::test]
async fn test_full_password_reset_flow() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;
    ctx.state
        .auth_service
        .register("frank@example.com", "frank", STRONG_PASSWORD)
        .await
        .unwrap();

    let (status, _) = common::send(
        &app,
        post("/api/v1/auth/reset-password", json!({ "email": "frank@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let code = ctx.sender.last_code_for("frank@example.com").unwrap();

    let confirm = json!({
        "email": "frank@example.com",
        "otp": code,
        "newPassword": "N3w!Secret",
    });
    let (status, body) = common::send(&app, put("/api/v1/auth/reset-password", confirm.clone()).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password has been reset successfully");

    let (status, _) = common::send(
        &app,
        post("/api/v1/auth/login", json!({ "email": "frank@example.com", "password": "N3w!Secret" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::send(
        &app,
        post("/api/v1/auth/login", json!({ "email": "frank@example.com", "password": STRONG_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = common::send(&app, put("/api/v1/auth/reset-password", confirm).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OTP");
}

#[actix_web::test]
async fn test_weak_new_password_keeps_code_usable() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;
    ctx.state
        .auth_service
        .register("gina@example.com", "gina", STRONG_PASSWORD)
        .await
        .unwrap();
    common::send(
        &app,
        post("/api/v1/auth/reset-password", json!({ "email": "gina@example.com" })).to_request(),
    )
    .await;
    let code = ctx.sender.last_code_for("gina@example.com").unwrap();

    let (status, body) = common::send(
        &app,
        put(
            "/api/v1/auth/reset-password",
            json!({ "email": "gina@example.com", "otp": code, "new_password": "short" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "WEAK_PASSWORD");

    let (status, _) = common::send(
        &app,
        put(
            "/api/v1/auth/reset-password",
            json!({ "email": "gina@example.com", "otp": code, "newPassword": "B3tter!Pass" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_reset_for_missing_account_is_404() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let record = ctx
        .state
        .auth_service
        .otp_manager()
        .issue("hank@example.com", OtpPurpose::PasswordReset)
        .await
        .unwrap();

    let (status, body) = common::send(
        &app,
        put(
            "/api/v1/auth/reset-password",
            json!({ "email": "hank@example.com", "otp": record.code, "newPassword": "N3w!Secret" }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "USER_NOT_FOUND");
}

#[actix_web::test]
async fn test_registration_code_cannot_reset_password() {
    let ctx = common::context();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    common::send(
        &app,
        post("/api/v1/auth/send-otp", json!({ "email": "ivy@example.com" })).to_request(),
    )
    .await;
    let code = ctx.sender.last_code_for("ivy@example.com").unwrap();
    ctx.state
        .auth_service
        .register("ivy@example.com", "ivy", STRONG_PASSWORD)
        .await
        .unwrap();

    let (status, body) = common::send(
        &app,
        put(
            "/api/v1/auth/reset-password",
            json!({ "email": "ivy@example.com", "otp": code, "newPassword": "N3w!Secret" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OTP");
}
