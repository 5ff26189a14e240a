//! Shared fixtures for HTTP tests: in-memory stores and a recording sender

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use actix_web::web;
use vh_api::{bootstrap::build_state, AppState};
use vh_core::{
    EmailSenderTrait, InMemoryOtpStore, InMemoryUserRepository, OtpStore, OutgoingEmail,
    UserRepository,
};
use vh_shared::config::AppConfig;

pub const STRONG_PASSWORD: &str = "Str0ng!Pass";

/// Captures every message and can be switched to fail
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub should_fail: Mutex<bool>,
}

impl RecordingSender {
    pub fn fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Six-digit code from the most recent message to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let email = sent.iter().rev().find(|e| e.to == to)?;
        extract_code(&email.text)
    }
}

fn extract_code(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(6)
        .enumerate()
        .find(|(i, w)| {
            w.iter().all(|c| c.is_ascii_digit())
                && chars.get(i + 6).map_or(true, |c| !c.is_ascii_digit())
                && (*i == 0 || !chars[i - 1].is_ascii_digit())
        })
        .map(|(_, w)| w.iter().collect())
}

#[async_trait]
impl EmailSenderTrait for RecordingSender {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String, String> {
        if *self.should_fail.lock().unwrap() {
            return Err("provider rejected message: quota exceeded".to_string());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(format!("test_{}", sent.len()))
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub config: AppConfig,
    pub sender: Arc<RecordingSender>,
    pub otp_store: Arc<InMemoryOtpStore>,
}

pub fn context() -> TestContext {
    context_with(|_| {})
}

pub fn context_with(adjust: impl FnOnce(&mut AppConfig)) -> TestContext {
    let mut config = AppConfig::default();
    config.auth.bcrypt_cost = 4;
    adjust(&mut config);

    let sender = Arc::new(RecordingSender::default());
    let otp_store = Arc::new(InMemoryOtpStore::new());
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());

    let state = build_state(
        otp_store.clone() as Arc<dyn OtpStore>,
        users,
        sender.clone() as Arc<dyn EmailSenderTrait>,
        &config,
    );

    TestContext {
        state: web::Data::new(state),
        config,
        sender,
        otp_store,
    }
}

/// Call the service and decode the JSON body (Null when the body is not JSON)
pub async fn send<S, R, B>(
    app: &S,
    req: R,
) -> (actix_web::http::StatusCode, serde_json::Value)
where
    S: actix_web::dev::Service<
        R,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let resp = actix_web::test::call_service(app, req).await;
    let status = resp.status();
    let body = actix_web::test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}
