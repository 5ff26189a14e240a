//! # VerifyHub API
//!
//! actix-web surface for passcode issuance and verification, account
//! registration, login and password reset.

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::auth::AppState;
