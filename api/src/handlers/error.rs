//! Mapping from domain errors to HTTP responses
//!
//! Every handler funnels failures through `handle_domain_error` so status
//! codes and error codes are decided in one place.

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use std::collections::HashMap;
use validator::ValidationErrors;

use vh_core::errors::{AuthError, DomainError, ValidationError};
use vh_shared::errors::{error_codes, ErrorResponse};

/// Message returned for every passcode denial
pub const INVALID_OTP_MESSAGE: &str = "Invalid or expired OTP";

fn respond(status: StatusCode, body: ErrorResponse) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

/// Convert a domain error into the API error response
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, body) = map_domain_error(error);

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %error, "Request failed");
    } else {
        tracing::info!(status = status.as_u16(), error = %error, "Request rejected");
    }

    respond(status, body)
}

fn map_domain_error(error: &DomainError) -> (StatusCode, ErrorResponse) {
    match error {
        DomainError::Auth(auth_error) => map_auth_error(auth_error),
        DomainError::ValidationErr(ValidationError::UnknownPurpose { .. }) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::INVALID_OTP_TYPE, "Invalid OTP type"),
        ),
        DomainError::ValidationErr(validation) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, validation.to_string()),
        ),
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone()),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(error_codes::NOT_FOUND, format!("{} not found", resource)),
        ),
        // Store details stay in the logs
        DomainError::Persistence { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(
                error_codes::PERSISTENCE_ERROR,
                "A storage error occurred. Please try again later",
            ),
        ),
        DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
        ),
    }
}

fn map_auth_error(error: &AuthError) -> (StatusCode, ErrorResponse) {
    match error {
        AuthError::InvalidEmailFormat { .. } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::INVALID_EMAIL, "Invalid email format"),
        ),
        AuthError::InvalidVerificationCode => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::INVALID_OTP, INVALID_OTP_MESSAGE),
        ),
        AuthError::DeliveryFailed { reason } => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new(
                error_codes::EMAIL_DELIVERY_FAILED,
                format!("Failed to send verification email: {}", reason),
            ),
        ),
        AuthError::UserNotFound => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(error_codes::USER_NOT_FOUND, "User not found"),
        ),
        AuthError::UserAlreadyExists => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::USER_ALREADY_EXISTS, "User already exists"),
        ),
        AuthError::UsernameTaken => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::USERNAME_TAKEN, "Username is already taken"),
        ),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, "Invalid email or password"),
        ),
        AuthError::WeakPassword { violations } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                error_codes::WEAK_PASSWORD,
                "Password does not meet requirements",
            )
            .add_detail("violations", violations),
        ),
    }
}

/// 400 response listing the failing fields of a request body
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }

    // Lead with the first message so clients can show a single line
    let mut names: Vec<&String> = fields.keys().collect();
    names.sort();
    let message = names
        .first()
        .and_then(|name| fields[*name].first().cloned())
        .unwrap_or_else(|| "Invalid request data".to_string());

    tracing::info!(fields = ?names, "Request validation failed");

    respond(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new(error_codes::VALIDATION_ERROR, message).add_detail("fields", &fields),
    )
}

/// Error handler for malformed JSON bodies
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large".to_string()
        }
        other => format!("Invalid JSON body: {}", other),
    };

    let response = respond(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new(error_codes::BAD_REQUEST, message),
    );
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Default service for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    respond(
        StatusCode::NOT_FOUND,
        ErrorResponse::new(
            error_codes::NOT_FOUND,
            format!("No route for {} {}", req.method(), req.path()),
        ),
    )
}
