use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use vh_core::errors::{AuthError, DomainError};
use vh_shared::utils::mask_email;

use super::AppState;
use crate::dto::auth::{ConfirmResetPasswordRequest, MessageResponse, ResetPasswordRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};
use crate::middleware::RequestIdExt;

/// Returned whether or not an account exists for the email
pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists with this email, you will receive password reset instructions.";

/// Handler for POST /api/v1/auth/reset-password
///
/// Sends a reset code when the account exists. The response is identical for
/// unknown emails and for delivery failures, which are only logged.
pub async fn request_password_reset(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let masked = mask_email(&request.email);
    tracing::info!(request_id = %request_id, email = %masked, "Processing password reset request");

    match state.auth_service.request_password_reset(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(RESET_REQUESTED_MESSAGE)),
        Err(DomainError::Auth(AuthError::DeliveryFailed { reason })) => {
            tracing::warn!(
                request_id = %request_id,
                email = %masked,
                reason = %reason,
                "Password reset email was not delivered"
            );
            HttpResponse::Ok().json(MessageResponse::new(RESET_REQUESTED_MESSAGE))
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PUT /api/v1/auth/reset-password
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com", "otp": "042917", "newPassword": "N3w!Passw0rd" }
/// ```
///
/// # Responses
/// - 200: `{ "message": "Password has been reset successfully" }`
/// - 400: weak password (code left unused) or "Invalid or expired OTP"
/// - 404: no account for the email
pub async fn reset_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<ConfirmResetPasswordRequest>,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        request_id = %request_id,
        email = %mask_email(&request.email),
        "Processing password reset confirmation"
    );

    match state
        .auth_service
        .reset_password(&request.email, &request.otp, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Password has been reset successfully")),
        Err(error) => handle_domain_error(&error),
    }
}
