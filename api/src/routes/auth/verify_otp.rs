use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use vh_core::domain::entities::otp_record::OtpPurpose;
use vh_core::errors::DomainError;
use vh_shared::utils::mask_email;

use super::AppState;
use crate::dto::auth::{MessageResponse, VerifyOtpRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};
use crate::middleware::RequestIdExt;

/// Handler for POST /api/v1/auth/verify-otp
///
/// Consumes a code for the given purpose. A code verifies at most once.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com", "otp": "042917", "type": "REGISTRATION" }
/// ```
///
/// # Responses
/// - 200: `{ "message": "OTP verified successfully" }`
/// - 400: missing fields, unknown type, or "Invalid or expired OTP"
pub async fn verify_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let purpose: OtpPurpose = match request.otp_type.parse() {
        Ok(purpose) => purpose,
        Err(error) => return handle_domain_error(&DomainError::ValidationErr(error)),
    };

    tracing::info!(
        request_id = %request_id,
        email = %mask_email(&request.email),
        purpose = %purpose,
        "Processing verify-otp request"
    );

    match state
        .auth_service
        .verify_code(&request.email, &request.otp, purpose)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("OTP verified successfully")),
        Err(error) => handle_domain_error(&error),
    }
}
