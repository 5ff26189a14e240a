use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use vh_shared::utils::mask_email;

use super::AppState;
use crate::dto::auth::{MessageResponse, SendOtpRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};
use crate::middleware::RequestIdExt;

/// Handler for POST /api/v1/auth/send-otp
///
/// Issues a registration code for an email with no account and emails it.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com" }
/// ```
///
/// # Responses
/// - 200: `{ "message": "Verification code sent successfully" }`
/// - 400: missing or malformed email, or an account already exists
/// - 503: the code was issued but the email provider refused it
pub async fn send_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        request_id = %request_id,
        email = %mask_email(&request.email),
        "Processing send-otp request"
    );

    match state.auth_service.start_registration(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Verification code sent successfully")),
        Err(error) => handle_domain_error(&error),
    }
}
