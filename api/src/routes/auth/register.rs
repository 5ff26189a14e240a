use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use vh_core::domain::entities::user::UserProfile;
use vh_shared::utils::mask_email;

use super::AppState;
use crate::dto::auth::{RegisterRequest, UserResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};
use crate::middleware::RequestIdExt;

/// Handler for POST /api/v1/auth/register
///
/// Creates an account. Clients verify the registration code through
/// `/verify-otp` before calling this.
///
/// # Responses
/// - 201: `{ "message": "User registered successfully", "user": {..} }`
/// - 400: validation failure, weak password, email or username taken
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        request_id = %request_id,
        email = %mask_email(&request.email),
        "Processing register request"
    );

    match state
        .auth_service
        .register(&request.email, &request.username, &request.password)
        .await
    {
        Ok(user) => HttpResponse::Created().json(UserResponse {
            message: "User registered successfully".to_string(),
            user: UserProfile::from(&user),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
