use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use vh_core::domain::entities::user::UserProfile;
use vh_shared::utils::mask_email;

use super::AppState;
use crate::dto::auth::{LoginRequest, UserResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};
use crate::middleware::RequestIdExt;

/// Handler for POST /api/v1/auth/login
///
/// # Responses
/// - 200: `{ "message": "Login successful", "user": {..} }`
/// - 400: missing fields
/// - 401: unknown email or wrong password, indistinguishably
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let request_id = req.request_id();

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        request_id = %request_id,
        email = %mask_email(&request.email),
        "Processing login request"
    );

    match state.auth_service.login(&request.email, &request.password).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse {
            message: "Login successful".to_string(),
            user: UserProfile::from(&user),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
