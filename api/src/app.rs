//! Application factory
//!
//! Builds the actix-web `App` with routes, middleware and JSON settings so the
//! binary and the HTTP tests run exactly the same stack.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use tracing_actix_web::TracingLogger;
use vh_shared::config::AppConfig;

use crate::handlers::error::{json_error_handler, not_found};
use crate::middleware::{create_cors, RequestIdMiddleware, SecurityMiddleware};
use crate::routes::auth::{
    login::login,
    register::register,
    reset_password::{request_password_reset, reset_password},
    send_otp::send_otp,
    verify_otp::verify_otp,
    AppState,
};
use crate::routes::health::health_check;

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Last wrap runs first: request id, tracing span, CORS, then headers
        .wrap(SecurityMiddleware::for_environment(config.environment))
        .wrap(create_cors(&config.cors))
        .wrap(TracingLogger::default())
        .wrap(RequestIdMiddleware)
        .route("/health", web::get().to(health_check))
        .service(web::scope("/api/v1").configure(configure_auth_routes))
        .default_service(web::route().to(not_found))
}

/// Register the `/auth` routes
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/send-otp", web::post().to(send_otp))
            .route("/verify-otp", web::post().to(verify_otp))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/reset-password")
                    .route(web::post().to(request_password_reset))
                    .route(web::put().to(reset_password)),
            ),
    );
}
