//! CORS middleware configuration for cross-origin requests.
//!
//! Origins come from `CorsConfig`. A `*` entry allows any origin; in that case
//! credentials are not supported, as browsers reject the combination.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use vh_shared::config::CorsConfig;

use super::request_id::REQUEST_ID_HEADER;

/// Creates a CORS middleware instance from configuration
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers(vec![header::HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("CORS allows any origin");
        return cors.allow_any_origin();
    }

    for origin in &config.allowed_origins {
        tracing::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    cors.supports_credentials()
}
