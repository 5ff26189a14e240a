use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{error, info};

use vh_api::{bootstrap::build_services, create_app, telemetry::init_tracing};
use vh_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging).context("installing tracing subscriber")?;

    info!(environment = %config.environment, "Starting VerifyHub API Server");

    if let Err(errors) = config.validate() {
        for problem in &errors {
            error!("Configuration error: {}", problem);
        }
        anyhow::bail!("invalid configuration ({} problems)", errors.len());
    }

    let services = build_services(&config).await?;
    let state = web::Data::new(services.state.clone());

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server
        .bind(&bind_address)
        .with_context(|| format!("binding {}", bind_address))?
        .run()
        .await;

    info!("Server stopped, releasing resources");
    services.shutdown().await;

    result.context("running HTTP server")
}
