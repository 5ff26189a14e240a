//! Wiring from configuration to the running services
//!
//! Chooses the passcode store and user repository backends, prepares their
//! schemas, starts expired-record cleanup where the store needs it, and picks
//! the email provider.

use anyhow::Context;
use std::sync::Arc;
use tokio::task::JoinHandle;

use vh_core::repositories::{InMemoryOtpStore, InMemoryUserRepository, OtpStore, UserRepository};
use vh_core::services::{
    AuthService, AuthServiceConfig, EmailSenderTrait, OtpCleanupConfig, OtpCleanupService,
    OtpManager, OtpManagerConfig,
};
use vh_infra::cache::{RedisClient, RedisOtpStore};
use vh_infra::database::{DatabasePool, MySqlOtpStore, MySqlUserRepository};
use vh_infra::email::{create_email_service, EmailServiceAdapter};
use vh_shared::config::{AppConfig, OtpStoreBackend, UserStoreBackend};

use crate::routes::auth::AppState;

/// Everything the HTTP server needs, plus handles to background work
pub struct Services {
    pub state: AppState,
    pub database: Option<DatabasePool>,
    pub cleanup_task: Option<JoinHandle<()>>,
}

impl Services {
    /// Stop background work and close pooled connections
    pub async fn shutdown(self) {
        if let Some(task) = self.cleanup_task {
            task.abort();
        }
        if let Some(pool) = self.database {
            pool.close().await;
        }
    }
}

/// Build the services described by the configuration
pub async fn build_services(config: &AppConfig) -> anyhow::Result<Services> {
    let needs_mysql = config.otp.store == OtpStoreBackend::Mysql
        || config.auth.user_store == UserStoreBackend::Mysql;

    let database = if needs_mysql {
        Some(
            DatabasePool::new(&config.database)
                .await
                .context("connecting to MySQL")?,
        )
    } else {
        None
    };

    let otp_store: Arc<dyn OtpStore> = match (config.otp.store, &database) {
        (OtpStoreBackend::Mysql, Some(pool)) => Arc::new(MySqlOtpStore::new(pool.get_pool().clone())),
        (OtpStoreBackend::Redis, _) => {
            let client = RedisClient::new(&config.cache)
                .await
                .context("connecting to Redis")?;
            Arc::new(RedisOtpStore::new(client))
        }
        _ => Arc::new(InMemoryOtpStore::new()),
    };
    otp_store
        .ensure_schema()
        .await
        .context("preparing passcode store")?;
    tracing::info!(backend = ?config.otp.store, "Passcode store ready");

    let user_repository: Arc<dyn UserRepository> = match (config.auth.user_store, &database) {
        (UserStoreBackend::Mysql, Some(pool)) => {
            let repository = MySqlUserRepository::new(pool.get_pool().clone());
            repository
                .ensure_schema()
                .await
                .context("preparing users table")?;
            Arc::new(repository)
        }
        _ => Arc::new(InMemoryUserRepository::new()),
    };
    tracing::info!(backend = ?config.auth.user_store, "User repository ready");

    let cleanup_task = Arc::new(OtpCleanupService::new(
        otp_store.clone(),
        OtpCleanupConfig::from(&config.otp),
    ))
    .start_background_task();

    let email_service = create_email_service(&config.email);
    tracing::info!(provider = email_service.provider_name(), "Email provider ready");
    let email_sender: Arc<dyn EmailSenderTrait> = Arc::new(EmailServiceAdapter::new(email_service));

    let state = build_state(
        otp_store,
        user_repository,
        email_sender,
        config,
    );

    Ok(Services {
        state,
        database,
        cleanup_task,
    })
}

/// Assemble the account service from already-built backends
pub fn build_state(
    otp_store: Arc<dyn OtpStore>,
    user_repository: Arc<dyn UserRepository>,
    email_sender: Arc<dyn EmailSenderTrait>,
    config: &AppConfig,
) -> AppState {
    let otp_manager = Arc::new(OtpManager::new(otp_store, OtpManagerConfig::from(&config.otp)));
    let auth_service = AuthService::new(
        user_repository,
        otp_manager,
        email_sender,
        AuthServiceConfig::from(&config.auth),
    );
    AppState::new(Arc::new(auth_service))
}
