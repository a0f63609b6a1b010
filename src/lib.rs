//! Page Builder API
//!
//! A REST service for bulk page creation:
//! - API key authentication with hashed secrets
//! - Fixed-window per-key rate limiting
//! - Append-only activity trail (requests and created pages)
//! - Signed webhook notifications with bounded retry

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use api::state::AppState;
use domain::activity::{ActivityRecord, CreatedPageRecord};
use domain::api_key::ApiKey;
use infrastructure::activity::{ActivityLogService, StorageActivityLogRepository};
use infrastructure::api_key::{
    ApiKeyService, FailurePolicy, RateLimitConfig, RateLimiter, StorageApiKeyRepository,
};
use infrastructure::page::{BulkPageService, InMemoryPageStore};
use infrastructure::storage::{StorageConfig, StorageFactory, StorageType};
use infrastructure::webhook::{WebhookConfig, WebhookDispatcher};

/// Create the application state with all services wired from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = build_storage_config(config)?;
    info!("Storage backend: {:?}", storage_config.storage_type());

    // Persistent stores: keys plus the two append-only trail tables
    let api_key_storage = StorageFactory::create::<ApiKey>(&storage_config, "api_keys").await?;
    let activity_storage =
        StorageFactory::create::<ActivityRecord>(&storage_config, "activity_log").await?;
    let created_pages_storage =
        StorageFactory::create::<CreatedPageRecord>(&storage_config, "created_pages").await?;

    let rate_limiter = Arc::new(RateLimiter::new(
        RateLimitConfig::default()
            .with_limit(config.api.rate_limit)
            .with_window(Duration::from_secs(config.api.rate_limit_window_secs))
            .with_failure_policy(if config.api.rate_limit_fail_open {
                FailurePolicy::FailOpen
            } else {
                FailurePolicy::FailClosed
            }),
    ));

    let api_key_repository = Arc::new(StorageApiKeyRepository::new(api_key_storage));
    let api_key_service = Arc::new(
        ApiKeyService::new(api_key_repository).with_rate_limiter(rate_limiter),
    );

    let activity_repository = Arc::new(StorageActivityLogRepository::new(
        activity_storage,
        created_pages_storage,
    ));
    let activity_service = Arc::new(ActivityLogService::new(activity_repository.clone()));

    let webhook_secret = config.webhook.secret.clone().unwrap_or_else(|| {
        warn!(
            "No webhook secret configured. Generating a random one; receivers \
            cannot verify signatures across restarts. Set webhook.secret for \
            stable signing."
        );
        generate_random_secret()
    });

    let dispatcher = Arc::new(WebhookDispatcher::new(
        WebhookConfig::new(config.webhook.url.clone(), webhook_secret)
            .with_timeout(Duration::from_secs(config.webhook.timeout_secs))
            .with_max_retries(config.webhook.max_retries),
    ));

    // The real content engine is an external collaborator; the in-memory
    // store stands in for it here
    let page_store = Arc::new(
        InMemoryPageStore::new().with_base_url(config.page_store.base_url.clone()),
    );

    let page_service = Arc::new(BulkPageService::new(
        page_store,
        activity_repository,
        dispatcher,
    ));

    if let Ok(bootstrap_secret) = std::env::var("BOOTSTRAP_API_KEY") {
        seed_bootstrap_key(api_key_service.as_ref(), &bootstrap_secret).await?;
    }

    Ok(AppState::new(
        api_key_service,
        activity_service,
        page_service,
        config.api.enabled,
        config.admin.token.clone(),
    ))
}

fn build_storage_config(config: &AppConfig) -> anyhow::Result<StorageConfig> {
    let backend =
        StorageType::parse(&config.storage.backend).unwrap_or(StorageType::InMemory);

    match backend {
        StorageType::InMemory => Ok(StorageConfig::in_memory()),
        StorageType::Postgres => {
            let url = config
                .storage
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "storage.backend is 'postgres' but neither storage.database_url \
                        nor DATABASE_URL is set"
                    )
                })?;
            Ok(StorageConfig::postgres_url(url))
        }
    }
}

/// Create an API key from the `BOOTSTRAP_API_KEY` environment variable so a
/// fresh in-memory deployment is immediately usable
async fn seed_bootstrap_key(
    api_key_service: &ApiKeyService<StorageApiKeyRepository>,
    secret: &str,
) -> anyhow::Result<()> {
    let generated = api_key_service
        .generate_with_secret("Bootstrap Key", secret, None)
        .await?;

    info!(key_id = %generated.api_key.id(), "Bootstrap API key created");
    Ok(())
}

/// Generate a random alphanumeric secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
