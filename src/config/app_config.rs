use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub api: ApiSettings,
    pub webhook: WebhookSettings,
    pub page_store: PageStoreSettings,
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Persistence backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    /// Connection URL for the postgres backend; falls back to the
    /// `DATABASE_URL` environment variable
    pub database_url: Option<String>,
}

/// Inbound API behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Master switch; when off every request gets a 503
    pub enabled: bool,
    /// Requests allowed per key per window
    pub rate_limit: u32,
    /// Window length in seconds, anchored at a key's first request
    pub rate_limit_window_secs: u64,
    /// Allow requests when the rate counter state is unavailable;
    /// default denies them
    pub rate_limit_fail_open: bool,
}

/// Outbound webhook behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Destination URL; unset disables notifications
    pub url: Option<String>,
    /// Signing secret; a random one is generated at startup when unset
    pub secret: Option<String>,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the initial try
    pub max_retries: u32,
}

/// Page store collaborator settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageStoreSettings {
    /// Base URL used to build page permalinks
    pub base_url: String,
}

/// Admin API settings
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AdminSettings {
    /// Shared token for the admin surface; unset disables it
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_limit: 100,
            rate_limit_window_secs: 3600,
            rate_limit_fail_open: false,
        }
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            url: None,
            secret: None,
            timeout_secs: 10,
            max_retries: 2,
        }
    }
}

impl Default for PageStoreSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_expected_policy() {
        let config = AppConfig::default();

        assert!(config.api.enabled);
        assert_eq!(config.api.rate_limit, 100);
        assert_eq!(config.api.rate_limit_window_secs, 3600);
        assert!(!config.api.rate_limit_fail_open);
        assert!(config.webhook.url.is_none());
        assert_eq!(config.webhook.timeout_secs, 10);
        assert_eq!(config.webhook.max_retries, 2);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.server.port, 8080);
        assert!(config.admin.token.is_none());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "api": {"rate_limit": 10},
                "webhook": {"url": "https://example.com/hook"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.api.rate_limit, 10);
        // Untouched sections keep their defaults
        assert!(config.api.enabled);
        assert_eq!(
            config.webhook.url.as_deref(),
            Some("https://example.com/hook")
        );
        assert_eq!(config.webhook.max_retries, 2);
    }
}
