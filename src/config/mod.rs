//! Application configuration

mod app_config;

pub use app_config::{
    AdminSettings, ApiSettings, AppConfig, LogFormat, LoggingConfig, PageStoreSettings,
    ServerConfig, StorageSettings, WebhookSettings,
};
