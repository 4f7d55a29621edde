use std::env;

use url::Url;

use super::env::{
    AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, LoggingConfig, NotificationConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("CLASSIFIER_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        Url::parse(&base_url)
            .map_err(|_| ConfigError::Invalid("CLASSIFIER_API_URL", base_url.clone()))?;

        let classifier = ClassifierConfig { base_url };

        let notification = NotificationConfig {
            icon_url: env::var("NOTIFICATION_ICON_URL")
                .unwrap_or_else(|_| "assets/icon48.png".to_string()),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            db_filename: env::var("DB_FILENAME").unwrap_or_else(|_| "phishguard.db".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            classifier,
            notification,
            directories,
            logging,
        })
    }
}
