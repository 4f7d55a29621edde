pub mod env;
mod loader;

pub use env::{AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, NotificationConfig};
pub use loader::load_config;
