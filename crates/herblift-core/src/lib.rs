pub mod app_config;
pub mod catalog;
pub mod config;
pub mod intent;
pub mod listing;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, Catalog, CategoryRule, DEFAULT_CATEGORY};
pub use config::{load_app_config, load_app_config_from_env};
pub use intent::{Condition, SearchIntent, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use listing::{EnrichedListing, SearchResponse};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
