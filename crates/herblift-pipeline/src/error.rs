use herblift_core::ConfigError;
use herblift_ebay::UpstreamError;
use thiserror::Error;

/// Errors raised while wiring a [`crate::SearchPipeline`] at startup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
