use thiserror::Error;

/// Failure to obtain a usable access token from the eBay identity endpoint.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network, TLS, or timeout failure talking to the identity endpoint.
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("token response is not valid JSON: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("no token in response")]
    MissingToken,

    #[error("invalid identity URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure to retrieve a page of search results.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl UpstreamError {
    /// Short machine-readable tag used in logs: `"auth"` or `"upstream"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Auth(_) => "auth",
            UpstreamError::Http(_)
            | UpstreamError::UnexpectedStatus { .. }
            | UpstreamError::Deserialize { .. }
            | UpstreamError::InvalidBaseUrl { .. } => "upstream",
        }
    }
}
