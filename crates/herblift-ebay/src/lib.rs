pub mod client;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod query;
pub mod types;

pub use client::{build_http_client, BrowseClient, RawSearchPage};
pub use credentials::{
    Clock, CredentialCache, IssuedToken, OAuthClientCredentials, SystemClock, TokenExchange,
};
pub use error::{AuthError, UpstreamError};
pub use types::RawListing;
