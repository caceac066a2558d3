//! Client-credentials token cache for the eBay APIs.
//!
//! [`CredentialCache`] owns the single cached bearer token. A cache hit is a
//! mutex acquire plus a timestamp comparison. On a miss the exchange runs
//! while the lock is held, so callers that arrive during a refresh wait for
//! it and reuse the new token. Failed exchanges are never cached: the next
//! caller simply tries again.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::AuthError;

/// Tokens are treated as expired this long before eBay says they are.
pub const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the identity endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(7200);

const TOKEN_PATH: &str = "identity/v1/oauth2/token";
const API_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

/// Source of the current time. Swapped for a fake in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A freshly issued token and how long it is valid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub lifetime: Duration,
}

/// Performs one credential exchange against an identity provider.
pub trait TokenExchange: Send + Sync {
    fn exchange(&self) -> impl Future<Output = Result<IssuedToken, AuthError>> + Send;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// OAuth client-credentials exchange against `POST /identity/v1/oauth2/token`.
pub struct OAuthClientCredentials {
    client: Client,
    token_url: Url,
    client_id: String,
    client_secret: String,
}

impl OAuthClientCredentials {
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidUrl`] if `base_url` cannot be joined with
    /// the token path.
    pub fn new(
        client: Client,
        base_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, AuthError> {
        let raw = format!("{}/{TOKEN_PATH}", base_url.trim_end_matches('/'));
        let token_url = Url::parse(&raw).map_err(|e| AuthError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token_url,
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
        })
    }
}

impl TokenExchange for OAuthClientCredentials {
    async fn exchange(&self) -> Result<IssuedToken, AuthError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", API_SCOPE)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(AuthError::Deserialize)?;
        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let lifetime = parsed
            .expires_in
            .map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs);

        Ok(IssuedToken {
            access_token,
            lifetime,
        })
    }
}

#[derive(Debug, Clone)]
struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Process-wide holder of the current access token.
pub struct CredentialCache<E, C = SystemClock> {
    exchange: E,
    clock: C,
    slot: Mutex<Option<Credential>>,
}

impl<E: TokenExchange> CredentialCache<E, SystemClock> {
    pub fn new(exchange: E) -> Self {
        Self::with_clock(exchange, SystemClock)
    }
}

impl<E: TokenExchange, C: Clock> CredentialCache<E, C> {
    pub fn with_clock(exchange: E, clock: C) -> Self {
        Self {
            exchange,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Returns a valid bearer token, exchanging credentials only when the
    /// cached one is missing or past its (margin-adjusted) expiry.
    ///
    /// # Errors
    ///
    /// Propagates the [`AuthError`] from the exchange. Nothing is cached on
    /// failure.
    pub async fn get_credential(&self) -> Result<String, AuthError> {
        let mut slot = self.slot.lock().await;

        if let Some(credential) = slot.as_ref() {
            if self.clock.now() < credential.expires_at {
                return Ok(credential.token.clone());
            }
        }

        tracing::debug!("access token missing or expired; exchanging client credentials");
        let issued = self.exchange.exchange().await.inspect_err(|e| {
            tracing::warn!(error = %e, "credential exchange failed");
        })?;

        let expires_at = expiry_for(self.clock.now(), issued.lifetime);
        tracing::info!(
            lifetime_secs = issued.lifetime.as_secs(),
            %expires_at,
            "obtained new eBay access token"
        );

        *slot = Some(Credential {
            token: issued.access_token.clone(),
            expires_at,
        });

        Ok(issued.access_token)
    }

    /// Drops any cached token so the next call re-exchanges.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}

fn expiry_for(now: DateTime<Utc>, lifetime: Duration) -> DateTime<Utc> {
    let lifetime = TimeDelta::from_std(lifetime).unwrap_or(TimeDelta::MAX);
    let margin = TimeDelta::from_std(EXPIRY_SAFETY_MARGIN).unwrap_or(TimeDelta::zero());
    now.checked_add_signed(lifetime - margin)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    struct FakeClock(StdMutex<DateTime<Utc>>);

    impl FakeClock {
        fn at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(StdMutex::new(now)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += TimeDelta::from_std(by).unwrap();
        }
    }

    impl Clock for Arc<FakeClock> {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Issues `token-1`, `token-2`, ... and counts calls. Fails while `fail` is set.
    struct FakeExchange {
        calls: Arc<AtomicU32>,
        lifetime: Duration,
        fail: bool,
    }

    impl TokenExchange for FakeExchange {
        async fn exchange(&self) -> Result<IssuedToken, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(AuthError::MissingToken);
            }
            Ok(IssuedToken {
                access_token: format!("token-{n}"),
                lifetime: self.lifetime,
            })
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn cache(
        lifetime: Duration,
        fail: bool,
    ) -> (
        CredentialCache<FakeExchange, Arc<FakeClock>>,
        Arc<AtomicU32>,
        Arc<FakeClock>,
    ) {
        let calls = Arc::new(AtomicU32::new(0));
        let clock = FakeClock::at(start());
        let cache = CredentialCache::with_clock(
            FakeExchange {
                calls: Arc::clone(&calls),
                lifetime,
                fail,
            },
            Arc::clone(&clock),
        );
        (cache, calls, clock)
    }

    #[tokio::test]
    async fn second_call_within_lifetime_reuses_token() {
        let (cache, calls, clock) = cache(Duration::from_secs(7200), false);

        assert_eq!(cache.get_credential().await.unwrap(), "token-1");
        clock.advance(Duration::from_secs(3600));
        assert_eq!(cache.get_credential().await.unwrap(), "token-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn call_after_expiry_exchanges_exactly_once() {
        let (cache, calls, clock) = cache(Duration::from_secs(7200), false);

        cache.get_credential().await.unwrap();
        clock.advance(Duration::from_secs(7200));
        assert_eq!(cache.get_credential().await.unwrap(), "token-2");
        assert_eq!(cache.get_credential().await.unwrap(), "token-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn safety_margin_expires_token_sixty_seconds_early() {
        let (cache, calls, clock) = cache(Duration::from_secs(600), false);

        cache.get_credential().await.unwrap();
        clock.advance(Duration::from_secs(539));
        cache.get_credential().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1, "still inside the margin");

        clock.advance(Duration::from_secs(1));
        cache.get_credential().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2, "540s = 600s - 60s margin");
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (cache, calls, _clock) = cache(Duration::from_secs(7200), true);

        assert!(matches!(
            cache.get_credential().await,
            Err(AuthError::MissingToken)
        ));
        assert!(cache.get_credential().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2, "each caller retries");
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let (cache, calls, _clock) = cache(Duration::from_secs(7200), false);

        cache.get_credential().await.unwrap();
        cache.invalidate().await;
        assert_eq!(cache.get_credential().await.unwrap(), "token-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let (cache, calls, _clock) = cache(Duration::from_secs(7200), false);
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_credential().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "token-1");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expiry_saturates_on_absurd_lifetimes() {
        let expiry = expiry_for(start(), Duration::from_secs(u64::MAX));
        assert_eq!(expiry, DateTime::<Utc>::MAX_UTC);
    }
}
