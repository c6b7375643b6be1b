//! GCP Authentication
//!
//! Tokens come from Application Default Credentials, i.e. whatever
//! `gcloud auth application-default login` left behind, or from the
//! GOOGLE_OAUTH_ACCESS_TOKEN environment variable when set. The tool only
//! reads inventory, so it asks for the read-only platform scope.

use anyhow::{Context, Result};
use gcp_auth::TokenProvider;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Scopes requested for listing calls
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform.read-only"];

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Environment override carrying a ready-made access token
const TOKEN_ENV_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Where access tokens come from
#[derive(Clone)]
enum TokenSource {
    /// Application Default Credentials, with an in-process cache
    Adc {
        provider: Arc<dyn TokenProvider>,
        cache: Arc<RwLock<Option<CachedToken>>>,
    },
    /// A fixed token handed to us directly (env override, tests)
    Fixed(String),
}

/// GCP credentials holder
#[derive(Clone)]
pub struct Credentials {
    source: TokenSource,
}

impl Credentials {
    /// Create credentials from the ambient environment
    ///
    /// GOOGLE_OAUTH_ACCESS_TOKEN wins when present; otherwise Application
    /// Default Credentials are initialized. Failure here is the run's single
    /// fatal precondition.
    pub async fn new() -> Result<Self> {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                tracing::debug!("Using access token from {}", TOKEN_ENV_VAR);
                return Ok(Self::fixed(token.trim()));
            }
        }

        let provider = gcp_auth::provider().await.context(
            "Failed to initialize GCP credentials. Run 'gcloud auth application-default login'",
        )?;

        Ok(Self {
            source: TokenSource::Adc {
                provider,
                cache: Arc::new(RwLock::new(None)),
            },
        })
    }

    /// Credentials wrapping a fixed token
    pub fn fixed(token: &str) -> Self {
        Self {
            source: TokenSource::Fixed(token.to_string()),
        }
    }

    /// Get an access token for listing calls
    pub async fn token(&self) -> Result<String> {
        match &self.source {
            TokenSource::Fixed(token) => Ok(token.clone()),
            TokenSource::Adc { provider, cache } => {
                {
                    let cached = cache.read().await;
                    if let Some(cached) = cached.as_ref() {
                        if cached.is_valid() {
                            return Ok(cached.token.clone());
                        }
                        tracing::debug!("Cached token expired, fetching new token");
                    }
                }

                let token = provider
                    .token(DEFAULT_SCOPES)
                    .await
                    .context("Failed to get access token")?;
                let token_str = token.as_str().to_string();

                let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;
                {
                    let mut cached = cache.write().await;
                    *cached = Some(CachedToken {
                        token: token_str.clone(),
                        expires_at,
                    });
                }

                Ok(token_str)
            }
        }
    }
}
