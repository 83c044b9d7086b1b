//! Management API authentication: static token or client credentials.

use crate::error::{ManagementError, ManagementResult};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// How requests to the Management API are authenticated.
///
/// The [`Debug`] impl redacts tokens and secrets.
#[derive(Clone)]
pub enum Credentials {
    /// Pre-issued Management API token.
    Bearer { token: String },

    /// Machine-to-machine client credentials grant.
    ClientCredentials {
        client_id: String,
        client_secret: String,
        audience: String,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
            Self::ClientCredentials {
                client_id,
                audience,
                ..
            } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .field("audience", audience)
                .finish(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<std::time::Instant>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => std::time::Instant::now() >= exp,
            None => false,
        }
    }
}

/// Attaches a bearer token to outgoing requests, fetching and caching one
/// from `/oauth/token` when client credentials are configured.
#[derive(Debug, Clone)]
pub struct ManagementAuth {
    credentials: Credentials,
    token_url: String,
    /// Shared across clones.
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    http_client: reqwest::Client,
}

impl ManagementAuth {
    /// `base_url` is the tenant origin; the token endpoint is derived from it.
    #[must_use]
    pub fn new(credentials: Credentials, base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            credentials,
            token_url: format!("{}/oauth/token", base_url.trim_end_matches('/')),
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    pub async fn get_bearer_token(&self) -> ManagementResult<String> {
        match &self.credentials {
            Credentials::Bearer { token } => Ok(token.clone()),
            Credentials::ClientCredentials {
                client_id,
                client_secret,
                audience,
            } => {
                {
                    let cache = self.cached_token.read().await;
                    if let Some(cached) = cache.as_ref() {
                        if !cached.is_expired() {
                            return Ok(cached.access_token.clone());
                        }
                    }
                }

                debug!("Fetching management API token from {}", self.token_url);
                let body = serde_json::json!({
                    "grant_type": "client_credentials",
                    "client_id": client_id,
                    "client_secret": client_secret,
                    "audience": audience,
                });

                let response = self
                    .http_client
                    .post(&self.token_url)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| ManagementError::AuthError(format!("token request failed: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<no body>".to_string());
                    return Err(ManagementError::AuthError(format!(
                        "token endpoint returned {status}: {body}"
                    )));
                }

                let token_response: TokenResponse = response.json().await.map_err(|e| {
                    ManagementError::AuthError(format!("failed to parse token response: {e}"))
                })?;

                // Expire 30 seconds early.
                let expires_at = token_response.expires_in.map(|secs| {
                    std::time::Instant::now()
                        + std::time::Duration::from_secs(secs.saturating_sub(30))
                });

                let access_token = token_response.access_token.clone();
                *self.cached_token.write().await = Some(CachedToken {
                    access_token: token_response.access_token,
                    expires_at,
                });

                Ok(access_token)
            }
        }
    }

    /// Apply authentication to a request builder.
    pub async fn apply(&self, builder: RequestBuilder) -> ManagementResult<RequestBuilder> {
        let token = self.get_bearer_token().await?;
        Ok(builder.bearer_auth(token))
    }

    /// Drop the cached token, e.g. after a 401.
    pub async fn invalidate_cache(&self) {
        *self.cached_token.write().await = None;
    }
}
