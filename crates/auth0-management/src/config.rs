//! Tenant connection settings, read from `AUTH0_*` environment variables.

use std::time::Duration;

use crate::auth::Credentials;

/// Connection settings for one Auth0 tenant.
#[derive(Debug, Clone)]
pub struct ManagementConfig {
    /// Tenant domain, e.g. `example.eu.auth0.com`.
    pub domain: String,

    /// How requests are authenticated.
    pub credentials: Credentials,

    /// Log request and response lines at debug level.
    pub debug: bool,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Attempts after the first one for transient failures.
    pub max_retries: u32,
}

impl ManagementConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let domain = reader("AUTH0_DOMAIN")
            .map_err(|_| ConfigError::MissingVar("AUTH0_DOMAIN".into()))?
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();
        if domain.is_empty() {
            return Err(ConfigError::InvalidValue(
                "AUTH0_DOMAIN".into(),
                "must not be empty".into(),
            ));
        }

        let credentials = match reader("AUTH0_API_TOKEN") {
            Ok(token) if !token.is_empty() => Credentials::Bearer { token },
            _ => {
                let client_id = reader("AUTH0_CLIENT_ID").map_err(|_| {
                    ConfigError::MissingVar("AUTH0_API_TOKEN or AUTH0_CLIENT_ID".into())
                })?;
                let client_secret = reader("AUTH0_CLIENT_SECRET")
                    .map_err(|_| ConfigError::MissingVar("AUTH0_CLIENT_SECRET".into()))?;
                let audience = reader("AUTH0_AUDIENCE")
                    .unwrap_or_else(|_| format!("https://{domain}/api/v2/"));
                Credentials::ClientCredentials {
                    client_id,
                    client_secret,
                    audience,
                }
            }
        };

        let debug = match reader("AUTH0_DEBUG") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| ConfigError::InvalidValue("AUTH0_DEBUG".into(), value))?,
            Err(_) => false,
        };

        let timeout_secs = reader("AUTH0_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue("AUTH0_TIMEOUT_SECS".into(), e.to_string()))?;

        let max_retries = reader("AUTH0_MAX_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidValue("AUTH0_MAX_RETRIES".into(), e.to_string()))?;

        Ok(Self {
            domain,
            credentials,
            debug,
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
        })
    }

    /// Base URL of the tenant, e.g. `https://example.auth0.com`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}", self.domain)
    }
}

/// `true`/`false` or `1`/`0`, ignoring case and surrounding whitespace.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
