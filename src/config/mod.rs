//
//  domino-environments
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Resolves the client's connection settings. Each setting follows the same
//! precedence rule: an explicitly supplied value wins over the named
//! environment variable; a setting with neither source is either an error
//! (host, credentials) or simply absent.
//!
//! | Setting | Environment variable |
//! |---------|----------------------|
//! | Deployment host | `DOMINO_API_HOST` |
//! | User API key | `DOMINO_USER_API_KEY` |
//! | Token file path | `DOMINO_TOKEN_FILE` |
//! | Log filter (caller-side) | `DOMINO_LOG_LEVEL` |
//!
//! The host URL is normalized to `scheme://host[:port]`; any path or trailing
//! slash is dropped since the route table appends full paths itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use domino_environments::config::ClientConfig;
//!
//! let resolved = ClientConfig::new()
//!     .with_host("https://domino.example.com/")
//!     .with_api_key("my-api-key")
//!     .resolve()?;
//! assert_eq!(resolved.host, "https://domino.example.com");
//! # Ok::<(), domino_environments::api::ApiError>(())
//! ```

use std::env;
use std::path::PathBuf;

use url::Url;

use crate::api::ApiError;
use crate::auth::AuthCredential;

/// Environment variable naming the deployment host URL.
pub const HOST_ENV_VAR: &str = "DOMINO_API_HOST";

/// Environment variable naming the user API key.
pub const API_KEY_ENV_VAR: &str = "DOMINO_USER_API_KEY";

/// Environment variable naming the bearer token file path.
pub const TOKEN_FILE_ENV_VAR: &str = "DOMINO_TOKEN_FILE";

/// Environment variable consumers may use to configure a log filter.
///
/// The library itself only emits `tracing` events and never installs a
/// subscriber; this name is provided for binaries that want a conventional
/// filter variable.
pub const LOG_LEVEL_ENV_VAR: &str = "DOMINO_LOG_LEVEL";

/// Unresolved client configuration.
///
/// Collects explicitly supplied settings; [`resolve`](Self::resolve) fills
/// the gaps from the environment and validates the result.
///
/// # Example
///
/// ```rust,no_run
/// use domino_environments::config::ClientConfig;
///
/// // Everything from the environment:
/// let from_env = ClientConfig::new().resolve();
///
/// // Explicit values win over the environment:
/// let explicit = ClientConfig::new()
///     .with_host("https://domino.example.com")
///     .with_token_file("/var/run/domino/token")
///     .resolve();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    host: Option<String>,
    api_key: Option<String>,
    token_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deployment host URL explicitly.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the user API key explicitly.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the bearer token file path explicitly.
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Resolves the configuration into a validated [`ResolvedConfig`].
    ///
    /// Missing settings are read from their environment variables. A token
    /// file takes precedence over an API key when both are available.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when:
    /// - no host is supplied explicitly or via `DOMINO_API_HOST`,
    /// - the host is not a valid absolute URL,
    /// - neither a token file nor an API key is available.
    pub fn resolve(self) -> Result<ResolvedConfig, ApiError> {
        let host = self
            .host
            .or_else(|| env::var(HOST_ENV_VAR).ok())
            .ok_or_else(|| {
                ApiError::Config(format!(
                    "host must be provided explicitly or via the {HOST_ENV_VAR} environment variable"
                ))
            })?;
        let host = clean_host_url(&host)?;

        let token_file = self
            .token_file
            .or_else(|| env::var(TOKEN_FILE_ENV_VAR).ok().map(PathBuf::from));
        let api_key = self.api_key.or_else(|| env::var(API_KEY_ENV_VAR).ok());

        let auth = match (token_file, api_key) {
            (Some(path), _) => {
                tracing::info!(path = %path.display(), "initializing with bearer token auth");
                AuthCredential::BearerTokenFile { path }
            }
            (None, Some(key)) => {
                tracing::info!("fallback: initializing with API key auth");
                AuthCredential::ApiKey { key }
            }
            (None, None) => {
                return Err(ApiError::Config(
                    "either an API key or a token file path must be provided explicitly \
                     or via environment variable"
                        .to_string(),
                ));
            }
        };

        Ok(ResolvedConfig { host, auth })
    }
}

/// Validated connection settings produced by [`ClientConfig::resolve`].
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Normalized host URL, `scheme://host[:port]` with no trailing slash.
    pub host: String,

    /// The credential selected for this client.
    pub auth: AuthCredential,
}

/// Normalizes a host URL to `scheme://host[:port]`.
///
/// Any path, query, or trailing slash is discarded. The route table appends
/// full endpoint paths to this base.
///
/// # Errors
///
/// Returns [`ApiError::Config`] if the value is not an absolute URL with a
/// host component.
fn clean_host_url(raw: &str) -> Result<String, ApiError> {
    let url = Url::parse(raw)
        .map_err(|e| ApiError::Config(format!("invalid host URL {raw:?}: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| ApiError::Config(format!("host URL {raw:?} has no host component")))?;

    match url.port() {
        Some(port) => Ok(format!("{}://{host}:{port}", url.scheme())),
        None => Ok(format!("{}://{host}", url.scheme())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_host_url_strips_trailing_slash() {
        assert_eq!(
            clean_host_url("https://domino.example.com/").unwrap(),
            "https://domino.example.com"
        );
    }

    #[test]
    fn test_clean_host_url_strips_path_and_keeps_port() {
        assert_eq!(
            clean_host_url("http://localhost:8080/some/path").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_clean_host_url_rejects_relative() {
        assert!(matches!(
            clean_host_url("domino.example.com"),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_explicit_token_file_wins_over_api_key() {
        let resolved = ClientConfig::new()
            .with_host("https://domino.example.com")
            .with_api_key("key")
            .with_token_file("/var/run/domino/token")
            .resolve()
            .unwrap();
        assert!(matches!(
            resolved.auth,
            AuthCredential::BearerTokenFile { .. }
        ));
    }

    #[test]
    fn test_api_key_alone_resolves() {
        let resolved = ClientConfig::new()
            .with_host("https://domino.example.com")
            .with_api_key("key")
            .resolve()
            .unwrap();
        assert_eq!(
            resolved.auth,
            AuthCredential::ApiKey {
                key: "key".to_string()
            }
        );
        assert_eq!(resolved.host, "https://domino.example.com");
    }
}
