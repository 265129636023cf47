//
//  domino-environments
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credential handling for the Domino platform. Two credential forms are
//! supported:
//!
//! - **API key**: a static key sent on every request as the
//!   `X-Domino-Api-Key` header.
//! - **Bearer token file**: a path to a file containing a short-lived token
//!   (typically mounted into a Domino run). The file is re-read on every
//!   request so a rotated token is picked up without re-initialization.
//!
//! Which credential is used is decided during
//! [`ClientConfig::resolve`](crate::config::ClientConfig::resolve): a token
//! file takes precedence over an API key, and having neither is a fatal
//! configuration error.
//!
//! ## Example
//!
//! ```rust
//! use domino_environments::auth::AuthCredential;
//!
//! let credential = AuthCredential::ApiKey {
//!     key: "my-api-key".to_string(),
//! };
//! ```

use std::fs;
use std::path::PathBuf;

use reqwest::RequestBuilder;

use crate::api::ApiError;

/// Header name used for API key authentication.
pub const API_KEY_HEADER: &str = "X-Domino-Api-Key";

/// Represents the authentication credentials accepted by the Domino platform.
///
/// # Variants
///
/// - `ApiKey`: static user API key, sent as the [`API_KEY_HEADER`] header.
/// - `BearerTokenFile`: path to a token file, read per request and sent as an
///   `Authorization: Bearer` header.
///
/// # Example
///
/// ```rust
/// use std::path::PathBuf;
/// use domino_environments::auth::AuthCredential;
///
/// let key_cred = AuthCredential::ApiKey {
///     key: "my-api-key".to_string(),
/// };
///
/// let token_cred = AuthCredential::BearerTokenFile {
///     path: PathBuf::from("/var/run/domino/token"),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCredential {
    /// Static API key authentication.
    ApiKey {
        /// The user API key.
        key: String,
    },
    /// Bearer token authentication backed by a token file.
    ///
    /// The file is read on every request; tokens issued to Domino runs are
    /// short-lived and rotated in place.
    BearerTokenFile {
        /// Path to the file containing the bearer token.
        path: PathBuf,
    },
}

impl AuthCredential {
    /// Applies this credential to an outgoing request.
    ///
    /// # Parameters
    ///
    /// * `request` - The request builder to authenticate.
    ///
    /// # Returns
    ///
    /// The request builder with the appropriate authentication header set.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the token file cannot be read.
    pub fn apply_to_request(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self {
            Self::ApiKey { key } => Ok(request.header(API_KEY_HEADER, key)),
            Self::BearerTokenFile { path } => {
                let token = fs::read_to_string(path).map_err(|e| {
                    ApiError::Config(format!(
                        "failed to read token file {}: {e}",
                        path.display()
                    ))
                })?;
                Ok(request.bearer_auth(token.trim()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_file_is_config_error() {
        let credential = AuthCredential::BearerTokenFile {
            path: PathBuf::from("/nonexistent/token"),
        };
        let client = reqwest::Client::new();
        let request = client.get("https://domino.example.com/version");
        match credential.apply_to_request(request) {
            Err(ApiError::Config(message)) => assert!(message.contains("token file")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_token_file_is_trimmed() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "secret-token").unwrap();

        let credential = AuthCredential::BearerTokenFile {
            path: file.path().to_path_buf(),
        };
        let client = reqwest::Client::new();
        let request = client.get("https://domino.example.com/version");
        let built = credential
            .apply_to_request(request)
            .unwrap()
            .build()
            .unwrap();
        let header = built.headers().get("authorization").unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer secret-token");
    }
}
