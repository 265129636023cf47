//
//  domino-environments
//  api/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Unified error taxonomy for all Domino API operations.
//!
//! Every operation on the [`EnvironmentManager`](crate::manager::EnvironmentManager)
//! raises through this one enum; no operation hands a raw failed response back
//! to the caller. The classification is:
//!
//! | Variant | Meaning | Caller action |
//! |---------|---------|---------------|
//! | `Config` | Client-side misconfiguration | Fix configuration |
//! | `IncompatibleVersion` | Deployment too old for this library | Upgrade deployment or library |
//! | `Client` | 4xx response | Fix the request |
//! | `Server` | 5xx response | Transient; caller may retry |
//! | `Network` | Transport failure | Check connectivity |
//! | `MalformedArchive` | Revision archive failed to parse | Report; wrapper format may have changed |
//! | `UnexpectedResponse` | Response shape not understood | Report |
//! | `InvalidPayload` | Form payload failed to decode | Fix the payload |

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for all Domino API operations.
///
/// Implements the standard `Error` trait via `thiserror` for ergonomic
/// propagation with the `?` operator.
///
/// # Example
///
/// ```rust
/// use domino_environments::api::ApiError;
///
/// fn handle<T>(result: Result<T, ApiError>) {
///     match result {
///         Ok(_) => println!("Success"),
///         Err(ApiError::Server { status, .. }) => {
///             println!("Transient server error ({status}), consider retrying")
///         }
///         Err(e) => println!("Error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client-side configuration is invalid or incomplete.
    ///
    /// Raised immediately at initialization when neither an API key nor a
    /// token file is available, when no host is configured, or when a token
    /// file cannot be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The deployment's version is older than this library supports.
    ///
    /// Raised once at [`connect`](crate::manager::EnvironmentManager::connect)
    /// after fetching the deployment version.
    #[error(
        "Domino version {deployed} is not compatible with domino-environments {library} \
         (minimum supported: {minimum})"
    )]
    IncompatibleVersion {
        /// The version reported by the deployment.
        deployed: String,
        /// This library's version.
        library: String,
        /// The minimum deployment version this library supports.
        minimum: String,
    },

    /// The request was rejected by the platform (HTTP 4xx).
    ///
    /// Indicates a caller error: a missing resource, bad parameters, or
    /// insufficient permissions. Retrying without changes will not help.
    #[error("Request rejected ({status}): {message}")]
    Client {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The message extracted from the response body.
        message: String,
    },

    /// The platform failed to process the request (HTTP 5xx).
    ///
    /// Typically transient. No retry is built in; callers may retry at their
    /// own discretion.
    #[error("Server error ({status}): {message}")]
    Server {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The message extracted from the response body.
        message: String,
    },

    /// A transport-level failure: connection refused, timeout, DNS, TLS.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A downloaded revision archive could not be parsed.
    ///
    /// Raised when the tar stream is unreadable, a recognized member is not
    /// valid UTF-8, or the Dockerfile wrapper markers are absent. This is a
    /// deliberate departure from best-effort parsing: a wrapper format change
    /// on the platform side surfaces here instead of silently corrupting the
    /// extracted data.
    #[error("Malformed revision archive: {0}")]
    MalformedArchive(String),

    /// A response parsed as JSON but did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A form payload could not be decoded back into a revision spec.
    #[error("Invalid form payload: {0}")]
    InvalidPayload(String),
}
