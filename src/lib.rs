//
//  domino-environments
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Domino Environments Library
//!
//! A client library for managing compute environments on a Domino Data Lab
//! deployment: environment definitions, their revisions (Dockerfile, setup and
//! run scripts, build variables), and build status.
//!
//! ## Overview
//!
//! An *environment* is a named, versioned container-image build definition on
//! the Domino platform. Each *revision* of an environment captures one build
//! configuration: the base image, extra Dockerfile instructions, pre/post
//! setup scripts, pre/post run scripts, and build-time environment variables.
//!
//! This library wraps the platform's REST API for those resources. The two
//! non-trivial pieces are:
//!
//! - **Revision archive parsing**: the platform delivers a revision's sources
//!   as a tar archive; [`revision::archive`] decodes it into a typed
//!   [`RevisionDetails`](revision::RevisionDetails) record.
//! - **Form payload building**: revision and environment creation go through
//!   a legacy HTML-form-backed endpoint; [`revision::payload`] flattens a
//!   structured spec into the ordered `application/x-www-form-urlencoded`
//!   key/value pairs that endpoint expects.
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client, route table, API models, and the error taxonomy
//! - [`auth`]: Authentication credentials (API key header, bearer token file)
//! - [`config`]: Client configuration resolved from parameters or environment
//! - [`revision`]: Revision specs, archive parsing, and form payload building
//! - [`manager`]: The [`EnvironmentManager`](manager::EnvironmentManager)
//!   orchestrating create/read/archive operations
//! - [`util`]: Version compatibility helpers
//!
//! ## Example
//!
//! ```rust,no_run
//! use domino_environments::config::ClientConfig;
//! use domino_environments::manager::EnvironmentManager;
//! use domino_environments::revision::{ImageType, RevisionSpec};
//!
//! # async fn example() -> Result<(), domino_environments::api::ApiError> {
//! let config = ClientConfig::new()
//!     .with_host("https://domino.example.com")
//!     .with_api_key("my-api-key");
//!
//! let manager = EnvironmentManager::connect(config).await?;
//! let defaults = manager.fetch_defaults().await?;
//!
//! let environment = manager.get_environment("60a4227aca6bcb42784aea9f").await?;
//! let spec = RevisionSpec {
//!     image_type: ImageType::Environment,
//!     dockerfile_instructions: "RUN pip install pandas".into(),
//!     ..Default::default()
//! };
//! manager.create_revision(&environment, &spec, &defaults).await?;
//! # Ok(())
//! # }
//! ```

/// API client implementation for the Domino platform.
///
/// Provides the HTTP client facade, the route table for environment and
/// revision endpoints, serde models for API responses, and the unified
/// [`ApiError`](api::ApiError) taxonomy.
pub mod api;

/// Authentication credential handling.
///
/// Supports the two credential forms the platform accepts: a static API key
/// sent as the `X-Domino-Api-Key` header, and a bearer token re-read from a
/// token file on every request.
pub mod auth;

/// Client configuration.
///
/// Resolves the deployment host, API key, and token file path from explicit
/// parameters or named environment variables, with explicit values taking
/// precedence.
pub mod config;

/// Revision specifications, archive parsing, and form payload building.
///
/// Contains the [`RevisionSpec`](revision::RevisionSpec) and
/// [`EnvironmentSpec`](revision::EnvironmentSpec) types, the tar archive
/// parser producing [`RevisionDetails`](revision::RevisionDetails), and the
/// form payload builder/decoder for the legacy creation endpoints.
pub mod revision;

/// Environment and revision orchestration.
///
/// The [`EnvironmentManager`](manager::EnvironmentManager) ties the client,
/// routes, archive parser, and payload builder together into the create/read/
/// archive operations exposed to callers.
pub mod manager;

/// Utility helpers.
///
/// Version parsing and compatibility checking against
/// [`MINIMUM_SUPPORTED_VERSION`].
pub mod util;

/// Re-export of the environment manager for convenient access.
pub use manager::EnvironmentManager;

/// Re-export of the client configuration struct.
pub use config::ClientConfig;

/// Library version constant.
///
/// Automatically derived from Cargo.toml at compile time using the
/// `CARGO_PKG_VERSION` environment variable.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The oldest Domino deployment version this library supports.
///
/// Checked once at [`EnvironmentManager::connect`](manager::EnvironmentManager::connect)
/// against the deployment's reported version; older deployments are rejected
/// with [`ApiError::IncompatibleVersion`](api::ApiError::IncompatibleVersion).
pub const MINIMUM_SUPPORTED_VERSION: &str = "4.1.0";
