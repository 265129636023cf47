//
//  domino-environments
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # API Module
//!
//! The HTTP-facing layer of the library:
//!
//! - [`DominoClient`]: the client facade issuing authenticated requests
//! - [`EnvironmentRoutes`]: the endpoint URL table
//! - [`models`]: serde models for JSON responses
//! - [`ApiError`]: the unified error taxonomy every operation raises through

mod client;
mod error;
mod routes;

pub mod models;

pub use client::{DominoClient, FormResponse};
pub use error::ApiError;
pub use models::{
    BuildPage, DeploymentVersion, Environment, EnvironmentBuild, EnvironmentOwner, RevisionRef,
    WorkspaceTool,
};
pub use routes::EnvironmentRoutes;
