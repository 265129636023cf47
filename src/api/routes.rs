//
//  domino-environments
//  api/routes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Route table for environment and revision endpoints.
//!
//! The platform spreads these resources across three URL generations: the
//! modern `/v4` JSON API, a `/v1` download endpoint, and the legacy unversioned
//! form endpoints used for creation. Keeping every URL in one place makes that
//! split visible and testable.

/// Builds endpoint URLs for a single deployment host.
///
/// The host is the normalized `scheme://host[:port]` base produced by
/// [`ClientConfig::resolve`](crate::config::ClientConfig::resolve).
///
/// # Example
///
/// ```rust
/// use domino_environments::api::EnvironmentRoutes;
///
/// let routes = EnvironmentRoutes::new("https://domino.example.com".to_string());
/// assert_eq!(
///     routes.environment_get("abc123"),
///     "https://domino.example.com/v4/environments/abc123"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentRoutes {
    host: String,
}

impl EnvironmentRoutes {
    /// Creates a route table for the given host.
    pub fn new(host: String) -> Self {
        Self { host }
    }

    /// The normalized host this table builds URLs for.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `GET` endpoint reporting the deployment version.
    pub fn deployment_version(&self) -> String {
        format!("{}/version", self.host)
    }

    fn environments_v4(&self) -> String {
        format!("{}/v4/environments", self.host)
    }

    /// `GET` endpoint for the platform-wide default environment.
    pub fn environment_default_get(&self) -> String {
        format!("{}/defaultEnvironment", self.environments_v4())
    }

    /// `POST` form endpoint creating a new environment.
    ///
    /// Legacy unversioned endpoint; expects `application/x-www-form-urlencoded`.
    pub fn environment_create(&self) -> String {
        format!("{}/environments", self.host)
    }

    /// `GET` endpoint for a single environment.
    pub fn environment_get(&self, environment_id: &str) -> String {
        format!("{}/{environment_id}", self.environments_v4())
    }

    /// `POST` endpoint archiving an environment.
    pub fn environment_archive(&self, environment_id: &str) -> String {
        format!("{}/{environment_id}/archive", self.environments_v4())
    }

    /// `GET` endpoint listing an environment's builds (single bounded page).
    pub fn environment_builds(&self, environment_id: &str, limit: u32) -> String {
        format!(
            "{}/{environment_id}/builds?limit={limit}",
            self.environments_v4()
        )
    }

    /// `POST` form endpoint creating a new revision.
    ///
    /// Legacy unversioned endpoint; expects `application/x-www-form-urlencoded`.
    pub fn revision_create(&self, environment_id: &str) -> String {
        format!("{}/environments/{environment_id}/revisions", self.host)
    }

    /// `GET` endpoint delivering a revision's sources as a tar archive.
    pub fn revision_download(&self, environment_id: &str, revision_id: &str) -> String {
        format!(
            "{}/v1/environments/{environment_id}/revisions/{revision_id}/dockerImageSourceProjectWeb",
            self.host
        )
    }

    /// `GET` endpoint returning a revision's build log page (HTML).
    pub fn build_logs(&self, environment_id: &str, revision_id: &str) -> String {
        format!(
            "{}/environments/{environment_id}/revisions/{revision_id}/logs",
            self.host
        )
    }
}
