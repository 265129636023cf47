//
//  domino-environments
//  manager/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Environment Manager Module
//!
//! Thin orchestration over the client, route table, archive parser, and
//! payload builder. Every operation is a single request/response round trip:
//! no retries, no idempotency keys, no pagination beyond the single bounded
//! page fetched for build-status lookup.
//!
//! ## Defaults are caller-held
//!
//! Creating an environment or revision needs two values from the deployment's
//! default environment: its selected revision id and its base image. Rather
//! than caching those inside the manager where staleness would be invisible,
//! [`EnvironmentManager::fetch_defaults`] returns an explicit
//! [`EnvironmentDefaults`] value the caller owns and passes into
//! [`create_environment`](EnvironmentManager::create_environment) and
//! [`create_revision`](EnvironmentManager::create_revision). Re-fetch it
//! whenever fresher data is wanted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use domino_environments::config::ClientConfig;
//! use domino_environments::manager::EnvironmentManager;
//! use domino_environments::revision::RevisionSpec;
//!
//! # async fn example() -> Result<(), domino_environments::api::ApiError> {
//! let manager = EnvironmentManager::connect(ClientConfig::new()).await?;
//! let defaults = manager.fetch_defaults().await?;
//! let environment = manager.get_environment("60a4227aca6bcb42784aea9f").await?;
//! let spec = RevisionSpec {
//!     dockerfile_instructions: "RUN pip install pandas".into(),
//!     ..Default::default()
//! };
//! manager.create_revision(&environment, &spec, &defaults).await?;
//! # Ok(())
//! # }
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{
    ApiError, BuildPage, DeploymentVersion, DominoClient, Environment, EnvironmentBuild,
    EnvironmentRoutes, FormResponse,
};
use crate::config::ClientConfig;
use crate::revision::{
    environment_form_payload, parse_revision_archive, revision_form_payload, EnvironmentSpec,
    RevisionDetails, RevisionSpec,
};
use crate::util::is_version_compatible;

/// Builds fetched per status lookup; one bounded page, never paginated.
const BUILD_PAGE_LIMIT: u32 = 20;

/// Extracts one log line per `<td class="line">` cell of the build log page.
///
/// The pattern must stay exactly as-is for compatibility with the log
/// server's markup.
static LOG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<td class="line"[^>]*>(.*?)</td>"#).unwrap());

/// Snapshot of the deployment's default environment, held by the caller.
///
/// Produced by [`EnvironmentManager::fetch_defaults`] and consumed by the
/// creation operations to fill the `base.baseEnvironmentRevisionId` and
/// `base.defaultEnvironmentImage` fields when a spec leaves them unset.
/// Holding it as a value makes staleness explicit: it is exactly as fresh as
/// the fetch that produced it.
#[derive(Debug, Clone)]
pub struct EnvironmentDefaults {
    /// The platform-wide default environment.
    pub environment: Environment,

    /// Parsed contents of the default environment's selected revision.
    pub details: RevisionDetails,
}

impl EnvironmentDefaults {
    /// The default environment's selected revision id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] if the default environment
    /// has no selected revision.
    pub fn base_revision_id(&self) -> Result<&str, ApiError> {
        self.environment
            .active_revision()
            .map(|revision| revision.id.as_str())
            .ok_or_else(|| {
                ApiError::UnexpectedResponse(
                    "default environment has no selected revision".to_string(),
                )
            })
    }

    /// The default environment's base image reference.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] if the default environment's
    /// revision archive carried no Dockerfile.
    pub fn base_image(&self) -> Result<&str, ApiError> {
        self.details
            .dockerfile
            .as_ref()
            .map(|dockerfile| dockerfile.base_image.as_str())
            .ok_or_else(|| {
                ApiError::UnexpectedResponse(
                    "default environment revision has no Dockerfile".to_string(),
                )
            })
    }
}

/// Orchestrates environment and revision operations against one deployment.
///
/// Constructed with [`connect`](Self::connect), which resolves configuration,
/// fetches the deployment version, and verifies compatibility before any
/// other request is made.
pub struct EnvironmentManager {
    client: DominoClient,
    routes: EnvironmentRoutes,
    deployment_version: String,
}

impl EnvironmentManager {
    /// Connects to a deployment and verifies version compatibility.
    ///
    /// # Parameters
    ///
    /// * `config` - Connection settings; unset fields fall back to their
    ///   environment variables.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Config`] for missing host or credentials.
    /// - [`ApiError::IncompatibleVersion`] when the deployment is older than
    ///   [`MINIMUM_SUPPORTED_VERSION`](crate::MINIMUM_SUPPORTED_VERSION).
    /// - Any transport or HTTP error from the version fetch.
    pub async fn connect(config: ClientConfig) -> Result<Self, ApiError> {
        let resolved = config.resolve()?;
        let client = DominoClient::new(resolved.auth)?;
        let routes = EnvironmentRoutes::new(resolved.host);

        let version: DeploymentVersion = client.get_json(&routes.deployment_version()).await?;
        tracing::info!(
            host = %routes.host(),
            version = %version.version,
            "connected to Domino deployment"
        );

        if !is_version_compatible(&version.version) {
            return Err(ApiError::IncompatibleVersion {
                deployed: version.version,
                library: crate::VERSION.to_string(),
                minimum: crate::MINIMUM_SUPPORTED_VERSION.to_string(),
            });
        }

        Ok(Self {
            client,
            routes,
            deployment_version: version.version,
        })
    }

    /// The deployment version fetched at connect time.
    pub fn deployment_version(&self) -> &str {
        &self.deployment_version
    }

    /// Fetches the platform-wide default environment.
    pub async fn get_default_environment(&self) -> Result<Environment, ApiError> {
        self.client
            .get_json(&self.routes.environment_default_get())
            .await
    }

    /// Fetches the default environment and its revision contents.
    ///
    /// The returned [`EnvironmentDefaults`] is a caller-held snapshot; pass
    /// it into the creation operations and re-fetch when staleness matters.
    pub async fn fetch_defaults(&self) -> Result<EnvironmentDefaults, ApiError> {
        let environment = self.get_default_environment().await?;
        let details = self.get_revision_details(&environment, None).await?;
        Ok(EnvironmentDefaults {
            environment,
            details,
        })
    }

    /// Fetches a single environment by id.
    pub async fn get_environment(&self, environment_id: &str) -> Result<Environment, ApiError> {
        self.client
            .get_json(&self.routes.environment_get(environment_id))
            .await
    }

    /// Archives an environment.
    pub async fn archive_environment(&self, environment: &Environment) -> Result<(), ApiError> {
        self.client
            .post_empty(&self.routes.environment_archive(&environment.id))
            .await
    }

    /// Creates a new environment.
    ///
    /// Fills `base.baseEnvironmentRevisionId` and
    /// `base.defaultEnvironmentImage` from `defaults` when the spec leaves
    /// them unset, then submits the form payload.
    ///
    /// # Returns
    ///
    /// The [`FormResponse`] of the legacy form endpoint; the created
    /// environment's page is the final URL after redirects.
    pub async fn create_environment(
        &self,
        spec: &EnvironmentSpec,
        defaults: &EnvironmentDefaults,
    ) -> Result<FormResponse, ApiError> {
        let mut spec = spec.clone();
        if spec.base_environment_revision_id.is_none() {
            spec.base_environment_revision_id = Some(defaults.base_revision_id()?.to_string());
        }
        if spec.base_default_environment_image.is_none() {
            spec.base_default_environment_image = Some(defaults.base_image()?.to_string());
        }

        let payload = environment_form_payload(&spec);
        self.client
            .post_form(&self.routes.environment_create(), &payload)
            .await
    }

    /// Creates a new revision of an environment.
    ///
    /// Fills the `base.*` identifiers from `defaults` when the spec leaves
    /// them unset, then submits the form payload.
    pub async fn create_revision(
        &self,
        environment: &Environment,
        spec: &RevisionSpec,
        defaults: &EnvironmentDefaults,
    ) -> Result<FormResponse, ApiError> {
        let mut spec = spec.clone();
        if spec.base_environment_revision_id.is_none() {
            spec.base_environment_revision_id = Some(defaults.base_revision_id()?.to_string());
        }
        if spec.base_default_environment_image.is_none() {
            spec.base_default_environment_image = Some(defaults.base_image()?.to_string());
        }

        let payload = revision_form_payload(&spec);
        self.client
            .post_form(&self.routes.revision_create(&environment.id), &payload)
            .await
    }

    /// Downloads and parses a revision's sources.
    ///
    /// # Parameters
    ///
    /// * `environment` - The environment owning the revision.
    /// * `revision_id` - The revision to fetch; defaults to the environment's
    ///   selected revision.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UnexpectedResponse`] when no revision id is given and
    ///   the environment has no selected revision.
    /// - [`ApiError::MalformedArchive`] when the downloaded archive fails to
    ///   parse.
    pub async fn get_revision_details(
        &self,
        environment: &Environment,
        revision_id: Option<&str>,
    ) -> Result<RevisionDetails, ApiError> {
        let revision_id = match revision_id {
            Some(id) => id,
            None => {
                environment
                    .active_revision()
                    .map(|revision| revision.id.as_str())
                    .ok_or_else(|| {
                        ApiError::UnexpectedResponse(format!(
                            "environment {} has no selected revision",
                            environment.id
                        ))
                    })?
            }
        };

        let url = self.routes.revision_download(&environment.id, revision_id);
        let bytes = self.client.get_bytes(&url).await?;
        parse_revision_archive(&bytes)
    }

    /// Looks up the build status of a revision.
    ///
    /// Fetches one bounded page of the environment's build history and
    /// returns the entry for the given revision, or `None` if the page does
    /// not contain one.
    pub async fn get_build_status(
        &self,
        environment_id: &str,
        revision_id: &str,
    ) -> Result<Option<EnvironmentBuild>, ApiError> {
        let url = self
            .routes
            .environment_builds(environment_id, BUILD_PAGE_LIMIT);
        let page: BuildPage = self.client.get_json(&url).await?;
        Ok(page
            .builds
            .into_iter()
            .find(|build| build.revision_id.as_deref() == Some(revision_id)))
    }

    /// Fetches a revision's build log lines.
    ///
    /// The log server returns an HTML page; one line of log text is extracted
    /// per `<td class="line">` cell. Acknowledged scraping, not parsing: any
    /// markup change on the server side breaks this.
    pub async fn get_build_logs(
        &self,
        environment_id: &str,
        revision_id: &str,
    ) -> Result<Vec<String>, ApiError> {
        let url = self.routes.build_logs(environment_id, revision_id);
        let html = self.client.get_text(&url).await?;
        Ok(extract_log_lines(&html))
    }
}

/// Extracts log line text from the build log page markup.
fn extract_log_lines(html: &str) -> Vec<String> {
    LOG_LINE
        .captures_iter(html)
        .map(|captures| captures[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_log_lines() {
        let html = concat!(
            r#"<table><tr><td class="stamp">10:01</td>"#,
            r#"<td class="line">Step 1/4 : FROM ubuntu:18.04</td></tr>"#,
            r#"<tr><td class="stamp">10:02</td>"#,
            r#"<td class="line" id="l2">Successfully built 4a5a6b7c</td></tr></table>"#,
        );
        assert_eq!(
            extract_log_lines(html),
            vec![
                "Step 1/4 : FROM ubuntu:18.04".to_string(),
                "Successfully built 4a5a6b7c".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_log_lines_empty_page() {
        assert!(extract_log_lines("<html><body>no builds</body></html>").is_empty());
    }
}
