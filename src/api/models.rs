//
//  domino-environments
//  api/models.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Serde models for Domino API responses.
//!
//! Field names follow the platform's camelCase JSON; optional fields use
//! `#[serde(default)]` so older deployments that omit them still deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, versioned container-image build definition on the platform.
///
/// # Example
///
/// ```rust
/// use domino_environments::api::Environment;
///
/// let json = r#"{
///     "id": "60a4227aca6bcb42784aea9f",
///     "name": "Base Python",
///     "visibility": "Global",
///     "archived": false
/// }"#;
/// let environment: Environment = serde_json::from_str(json).unwrap();
/// assert_eq!(environment.name, "Base Python");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Unique identifier of the environment.
    pub id: String,

    /// Human-readable environment name.
    pub name: String,

    /// Visibility of the environment: `Global`, `Organization`, or `Private`.
    #[serde(default)]
    pub visibility: Option<String>,

    /// Whether the environment has been archived.
    #[serde(default)]
    pub archived: bool,

    /// The owning user or organization.
    #[serde(default)]
    pub owner: Option<EnvironmentOwner>,

    /// The most recently created revision.
    #[serde(default)]
    pub latest_revision: Option<RevisionRef>,

    /// The revision currently selected for new executions.
    #[serde(default)]
    pub selected_revision: Option<RevisionRef>,

    /// Compute cluster types this environment supports.
    #[serde(default)]
    pub supported_clusters: Vec<String>,
}

impl Environment {
    /// The revision currently active for this environment.
    ///
    /// Alias for [`selected_revision`](Self::selected_revision); the platform
    /// calls the active revision "selected" in its JSON.
    pub fn active_revision(&self) -> Option<&RevisionRef> {
        self.selected_revision.as_ref()
    }
}

/// The owner of an environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentOwner {
    /// Unique identifier of the owning user or organization.
    pub id: String,

    /// Username of the owner, when the owner is a user.
    #[serde(default)]
    pub username: Option<String>,

    /// Owner kind reported by the platform (e.g., `Individual`).
    #[serde(default)]
    pub owner_type: Option<String>,
}

/// A lightweight reference to one revision of an environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRef {
    /// Unique identifier of the revision.
    pub id: String,

    /// Sequential revision number within the environment.
    #[serde(default)]
    pub number: Option<u64>,

    /// Build status of the revision (e.g., `Succeeded`, `Failed`).
    #[serde(default)]
    pub status: Option<String>,

    /// Web URL of the revision.
    #[serde(default)]
    pub url: Option<String>,

    /// Workspace tools available in this revision.
    #[serde(default)]
    pub available_tools: Vec<WorkspaceTool>,
}

/// A workspace tool (IDE) definition carried by a revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTool {
    /// Unique identifier of the tool.
    pub id: String,

    /// Machine name of the tool (e.g., `jupyter`).
    pub name: String,

    /// Display title of the tool (e.g., `Jupyter (Python, R, Julia)`).
    #[serde(default)]
    pub title: Option<String>,

    /// URL of the tool's icon.
    #[serde(default)]
    pub icon_url: Option<String>,

    /// Command lines used to start the tool.
    #[serde(default)]
    pub start: Vec<String>,

    /// Proxy configuration for routing into the tool, left untyped.
    #[serde(default)]
    pub proxy_config: serde_json::Value,

    /// File extensions the tool claims to open.
    #[serde(default)]
    pub supported_file_extensions: Vec<String>,
}

/// Response body of the `GET /version` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentVersion {
    /// The deployment's version string (e.g., `"5.2.0"`).
    pub version: String,
}

/// One page of an environment's build history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPage {
    /// The builds on this page, newest first.
    #[serde(default)]
    pub builds: Vec<EnvironmentBuild>,
}

/// Status record for one image build of a revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentBuild {
    /// Unique identifier of the build.
    pub id: String,

    /// The revision this build produced.
    #[serde(default)]
    pub revision_id: Option<String>,

    /// Build status (e.g., `Queued`, `Building`, `Succeeded`, `Failed`).
    pub status: String,

    /// When the build was created.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    /// When the build started executing.
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,

    /// When the build finished.
    #[serde(default)]
    pub completed: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_deserializes_with_revisions() {
        let json = r#"{
            "id": "e1",
            "name": "Base",
            "visibility": "Global",
            "archived": false,
            "owner": {"id": "u1", "username": "alice", "ownerType": "Individual"},
            "latestRevision": {"id": "r2", "number": 2, "status": "Building"},
            "selectedRevision": {"id": "r1", "number": 1, "status": "Succeeded",
                "availableTools": [{"id": "t1", "name": "jupyter", "title": "Jupyter",
                    "start": ["/opt/start-jupyter"], "supportedFileExtensions": [".ipynb"]}]},
            "supportedClusters": ["Spark"]
        }"#;
        let environment: Environment = serde_json::from_str(json).unwrap();
        assert_eq!(environment.active_revision().unwrap().id, "r1");
        assert_eq!(environment.latest_revision.as_ref().unwrap().id, "r2");
        assert_eq!(
            environment.selected_revision.unwrap().available_tools[0].name,
            "jupyter"
        );
        assert_eq!(environment.supported_clusters, vec!["Spark"]);
    }

    #[test]
    fn test_environment_tolerates_missing_optionals() {
        let json = r#"{"id": "e1", "name": "Minimal"}"#;
        let environment: Environment = serde_json::from_str(json).unwrap();
        assert!(!environment.archived);
        assert!(environment.active_revision().is_none());
        assert!(environment.supported_clusters.is_empty());
    }

    #[test]
    fn test_build_page_deserializes() {
        let json = r#"{"builds": [
            {"id": "b1", "revisionId": "r1", "status": "Succeeded",
             "created": "2026-08-01T10:00:00Z", "completed": "2026-08-01T10:05:00Z"}
        ]}"#;
        let page: BuildPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.builds.len(), 1);
        assert_eq!(page.builds[0].revision_id.as_deref(), Some("r1"));
    }
}
