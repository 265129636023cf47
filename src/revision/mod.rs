//
//  domino-environments
//  revision/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Revision Module
//!
//! The structured configuration types for environments and revisions, plus
//! the two transformations around them:
//!
//! - [`archive`]: parses a downloaded revision tar archive into
//!   [`RevisionDetails`]
//! - [`payload`]: flattens a [`RevisionSpec`] or [`EnvironmentSpec`] into the
//!   ordered form-encoded pairs the legacy creation endpoints expect
//!
//! Multi-line fields (Dockerfile instructions, scripts) accept either a single
//! string or a sequence of lines through the [`Multiline`] sum type; one
//! normalization turns both into the newline-joined wire form.

pub mod archive;
pub mod payload;

pub use archive::{parse_revision_archive, DockerfileDetails, RevisionDetails, RevisionMember};
pub use payload::{
    decode_revision_form_payload, environment_form_payload, revision_form_payload,
};

/// The image source kind for an environment or revision.
///
/// # Variants
///
/// * `CustomImage` - Built from an arbitrary base docker image.
/// * `DefaultImage` - Built from the deployment's default environment image.
/// * `Environment` - Built on top of another environment's revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageType {
    /// Built from an arbitrary base docker image.
    CustomImage,
    /// Built from the deployment's default environment image.
    #[default]
    DefaultImage,
    /// Built on top of another environment's revision.
    Environment,
}

impl ImageType {
    /// The wire value the form endpoints expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomImage => "CustomImage",
            Self::DefaultImage => "DefaultImage",
            Self::Environment => "Environment",
        }
    }

    /// Parses a wire value back into an [`ImageType`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CustomImage" => Some(Self::CustomImage),
            "DefaultImage" => Some(Self::DefaultImage),
            "Environment" => Some(Self::Environment),
            _ => None,
        }
    }
}

/// Who can see and use an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Visible to every user of the deployment.
    Global,
    /// Visible to members of the owning organization.
    Organization,
    /// Visible only to the owner.
    Private,
}

impl Visibility {
    /// The wire value the form endpoints expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Organization => "Organization",
            Self::Private => "Private",
        }
    }
}

/// Compute cluster type an environment can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterType {
    /// Apache Spark clusters.
    Spark,
}

impl ClusterType {
    /// The wire value the form endpoints expect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spark => "Spark",
        }
    }

    /// Parses a wire value back into a [`ClusterType`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Spark" => Some(Self::Spark),
            _ => None,
        }
    }
}

/// A multi-line field value: either pre-joined text or a sequence of lines.
///
/// The form endpoints take every multi-line field as one newline-joined
/// string; callers often find a `Vec` of lines more convenient to build.
/// Both shapes normalize to the same wire form, so supplying
/// `Lines(vec!["a", "b"])` and `Text("a\nb")` is equivalent.
///
/// # Example
///
/// ```rust
/// use domino_environments::revision::Multiline;
///
/// let from_text: Multiline = "RUN foo\nRUN bar".into();
/// let from_lines = Multiline::Lines(vec!["RUN foo".to_string(), "RUN bar".to_string()]);
/// assert_eq!(from_text.normalize(), from_lines.normalize());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Multiline {
    /// A single, possibly multi-line, string.
    Text(String),
    /// An ordered sequence of lines, joined with `\n` on the wire.
    Lines(Vec<String>),
}

impl Multiline {
    /// Normalizes to the newline-joined wire form.
    pub fn normalize(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines(lines) => lines.join("\n"),
        }
    }

    /// Whether the value carries no content.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Lines(lines) => lines.is_empty(),
        }
    }
}

impl Default for Multiline {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Multiline {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Multiline {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for Multiline {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl From<Vec<&str>> for Multiline {
    fn from(lines: Vec<&str>) -> Self {
        Self::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

/// An ordered collection of build environment variables.
///
/// Semantically a name/value mapping, but insertion order is preserved: each
/// pair is serialized into an indexed field name
/// (`buildEnvironmentVariables[i].name` / `.value`) and the platform parses
/// those positionally.
///
/// # Example
///
/// ```rust
/// use domino_environments::revision::EnvironmentVariableSet;
///
/// let mut variables = EnvironmentVariableSet::new();
/// variables.push("HTTP_PROXY", "http://proxy:3128");
/// variables.push("PIP_INDEX_URL", "https://mirror.example.com/simple");
/// assert_eq!(variables.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentVariableSet {
    pairs: Vec<(String, String)>,
}

impl EnvironmentVariableSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a variable, keeping insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Number of variables in the set.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.pairs.iter()
    }
}

impl From<Vec<(String, String)>> for EnvironmentVariableSet {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl FromIterator<(String, String)> for EnvironmentVariableSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// A revision's build configuration, as submitted to the creation endpoint.
///
/// The two `base_*` identifiers may be left `None`; the manager fills them
/// from the caller-held [`EnvironmentDefaults`](crate::manager::EnvironmentDefaults)
/// before building the payload.
///
/// # Example
///
/// ```rust
/// use domino_environments::revision::{ImageType, Multiline, RevisionSpec};
///
/// let spec = RevisionSpec {
///     image_type: ImageType::CustomImage,
///     docker_image: "ubuntu:22.04".to_string(),
///     dockerfile_instructions: Multiline::Lines(vec![
///         "RUN apt-get update".to_string(),
///         "RUN apt-get install -y curl".to_string(),
///     ]),
///     summary: "Add curl".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevisionSpec {
    /// The image source kind.
    pub image_type: ImageType,

    /// Base docker image reference, for [`ImageType::CustomImage`].
    pub docker_image: String,

    /// Revision of the environment to build on; filled from defaults if unset.
    pub base_environment_revision_id: Option<String>,

    /// Default environment image to build on; filled from defaults if unset.
    pub base_default_environment_image: Option<String>,

    /// Extra Dockerfile instructions appended to the generated Dockerfile.
    pub dockerfile_instructions: Multiline,

    /// Workspace tool properties block (the form's `properties` field).
    pub workspace_tools: String,

    /// Script run before the execution starts.
    pub pre_run_script: Multiline,

    /// Script run after the execution finishes.
    pub post_run_script: Multiline,

    /// Script run before environment setup.
    pub pre_setup_script: Multiline,

    /// Script run after environment setup.
    pub post_setup_script: Multiline,

    /// Build environment variables, order preserved on the wire.
    pub environment_variables: EnvironmentVariableSet,

    /// Extra arguments passed to `docker build`.
    pub docker_arguments: String,

    /// Human-readable summary of the revision.
    pub summary: String,

    /// Skip the image build cache (`noCache=true` on the wire when set).
    pub force_rebuild: bool,

    /// Route the build through the deployment VPN (`shouldUseVPN=on` when set).
    pub should_use_vpn: bool,

    /// Cluster type this revision supports (`clusterTypes[]` on the wire).
    pub cluster_types: Option<ClusterType>,
}

/// A new environment's configuration, as submitted to the creation endpoint.
#[derive(Debug, Clone)]
pub struct EnvironmentSpec {
    /// Environment name.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Who can see and use the environment.
    pub visibility: Visibility,

    /// The image source kind.
    pub image_type: ImageType,

    /// Base docker image reference, for [`ImageType::CustomImage`].
    pub docker_image: String,

    /// Revision of the environment to build on; filled from defaults if unset.
    pub base_environment_revision_id: Option<String>,

    /// Default environment image to build on; filled from defaults if unset.
    pub base_default_environment_image: Option<String>,

    /// Owning user, when creating on behalf of a user.
    pub user_owner_id: Option<String>,

    /// Owning organization; required when visibility is
    /// [`Visibility::Organization`].
    pub organization_owner_id: Option<String>,

    /// Cluster type the environment supports.
    pub cluster_types: Option<ClusterType>,
}

impl EnvironmentSpec {
    /// Creates a spec with the required fields; everything else defaults off.
    pub fn new(name: impl Into<String>, image_type: ImageType, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            visibility,
            image_type,
            docker_image: String::new(),
            base_environment_revision_id: None,
            base_default_environment_image: None,
            user_owner_id: None,
            organization_owner_id: None,
            cluster_types: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_normalization_is_equivalent() {
        let text = Multiline::Text("echo a\necho b".to_string());
        let lines: Multiline = vec!["echo a", "echo b"].into();
        assert_eq!(text.normalize(), lines.normalize());
    }

    #[test]
    fn test_multiline_default_is_empty() {
        assert!(Multiline::default().is_empty());
        assert_eq!(Multiline::default().normalize(), "");
    }

    #[test]
    fn test_environment_variables_preserve_order() {
        let mut variables = EnvironmentVariableSet::new();
        variables.push("Z", "1");
        variables.push("A", "2");
        let names: Vec<&str> = variables.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }

    #[test]
    fn test_image_type_round_trips() {
        for image_type in [
            ImageType::CustomImage,
            ImageType::DefaultImage,
            ImageType::Environment,
        ] {
            assert_eq!(ImageType::parse(image_type.as_str()), Some(image_type));
        }
        assert_eq!(ImageType::parse("SomethingElse"), None);
    }
}
