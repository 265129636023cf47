//
//  domino-environments
//  revision/payload.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Form payload building for the legacy creation endpoints.
//!
//! Environment and revision creation go through HTML-form-backed endpoints
//! that take `application/x-www-form-urlencoded` bodies, so the structured
//! specs are flattened into ordered string key/value pairs:
//!
//! - scalar fields map to fixed keys (`base.imageType`, `summary`, ...),
//! - multi-line fields are normalized to newline-joined strings first,
//! - the environment variable at position `i` contributes
//!   `buildEnvironmentVariables[i].name` and `buildEnvironmentVariables[i].value`,
//!   in input order (the form processor parses these positionally),
//! - boolean flags appear only when set, with the sentinel values the form
//!   processor expects (`noCache=true`, `shouldUseVPN=on`); omission is "off",
//! - the cluster type goes under the repeatable key `clusterTypes[]`.
//!
//! [`decode_revision_form_payload`] reverses the flattening for a revision
//! payload; multi-line fields come back in their normalized string form.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::ApiError;
use crate::revision::{
    ClusterType, EnvironmentSpec, ImageType, Multiline, RevisionSpec, Visibility,
};

/// Matches the indexed environment variable keys,
/// e.g. `buildEnvironmentVariables[3].name`.
static ENV_VAR_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^buildEnvironmentVariables\[(\d+)\]\.(name|value)$").unwrap()
});

/// Flattens a [`RevisionSpec`] into the ordered form pairs for
/// `POST /environments/{id}/revisions`.
///
/// The `base.*` identifier fields are emitted as empty strings when unset;
/// the manager fills them from
/// [`EnvironmentDefaults`](crate::manager::EnvironmentDefaults) before this
/// point.
///
/// # Example
///
/// ```rust
/// use domino_environments::revision::{revision_form_payload, RevisionSpec};
///
/// let mut spec = RevisionSpec::default();
/// spec.environment_variables.push("HTTP_PROXY", "http://proxy:3128");
/// let payload = revision_form_payload(&spec);
/// assert!(payload.contains(&(
///     "buildEnvironmentVariables[0].name".to_string(),
///     "HTTP_PROXY".to_string(),
/// )));
/// ```
pub fn revision_form_payload(spec: &RevisionSpec) -> Vec<(String, String)> {
    let mut payload: Vec<(String, String)> = vec![
        ("base.imageType".into(), spec.image_type.as_str().into()),
        ("base.dockerImage".into(), spec.docker_image.clone()),
        (
            "base.baseEnvironmentRevisionId".into(),
            spec.base_environment_revision_id.clone().unwrap_or_default(),
        ),
        (
            "base.defaultEnvironmentImage".into(),
            spec.base_default_environment_image
                .clone()
                .unwrap_or_default(),
        ),
        (
            "dockerfileInstructions".into(),
            spec.dockerfile_instructions.normalize(),
        ),
        ("properties".into(), spec.workspace_tools.clone()),
        ("preRunScript".into(), spec.pre_run_script.normalize()),
        ("postRunScript".into(), spec.post_run_script.normalize()),
        ("preSetupScript".into(), spec.pre_setup_script.normalize()),
        ("postSetupScript".into(), spec.post_setup_script.normalize()),
        ("dockerArguments".into(), spec.docker_arguments.clone()),
        ("summary".into(), spec.summary.clone()),
    ];

    for (idx, (name, value)) in spec.environment_variables.iter().enumerate() {
        payload.push((format!("buildEnvironmentVariables[{idx}].name"), name.clone()));
        payload.push((
            format!("buildEnvironmentVariables[{idx}].value"),
            value.clone(),
        ));
    }

    if spec.force_rebuild {
        payload.push(("noCache".into(), "true".into()));
    }

    if spec.should_use_vpn {
        payload.push(("shouldUseVPN".into(), "on".into()));
    }

    if let Some(cluster) = spec.cluster_types {
        payload.push(("clusterTypes[]".into(), cluster.as_str().into()));
    }

    payload
}

/// Flattens an [`EnvironmentSpec`] into the ordered form pairs for
/// `POST /environments`.
///
/// `organizationOwnerId` is emitted only for
/// [`Visibility::Organization`](crate::revision::Visibility::Organization);
/// `userOwnerId` and `clusterTypes[]` only when supplied.
pub fn environment_form_payload(spec: &EnvironmentSpec) -> Vec<(String, String)> {
    let mut payload: Vec<(String, String)> = vec![
        ("name".into(), spec.name.clone()),
        ("description".into(), spec.description.clone()),
        ("visibility".into(), spec.visibility.as_str().into()),
        ("base.imageType".into(), spec.image_type.as_str().into()),
        ("base.dockerImage".into(), spec.docker_image.clone()),
        (
            "base.baseEnvironmentRevisionId".into(),
            spec.base_environment_revision_id.clone().unwrap_or_default(),
        ),
        (
            "base.defaultEnvironmentImage".into(),
            spec.base_default_environment_image
                .clone()
                .unwrap_or_default(),
        ),
    ];

    if spec.visibility == Visibility::Organization {
        payload.push((
            "organizationOwnerId".into(),
            spec.organization_owner_id.clone().unwrap_or_default(),
        ));
    }

    if let Some(user_owner_id) = &spec.user_owner_id {
        payload.push(("userOwnerId".into(), user_owner_id.clone()));
    }

    if let Some(cluster) = spec.cluster_types {
        payload.push(("clusterTypes[]".into(), cluster.as_str().into()));
    }

    payload
}

/// Reconstructs a [`RevisionSpec`] from a revision form payload.
///
/// The inverse of [`revision_form_payload`], modulo intentional
/// normalization: multi-line fields come back as [`Multiline::Text`] in their
/// newline-joined form, and empty `base.*` identifiers come back as `None`.
/// Keys outside the revision payload vocabulary are ignored.
///
/// # Errors
///
/// Returns [`ApiError::InvalidPayload`] when an enum-valued field carries an
/// unknown wire value, a flag carries an unexpected sentinel, or an indexed
/// environment variable is missing its name or value.
pub fn decode_revision_form_payload(
    pairs: &[(String, String)],
) -> Result<RevisionSpec, ApiError> {
    let mut spec = RevisionSpec::default();
    // index -> (name, value), filled as keys arrive
    let mut variables: Vec<(usize, Option<String>, Option<String>)> = Vec::new();

    for (key, value) in pairs {
        if let Some(captures) = ENV_VAR_KEY.captures(key) {
            let idx: usize = captures[1]
                .parse()
                .map_err(|_| ApiError::InvalidPayload(format!("bad variable index in {key}")))?;
            let slot = match variables.iter_mut().find(|(i, _, _)| *i == idx) {
                Some(slot) => slot,
                None => {
                    variables.push((idx, None, None));
                    variables.last_mut().unwrap()
                }
            };
            match &captures[2] {
                "name" => slot.1 = Some(value.clone()),
                _ => slot.2 = Some(value.clone()),
            }
            continue;
        }

        match key.as_str() {
            "base.imageType" => {
                spec.image_type = ImageType::parse(value).ok_or_else(|| {
                    ApiError::InvalidPayload(format!("unknown image type {value:?}"))
                })?;
            }
            "base.dockerImage" => spec.docker_image = value.clone(),
            "base.baseEnvironmentRevisionId" => {
                spec.base_environment_revision_id =
                    (!value.is_empty()).then(|| value.clone());
            }
            "base.defaultEnvironmentImage" => {
                spec.base_default_environment_image =
                    (!value.is_empty()).then(|| value.clone());
            }
            "dockerfileInstructions" => {
                spec.dockerfile_instructions = Multiline::Text(value.clone());
            }
            "properties" => spec.workspace_tools = value.clone(),
            "preRunScript" => spec.pre_run_script = Multiline::Text(value.clone()),
            "postRunScript" => spec.post_run_script = Multiline::Text(value.clone()),
            "preSetupScript" => spec.pre_setup_script = Multiline::Text(value.clone()),
            "postSetupScript" => spec.post_setup_script = Multiline::Text(value.clone()),
            "dockerArguments" => spec.docker_arguments = value.clone(),
            "summary" => spec.summary = value.clone(),
            "noCache" => {
                if value != "true" {
                    return Err(ApiError::InvalidPayload(format!(
                        "unexpected noCache value {value:?}"
                    )));
                }
                spec.force_rebuild = true;
            }
            "shouldUseVPN" => {
                if value != "on" {
                    return Err(ApiError::InvalidPayload(format!(
                        "unexpected shouldUseVPN value {value:?}"
                    )));
                }
                spec.should_use_vpn = true;
            }
            "clusterTypes[]" => {
                spec.cluster_types = Some(ClusterType::parse(value).ok_or_else(|| {
                    ApiError::InvalidPayload(format!("unknown cluster type {value:?}"))
                })?);
            }
            _ => {}
        }
    }

    variables.sort_by_key(|(idx, _, _)| *idx);
    for (idx, name, value) in variables {
        let name = name.ok_or_else(|| {
            ApiError::InvalidPayload(format!("variable {idx} is missing its name"))
        })?;
        let value = value.ok_or_else(|| {
            ApiError::InvalidPayload(format!("variable {idx} is missing its value"))
        })?;
        spec.environment_variables.push(name, value);
    }

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(payload: &'a [(String, String)], key: &str) -> Option<&'a str> {
        payload
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_lines_and_text_produce_identical_payloads() {
        let mut from_lines = RevisionSpec::default();
        from_lines.pre_run_script = vec!["echo a", "echo b"].into();
        from_lines.dockerfile_instructions = vec!["RUN foo", "RUN bar"].into();

        let mut from_text = RevisionSpec::default();
        from_text.pre_run_script = "echo a\necho b".into();
        from_text.dockerfile_instructions = "RUN foo\nRUN bar".into();

        assert_eq!(
            revision_form_payload(&from_lines),
            revision_form_payload(&from_text)
        );
    }

    #[test]
    fn test_variables_emit_two_keys_each_in_order() {
        let mut spec = RevisionSpec::default();
        spec.environment_variables.push("A", "1");
        spec.environment_variables.push("B", "2");
        spec.environment_variables.push("C", "3");

        let payload = revision_form_payload(&spec);
        let variable_keys: Vec<&str> = payload
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| k.starts_with("buildEnvironmentVariables"))
            .collect();
        assert_eq!(
            variable_keys,
            vec![
                "buildEnvironmentVariables[0].name",
                "buildEnvironmentVariables[0].value",
                "buildEnvironmentVariables[1].name",
                "buildEnvironmentVariables[1].value",
                "buildEnvironmentVariables[2].name",
                "buildEnvironmentVariables[2].value",
            ]
        );
        assert_eq!(value_of(&payload, "buildEnvironmentVariables[1].name"), Some("B"));
        assert_eq!(value_of(&payload, "buildEnvironmentVariables[1].value"), Some("2"));
    }

    #[test]
    fn test_flags_are_omitted_when_off() {
        let payload = revision_form_payload(&RevisionSpec::default());
        assert!(value_of(&payload, "noCache").is_none());
        assert!(value_of(&payload, "shouldUseVPN").is_none());
        assert!(value_of(&payload, "clusterTypes[]").is_none());
    }

    #[test]
    fn test_flags_use_sentinel_values_when_on() {
        let spec = RevisionSpec {
            force_rebuild: true,
            should_use_vpn: true,
            cluster_types: Some(ClusterType::Spark),
            ..Default::default()
        };
        let payload = revision_form_payload(&spec);
        assert_eq!(value_of(&payload, "noCache"), Some("true"));
        assert_eq!(value_of(&payload, "shouldUseVPN"), Some("on"));
        assert_eq!(value_of(&payload, "clusterTypes[]"), Some("Spark"));
    }

    #[test]
    fn test_revision_payload_round_trips() {
        let mut spec = RevisionSpec {
            image_type: ImageType::CustomImage,
            docker_image: "ubuntu:22.04".to_string(),
            base_environment_revision_id: Some("r1".to_string()),
            base_default_environment_image: Some("dominodatalab/base:2026".to_string()),
            dockerfile_instructions: "RUN apt-get update".into(),
            workspace_tools: "jupyter:\n  title: Jupyter".to_string(),
            pre_run_script: "echo pre".into(),
            post_run_script: "echo post".into(),
            pre_setup_script: "echo setup".into(),
            post_setup_script: "echo done".into(),
            docker_arguments: "--network=host".to_string(),
            summary: "test revision".to_string(),
            force_rebuild: true,
            should_use_vpn: true,
            cluster_types: Some(ClusterType::Spark),
            ..Default::default()
        };
        spec.environment_variables.push("A", "1");
        spec.environment_variables.push("B", "2");

        let decoded = decode_revision_form_payload(&revision_form_payload(&spec)).unwrap();
        assert_eq!(decoded, spec);
    }

    #[test]
    fn test_round_trip_normalizes_lines_to_text() {
        let mut spec = RevisionSpec::default();
        spec.pre_run_script = vec!["echo a", "echo b"].into();

        let decoded = decode_revision_form_payload(&revision_form_payload(&spec)).unwrap();
        assert_eq!(decoded.pre_run_script, Multiline::Text("echo a\necho b".to_string()));
        assert_eq!(
            decoded.pre_run_script.normalize(),
            spec.pre_run_script.normalize()
        );
    }

    #[test]
    fn test_decode_rejects_unknown_image_type() {
        let pairs = vec![("base.imageType".to_string(), "HologramImage".to_string())];
        assert!(matches!(
            decode_revision_form_payload(&pairs),
            Err(ApiError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_decode_rejects_incomplete_variable() {
        let pairs = vec![(
            "buildEnvironmentVariables[0].name".to_string(),
            "A".to_string(),
        )];
        assert!(matches!(
            decode_revision_form_payload(&pairs),
            Err(ApiError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_environment_payload_owner_fields() {
        let mut spec = EnvironmentSpec::new(
            "Team Env",
            ImageType::DefaultImage,
            Visibility::Organization,
        );
        spec.organization_owner_id = Some("org1".to_string());
        spec.user_owner_id = Some("u1".to_string());

        let payload = environment_form_payload(&spec);
        assert_eq!(value_of(&payload, "organizationOwnerId"), Some("org1"));
        assert_eq!(value_of(&payload, "userOwnerId"), Some("u1"));

        let private = EnvironmentSpec::new("Mine", ImageType::DefaultImage, Visibility::Private);
        let payload = environment_form_payload(&private);
        assert!(value_of(&payload, "organizationOwnerId").is_none());
        assert!(value_of(&payload, "userOwnerId").is_none());
    }
}
