//
//  domino-environments
//  revision/archive.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Revision archive parsing.
//!
//! The platform delivers a revision's sources as a tar archive. Five member
//! basenames are recognized; everything else in the archive is skipped
//! without error, and a recognized member that is absent simply stays `None`
//! in the result ("not configured", not an error).
//!
//! The `Dockerfile` member is not the user's raw input: the platform wraps
//! the user's instructions in a fixed-format shell — a `FROM` line plus one
//! generated header line before the user content, and two generated trailer
//! lines after it. Extraction strips exactly those four lines. The wrapper is
//! validated first (a `FROM` prefix on line one, at least four lines total)
//! so a format change on the platform side surfaces as
//! [`ApiError::MalformedArchive`] instead of silently truncated output.

use std::io::{Cursor, Read};

use crate::api::ApiError;

/// Directive prefix identifying the base image line of the Dockerfile member.
const FROM_PREFIX: &str = "FROM ";

/// Generated wrapper lines preceding the user's Dockerfile instructions
/// (the `FROM` line plus one header line).
const DOCKERFILE_HEADER_LINES: usize = 2;

/// Generated wrapper lines following the user's Dockerfile instructions.
const DOCKERFILE_TRAILER_LINES: usize = 2;

/// The archive members the parser recognizes, keyed by basename.
///
/// This is the dispatch table from basename to parsed field; entries whose
/// basename is not listed here are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionMember {
    /// `Dockerfile` — base image plus wrapped instruction body.
    Dockerfile,
    /// `preSetupScript.sh` — run before environment setup.
    PreSetupScript,
    /// `postSetupScript.sh` — run after environment setup.
    PostSetupScript,
    /// `preRunScript.sh` — run before an execution starts.
    PreRunScript,
    /// `postRunScript.sh` — run after an execution finishes.
    PostRunScript,
}

impl RevisionMember {
    /// Looks up a basename in the dispatch table.
    pub fn from_basename(basename: &str) -> Option<Self> {
        match basename {
            "Dockerfile" => Some(Self::Dockerfile),
            "preSetupScript.sh" => Some(Self::PreSetupScript),
            "postSetupScript.sh" => Some(Self::PostSetupScript),
            "preRunScript.sh" => Some(Self::PreRunScript),
            "postRunScript.sh" => Some(Self::PostRunScript),
            _ => None,
        }
    }
}

/// Parsed content of a revision's `Dockerfile` member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerfileDetails {
    /// The base image reference from the `FROM` line (e.g., `ubuntu:18.04`).
    pub base_image: String,

    /// The user's instruction lines, with the platform wrapper stripped.
    pub instructions: Vec<String>,
}

/// Structured contents of a revision archive.
///
/// A `None` field means the revision does not configure that piece; callers
/// must not treat absence as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionDetails {
    /// The parsed Dockerfile, if the archive carried one.
    pub dockerfile: Option<DockerfileDetails>,

    /// Lines of `preSetupScript.sh`, if present.
    pub pre_setup_script: Option<Vec<String>>,

    /// Lines of `postSetupScript.sh`, if present.
    pub post_setup_script: Option<Vec<String>>,

    /// Lines of `preRunScript.sh`, if present.
    pub pre_run_script: Option<Vec<String>>,

    /// Lines of `postRunScript.sh`, if present.
    pub post_run_script: Option<Vec<String>>,
}

impl RevisionDetails {
    /// Whether no recognized member was found in the archive.
    pub fn is_empty(&self) -> bool {
        self.dockerfile.is_none()
            && self.pre_setup_script.is_none()
            && self.post_setup_script.is_none()
            && self.pre_run_script.is_none()
            && self.post_run_script.is_none()
    }
}

/// Parses a downloaded revision archive into [`RevisionDetails`].
///
/// Each entry's final path segment is looked up in the [`RevisionMember`]
/// dispatch table; matched entries are decoded as UTF-8 and parsed, unmatched
/// entries are skipped.
///
/// # Parameters
///
/// * `bytes` - The tar archive as delivered by the revision download endpoint.
///
/// # Errors
///
/// Returns [`ApiError::MalformedArchive`] when the tar stream is unreadable,
/// a recognized member is not valid UTF-8, or the Dockerfile wrapper is
/// absent.
///
/// # Example
///
/// ```rust,no_run
/// use domino_environments::revision::parse_revision_archive;
///
/// # fn example(bytes: Vec<u8>) -> Result<(), domino_environments::api::ApiError> {
/// let details = parse_revision_archive(&bytes)?;
/// if let Some(dockerfile) = &details.dockerfile {
///     println!("base image: {}", dockerfile.base_image);
/// }
/// # Ok(())
/// # }
/// ```
pub fn parse_revision_archive(bytes: &[u8]) -> Result<RevisionDetails, ApiError> {
    let mut archive = tar::Archive::new(Cursor::new(bytes));
    let mut details = RevisionDetails::default();

    let entries = archive
        .entries()
        .map_err(|e| ApiError::MalformedArchive(format!("unreadable tar stream: {e}")))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| ApiError::MalformedArchive(format!("unreadable tar entry: {e}")))?;

        let member = {
            let path = entry
                .path()
                .map_err(|e| ApiError::MalformedArchive(format!("bad entry path: {e}")))?;
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(RevisionMember::from_basename)
        };
        let Some(member) = member else {
            continue;
        };

        let mut raw = Vec::new();
        entry
            .read_to_end(&mut raw)
            .map_err(|e| ApiError::MalformedArchive(format!("failed to read entry: {e}")))?;
        let text = String::from_utf8(raw).map_err(|_| {
            ApiError::MalformedArchive(format!("{member:?} member is not valid UTF-8"))
        })?;

        match member {
            RevisionMember::Dockerfile => details.dockerfile = Some(parse_dockerfile(&text)?),
            RevisionMember::PreSetupScript => details.pre_setup_script = Some(split_lines(&text)),
            RevisionMember::PostSetupScript => details.post_setup_script = Some(split_lines(&text)),
            RevisionMember::PreRunScript => details.pre_run_script = Some(split_lines(&text)),
            RevisionMember::PostRunScript => details.post_run_script = Some(split_lines(&text)),
        }
    }

    Ok(details)
}

/// Splits script content into lines, one element per line.
fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Parses the wrapped Dockerfile member.
///
/// Validates the wrapper before slicing: line one must carry the
/// [`FROM_PREFIX`], and the member must be at least the four wrapper lines
/// long. The user's instruction body is everything between the two header and
/// two trailer lines.
fn parse_dockerfile(text: &str) -> Result<DockerfileDetails, ApiError> {
    let lines: Vec<&str> = text.lines().collect();

    let first = lines.first().ok_or_else(|| {
        ApiError::MalformedArchive("Dockerfile member is empty".to_string())
    })?;
    let base_image = first
        .strip_prefix(FROM_PREFIX)
        .ok_or_else(|| {
            ApiError::MalformedArchive(format!(
                "Dockerfile does not begin with a {FROM_PREFIX:?} directive: {first:?}"
            ))
        })?
        .trim()
        .to_string();

    let wrapper_lines = DOCKERFILE_HEADER_LINES + DOCKERFILE_TRAILER_LINES;
    if lines.len() < wrapper_lines {
        return Err(ApiError::MalformedArchive(format!(
            "Dockerfile has {} lines, expected at least the {wrapper_lines} wrapper lines",
            lines.len()
        )));
    }

    let instructions = lines[DOCKERFILE_HEADER_LINES..lines.len() - DOCKERFILE_TRAILER_LINES]
        .iter()
        .map(|line| line.to_string())
        .collect();

    Ok(DockerfileDetails {
        base_image,
        instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an in-memory tar archive from (path, content) pairs.
    fn build_tar(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, content) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *content).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_dockerfile_wrapper_is_stripped() {
        let dockerfile =
            "FROM ubuntu:18.04\n# generated header\nRUN foo\nRUN bar\n# generated\n# trailer\n";
        let tar = build_tar(&[("Dockerfile", dockerfile.as_bytes())]);
        let details = parse_revision_archive(&tar).unwrap();
        let dockerfile = details.dockerfile.unwrap();
        assert_eq!(dockerfile.base_image, "ubuntu:18.04");
        assert_eq!(dockerfile.instructions, vec!["RUN foo", "RUN bar"]);
    }

    #[test]
    fn test_script_splits_into_lines() {
        let tar = build_tar(&[("preRunScript.sh", b"echo a\necho b\n")]);
        let details = parse_revision_archive(&tar).unwrap();
        assert_eq!(
            details.pre_run_script.unwrap(),
            vec!["echo a".to_string(), "echo b".to_string()]
        );
        assert!(details.post_run_script.is_none());
    }

    #[test]
    fn test_basename_matching_ignores_directories() {
        let tar = build_tar(&[("sources/scripts/postSetupScript.sh", b"echo hi\n")]);
        let details = parse_revision_archive(&tar).unwrap();
        assert_eq!(details.post_setup_script.unwrap(), vec!["echo hi"]);
    }

    #[test]
    fn test_unrecognized_members_are_skipped() {
        let tar = build_tar(&[("README.md", b"hello"), ("notes.txt", b"world")]);
        let details = parse_revision_archive(&tar).unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn test_empty_archive_is_empty_not_error() {
        let tar = build_tar(&[]);
        assert!(parse_revision_archive(&tar).unwrap().is_empty());
    }

    #[test]
    fn test_missing_from_directive_is_malformed() {
        let tar = build_tar(&[("Dockerfile", b"ARG BASE\nx\nRUN foo\nx\nx\n")]);
        match parse_revision_archive(&tar) {
            Err(ApiError::MalformedArchive(message)) => {
                assert!(message.contains("FROM"), "unexpected message: {message}")
            }
            other => panic!("expected MalformedArchive, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_dockerfile_is_malformed() {
        let tar = build_tar(&[("Dockerfile", b"FROM ubuntu:18.04\nRUN foo\n")]);
        assert!(matches!(
            parse_revision_archive(&tar),
            Err(ApiError::MalformedArchive(_))
        ));
    }

    #[test]
    fn test_non_utf8_member_is_malformed() {
        let tar = build_tar(&[("preSetupScript.sh", &[0xff, 0xfe, 0x00][..])]);
        assert!(matches!(
            parse_revision_archive(&tar),
            Err(ApiError::MalformedArchive(_))
        ));
    }

    #[test]
    fn test_garbage_stream_is_malformed() {
        let garbage = vec![0xffu8; 1024];
        assert!(matches!(
            parse_revision_archive(&garbage),
            Err(ApiError::MalformedArchive(_))
        ));
    }
}
