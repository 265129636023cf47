//
//  domino-environments
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Version parsing and compatibility checking for the deployment version
//! reported by a Domino instance at `GET /version`.

use crate::MINIMUM_SUPPORTED_VERSION;

/// Parses the leading dotted-numeric components of a version string.
///
/// Components are split on `.` and parsed up to the first non-digit character,
/// so `"4.2.1-rc.1"` parses as `[4, 2, 1]`. Parsing stops at the first
/// component with no leading digits.
///
/// # Parameters
///
/// * `version` - The version string to parse (e.g., `"4.6.0"`).
///
/// # Returns
///
/// A `Vec<u64>` of the numeric components. Empty if the string does not start
/// with a digit.
///
/// # Example
///
/// ```rust
/// use domino_environments::util::parse_version;
///
/// assert_eq!(parse_version("4.6.0"), vec![4, 6, 0]);
/// assert_eq!(parse_version("5.0.1-hotfix2"), vec![5, 0, 1]);
/// assert_eq!(parse_version("nightly"), Vec::<u64>::new());
/// ```
pub fn parse_version(version: &str) -> Vec<u64> {
    let mut components = Vec::new();
    for part in version.split('.') {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u64>() {
            Ok(n) => components.push(n),
            Err(_) => break,
        }
        // a truncated component (e.g. "1-rc") ends the numeric prefix
        if digits.len() < part.len() {
            break;
        }
    }
    components
}

/// Checks whether a deployment version is compatible with this library.
///
/// The deployment version is compared component-wise against
/// [`MINIMUM_SUPPORTED_VERSION`]. Missing trailing components are treated as
/// zero, so `"4.1"` and `"4.1.0"` compare equal.
///
/// # Parameters
///
/// * `version` - The deployment version reported by the platform.
///
/// # Returns
///
/// Returns `true` if the version is at least the minimum supported version.
/// An unparseable version returns `false`; compatibility cannot be assumed.
///
/// # Example
///
/// ```rust
/// use domino_environments::util::is_version_compatible;
///
/// assert!(is_version_compatible("4.6.0"));
/// assert!(!is_version_compatible("3.9.12"));
/// ```
pub fn is_version_compatible(version: &str) -> bool {
    let deployed = parse_version(version);
    if deployed.is_empty() {
        return false;
    }
    let minimum = parse_version(MINIMUM_SUPPORTED_VERSION);

    let len = deployed.len().max(minimum.len());
    for i in 0..len {
        let d = deployed.get(i).copied().unwrap_or(0);
        let m = minimum.get(i).copied().unwrap_or(0);
        if d != m {
            return d > m;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("4.1.0"), vec![4, 1, 0]);
        assert_eq!(parse_version("4.2.1-rc.1"), vec![4, 2, 1]);
        assert_eq!(parse_version(""), Vec::<u64>::new());
        assert_eq!(parse_version("beta"), Vec::<u64>::new());
    }

    #[test]
    fn test_version_at_minimum_is_compatible() {
        assert!(is_version_compatible("4.1.0"));
        assert!(is_version_compatible("4.1"));
    }

    #[test]
    fn test_newer_versions_are_compatible() {
        assert!(is_version_compatible("4.1.1"));
        assert!(is_version_compatible("4.6.0"));
        assert!(is_version_compatible("5.0.0"));
        assert!(is_version_compatible("5.2.0-hotfix3"));
    }

    #[test]
    fn test_older_versions_are_incompatible() {
        assert!(!is_version_compatible("4.0.9"));
        assert!(!is_version_compatible("3.6.17"));
    }

    #[test]
    fn test_garbage_versions_are_incompatible() {
        assert!(!is_version_compatible(""));
        assert!(!is_version_compatible("unknown"));
    }
}
