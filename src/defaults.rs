//! Built-in defaults used when no usable template exists.

use std::fs;
use std::path::Path;

use crate::artifact::ReleaseRecord;
use crate::sections::parse_sections;

/// Template written for projects that have none yet.
pub const DEFAULT_TEMPLATE: &str = r#"
# Release Notes Composer Guide
# This file drives the automated release created for your repository.
#
# The following placeholders are available:
# ${COMMIT_HASH}        - The commit hash of the release
# ${REPO_NAME}          - The name of the repository
# ${CONTRIBUTORS_SINCE} - Number of contributors since the last release
# ${WHATS_CHANGED_URL}  - URL to the commit history for this release
# ${README_MD}          - Contents of README.md (auto-included)
# ${CHANGELOG_MD}       - Contents of CHANGELOG.md (auto-included)
#
# Notes:
# 1. Placeholders are case-sensitive.
# 2. Only the first TITLE, DESCRIPTION and TAG are used.
# 3. Each section (TITLE, DESCRIPTION, TAG) must end with "//ASYNC_END".
#
# Example:
#
# TITLE: Release ${COMMIT_HASH}//ASYNC_END
# DESCRIPTION: Release Notes ${CHANGELOG_MD}//ASYNC_END
# TAG: v${COMMIT_HASH}//ASYNC_END

# A TAG must not contain spaces.

TITLE: ${REPO_NAME} Release ${COMMIT_HASH}//ASYNC_END
DESCRIPTION: The latest build of ${REPO_NAME}, packaged and ready to use. A quick look at the readme:\n${README_MD}
``PLEASE NOTE:``
This release was published automatically by the build pipeline.
COMMIT ID: ${COMMIT_HASH}
REPO: ${REPO_NAME}
CONTRIBUTORS: ${CONTRIBUTORS_SINCE}
WHAT'S CHANGED: ${WHATS_CHANGED_URL}//ASYNC_END
TAG: v${COMMIT_HASH}_AUTO//ASYNC_END
"#;

/// The record produced by parsing [`DEFAULT_TEMPLATE`], before substitution.
pub fn default_record() -> ReleaseRecord {
    parse_sections(DEFAULT_TEMPLATE).into_record()
}

/// Overwrite `path` with the default template.
pub fn write_default_template(path: &Path) -> std::io::Result<()> {
    fs::write(path, DEFAULT_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses() {
        let record = default_record();
        assert!(record.is_complete());
        assert_eq!(record.title, "${REPO_NAME} Release ${COMMIT_HASH}");
        assert_eq!(record.tag, "v${COMMIT_HASH}_AUTO");
        assert!(record.description.starts_with("The latest build of ${REPO_NAME}"));
        assert!(record.description.contains("readme:\n${README_MD}\n``PLEASE NOTE:``"));
        assert!(record.description.ends_with("WHAT'S CHANGED: ${WHATS_CHANGED_URL}"));
    }

    #[test]
    fn test_commented_example_is_ignored() {
        let record = default_record();
        assert_ne!(record.title, "Release ${COMMIT_HASH}");
        assert!(!record.description.contains("Release Notes ${CHANGELOG_MD}"));
    }

    #[test]
    fn test_default_record_round_trips_as_template() {
        let record = default_record();
        let reparsed = parse_sections(&record.to_template()).into_record();
        assert_eq!(reparsed, record);
    }

    #[test]
    fn test_write_default_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compressor.settings.txt");
        fs::write(&path, "stale").unwrap();

        write_default_template(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_TEMPLATE);
    }
}
