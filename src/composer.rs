//! Composer - Single Entry Point for the compose stage
//!
//! template -> sections -> placeholders -> artifact.
//! Only failing to create the artifact directory aborts a run; unreadable
//! inputs degrade to defaults and fallback text.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::artifact::{write_artifact, ArtifactError, ReleaseRecord};
use crate::defaults::{default_record, write_default_template, DEFAULT_TEMPLATE};
use crate::placeholders::{Placeholders, ReleaseContext};
use crate::sections::parse_sections;
use crate::sources::read_source;

pub const TEMPLATE_FILE: &str = "compressor.settings.txt";
pub const README_FILE: &str = "README.md";
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";
pub const ARTIFACT_DIR: &str = "temp";
pub const ARTIFACT_FILE: &str = "schema.json";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Conventional file locations relative to a repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(TEMPLATE_FILE)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root.join(README_FILE)
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.root.join(CHANGELOG_FILE)
    }

    pub fn artifact_dir(&self) -> PathBuf {
        self.root.join(ARTIFACT_DIR)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.artifact_dir().join(ARTIFACT_FILE)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Result of a compose run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOutcome {
    /// The substituted record that was (or would have been) persisted.
    pub record: ReleaseRecord,
    /// The template yielded no usable record and the built-in default was used.
    pub used_default: bool,
    pub artifact_written: bool,
}

pub struct Composer {
    layout: Layout,
    context: ReleaseContext,
}

impl Composer {
    pub fn new(layout: Layout, context: ReleaseContext) -> Self {
        Self { layout, context }
    }

    /// Run the compose stage and persist the artifact.
    pub fn compose(&self) -> Result<ComposeOutcome, ComposeError> {
        let artifact_dir = self.layout.artifact_dir();
        fs::create_dir_all(&artifact_dir).map_err(|source| ComposeError::CreateDir {
            path: artifact_dir.clone(),
            source,
        })?;

        let (record, used_default) = self.load_record();

        let readme = read_or_absent(&self.layout.readme_path());
        let changelog = read_or_absent(&self.layout.changelog_path());
        if readme.is_none() || changelog.is_none() {
            error!("failed to read README.md or CHANGELOG.md; it is missing or unreadable");
        }

        let placeholders = Placeholders::new(&self.context, readme.as_deref(), changelog.as_deref());
        let record = placeholders.apply_record(&record);

        let artifact_written = persist_artifact(&record, &self.layout.artifact_path());

        Ok(ComposeOutcome {
            record,
            used_default,
            artifact_written,
        })
    }

    /// Parse the template, falling back to the built-in default record.
    fn load_record(&self) -> (ReleaseRecord, bool) {
        let template_path = self.layout.template_path();

        let text = match read_or_absent(&template_path) {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn!(path = %template_path.display(), "template not found, creating default");
                materialize_default(&template_path);
                DEFAULT_TEMPLATE.to_string()
            }
        };

        let record = parse_sections(&text).into_record();
        if record.is_complete() {
            debug!(title = %record.title, tag = %record.tag, "parsed template");
            return (record, false);
        }

        warn!("no valid sections in template, using default");
        materialize_default(&template_path);
        (default_record(), true)
    }
}

/// Read an input file; any failure counts as absent content.
fn read_or_absent(path: &Path) -> Option<String> {
    match read_source(path) {
        Ok(content) => content,
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read input file");
            None
        }
    }
}

fn materialize_default(path: &Path) {
    if let Err(e) = write_default_template(path) {
        error!(path = %path.display(), error = %e, "failed to write default template");
    }
}

/// Write the artifact, logging instead of failing.
///
/// Returns whether the file was written.
pub fn persist_artifact(record: &ReleaseRecord, path: &Path) -> bool {
    match write_artifact(record, path) {
        Ok(()) => {
            info!(path = %path.display(), "wrote release artifact");
            true
        }
        Err(ArtifactError::MissingDirectory(dir)) => {
            error!(
                path = %path.display(),
                dir = %dir.display(),
                "failed to write artifact, directory does not exist"
            );
            false
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to write artifact");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/repo");
        assert_eq!(layout.template_path(), Path::new("/repo/compressor.settings.txt"));
        assert_eq!(layout.readme_path(), Path::new("/repo/README.md"));
        assert_eq!(layout.changelog_path(), Path::new("/repo/CHANGELOG.md"));
        assert_eq!(layout.artifact_path(), Path::new("/repo/temp/schema.json"));
    }

    #[test]
    fn test_unreadable_input_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_or_absent(dir.path()), None);
        assert_eq!(read_or_absent(&dir.path().join("missing.md")), None);
    }

    #[test]
    fn test_persist_artifact_missing_directory_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("schema.json");

        assert!(!persist_artifact(&ReleaseRecord::new("T", "D", "G"), &path));
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_artifact_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");

        assert!(persist_artifact(&ReleaseRecord::new("T", "D", "G"), &path));
        assert!(path.exists());
    }
}
