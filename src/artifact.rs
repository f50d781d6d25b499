//! Release Artifact - the JSON hand-off between composer and emitter

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    Missing(PathBuf),

    #[error("Artifact directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to access artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Title, description and tag of a release, after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: String,
}

impl ReleaseRecord {
    /// Record with every field empty. An artifact holding `{}` loads as this.
    pub const EMPTY: ReleaseRecord = ReleaseRecord {
        title: String::new(),
        description: String::new(),
        tag: String::new(),
    };

    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tag: tag.into(),
        }
    }

    /// True when all three fields carry text.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty() && !self.tag.is_empty()
    }

    /// Render as template text that parses back into this record.
    pub fn to_template(&self) -> String {
        use crate::sections::END_MARKER;
        format!(
            "TITLE: {title}{END_MARKER}\nDESCRIPTION: {description}{END_MARKER}\nTAG: {tag}{END_MARKER}\n",
            title = self.title,
            description = self.description,
            tag = self.tag,
        )
    }
}

/// Write the record as pretty JSON.
///
/// The parent directory must already exist; it is not created here.
pub fn write_artifact(record: &ReleaseRecord, path: &Path) -> Result<(), ArtifactError> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        if !dir.is_dir() {
            return Err(ArtifactError::MissingDirectory(dir.to_path_buf()));
        }
    }

    let json = serde_json::to_vec_pretty(record)?;
    fs::write(path, json).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a previously written record.
///
/// A file that does not exist is `ArtifactError::Missing`; an empty JSON
/// object is `ReleaseRecord::EMPTY`.
pub fn read_artifact(path: &Path) -> Result<ReleaseRecord, ArtifactError> {
    let content = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ArtifactError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(serde_json::from_slice(&content)?)
}
