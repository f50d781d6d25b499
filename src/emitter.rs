//! Output Emitter - artifact to CI output lines

use base64::Engine;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::artifact::{read_artifact, ArtifactError, ReleaseRecord};

/// Environment variable naming the CI output file.
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Failed to write output sink {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The three values handed to the CI system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub title: String,
    pub description_b64: String,
    pub tag: String,
}

impl OutputRecord {
    /// Title and tag are trimmed; the description is encoded untouched.
    pub fn from_record(record: &ReleaseRecord) -> Self {
        Self {
            title: record.title.trim().to_string(),
            description_b64: base64::engine::general_purpose::STANDARD
                .encode(record.description.as_bytes()),
            tag: record.tag.trim().to_string(),
        }
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("release_title={}", self.title),
            format!("release_description_b64={}", self.description_b64),
            format!("release_tag={}", self.tag),
        ]
    }

    /// Append the lines to `path`, creating the file if needed.
    pub fn append_to(&self, path: &Path) -> Result<(), EmitError> {
        let sink_err = |source: std::io::Error| EmitError::Sink {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(sink_err)?;

        let mut buf = String::new();
        for line in self.lines() {
            buf.push_str(&line);
            buf.push('\n');
        }
        file.write_all(buf.as_bytes()).map_err(sink_err)
    }
}

/// Read the artifact at `artifact` and append its output lines to `sink`.
pub fn emit(artifact: &Path, sink: &Path) -> Result<OutputRecord, EmitError> {
    let record = read_artifact(artifact)?;
    let output = OutputRecord::from_record(&record);
    output.append_to(sink)?;
    info!(sink = %sink.display(), tag = %output.tag, "emitted release outputs");
    Ok(output)
}
