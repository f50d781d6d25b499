//! Placeholder Substitution
//!
//! Recognized tokens look like `${NAME}` and may carry whitespace inside the
//! braces. All tokens are replaced in one pass, so substituted text is never
//! scanned again.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::artifact::ReleaseRecord;

pub const README_FALLBACK: &str = "README.md file not found.";
pub const CHANGELOG_FALLBACK: &str = "CHANGELOG.md file not found.";

/// Token names, in the order they are documented.
pub const PLACEHOLDER_NAMES: [&str; 6] = [
    "COMMIT_HASH",
    "REPO_NAME",
    "CONTRIBUTORS_SINCE",
    "WHATS_CHANGED_URL",
    "README_MD",
    "CHANGELOG_MD",
];

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\{\s*(COMMIT_HASH|REPO_NAME|CONTRIBUTORS_SINCE|WHATS_CHANGED_URL|README_MD|CHANGELOG_MD)\s*\}",
    )
    .unwrap()
});

/// Build metadata supplied by the pipeline for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseContext {
    pub commit_hash: String,
    pub repo_name: String,
    pub contributors_since: String,
    pub whats_changed_url: String,
}

/// Resolved values for every placeholder.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    context: &'a ReleaseContext,
    readme: &'a str,
    changelog: &'a str,
}

impl<'a> Placeholders<'a> {
    /// Absent or empty README/CHANGELOG content resolves to a fallback sentence.
    pub fn new(
        context: &'a ReleaseContext,
        readme: Option<&'a str>,
        changelog: Option<&'a str>,
    ) -> Self {
        Self {
            context,
            readme: readme.filter(|s| !s.is_empty()).unwrap_or(README_FALLBACK),
            changelog: changelog.filter(|s| !s.is_empty()).unwrap_or(CHANGELOG_FALLBACK),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        let value = match name {
            "COMMIT_HASH" => self.context.commit_hash.as_str(),
            "REPO_NAME" => self.context.repo_name.as_str(),
            "CONTRIBUTORS_SINCE" => self.context.contributors_since.as_str(),
            "WHATS_CHANGED_URL" => self.context.whats_changed_url.as_str(),
            "README_MD" => self.readme,
            "CHANGELOG_MD" => self.changelog,
            _ => return None,
        };
        Some(value)
    }

    /// Replace every recognized token in `text`.
    pub fn apply(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &Captures| {
                self.resolve(&caps[1]).unwrap_or(&caps[0]).to_string()
            })
            .into_owned()
    }

    pub fn apply_record(&self, record: &ReleaseRecord) -> ReleaseRecord {
        ReleaseRecord {
            title: self.apply(&record.title),
            description: self.apply(&record.description),
            tag: self.apply(&record.tag),
        }
    }
}
