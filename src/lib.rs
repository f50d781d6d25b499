//! Release Notes Composer
//!
//! Two stages joined by a JSON artifact:
//! 1. Compose: template sections + placeholders -> `temp/schema.json`
//! 2. Emit: `temp/schema.json` -> `key=value` lines on the CI output file

pub mod sections;
pub mod placeholders;
pub mod defaults;
pub mod sources;
pub mod artifact;
pub mod composer;
pub mod emitter;

pub use sections::{parse_sections, decode_escapes, ParsedSections, SectionKind, END_MARKER};
pub use placeholders::{Placeholders, ReleaseContext};
pub use defaults::{default_record, DEFAULT_TEMPLATE};
pub use artifact::{read_artifact, write_artifact, ArtifactError, ReleaseRecord};
pub use composer::{persist_artifact, ComposeError, ComposeOutcome, Composer, Layout};
pub use emitter::{emit, EmitError, OutputRecord};

pub const COMPOSER_VERSION: &str = env!("CARGO_PKG_VERSION");
