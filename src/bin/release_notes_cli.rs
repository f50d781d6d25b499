//! Release Notes CLI - pipeline entry points
//!
//! Commands: compose, emit
//! Diagnostics go to stderr; exit is non-zero only on fatal errors.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use release_notes::{
    emit, emitter::OUTPUT_ENV, Composer, Layout, ReleaseContext, COMPOSER_VERSION,
};

#[derive(Parser)]
#[command(name = "release-notes-cli")]
#[command(about = "Release Notes CLI - compose and emit release metadata")]
#[command(version = COMPOSER_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root holding the template, README and CHANGELOG
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the template and write the release artifact
    Compose {
        /// Commit hash of the release
        #[arg(long = "commit_hash")]
        commit_hash: String,

        /// Repository name
        #[arg(long = "repo_name")]
        repo_name: String,

        /// Number of contributors since the last release
        #[arg(long = "contributors_since")]
        contributors_since: String,

        /// URL of the commit history for this release
        #[arg(long = "whats_changed_url")]
        whats_changed_url: String,
    },

    /// Append release outputs from the artifact to the CI output file
    Emit {
        /// Artifact path (defaults to temp/schema.json under the root)
        #[arg(short, long)]
        artifact: Option<PathBuf>,

        /// CI output file
        #[arg(short, long, env = OUTPUT_ENV)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "release_notes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let layout = Layout::new(cli.root);

    match cli.command {
        Commands::Compose {
            commit_hash,
            repo_name,
            contributors_since,
            whats_changed_url,
        } => {
            let context = ReleaseContext {
                commit_hash,
                repo_name,
                contributors_since,
                whats_changed_url,
            };

            match Composer::new(layout, context).compose() {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "compose failed");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Emit { artifact, output } => {
            let artifact = artifact.unwrap_or_else(|| layout.artifact_path());

            match emit(&artifact, &output) {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "emit failed");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
