//! # RMP Core
//!
//! Core logic for the record metadata parser.
//!
//! This crate turns a free-text patient record into a JSON artifact and revisits existing
//! artifacts to re-normalise their dates:
//! - Line-oriented field extraction against a fixed label table ([`extract`])
//! - Multi-format date parsing with first-match-wins ordering ([`dates`])
//! - The artifact document and its runtime descriptor ([`artifact`], [`runtime`])
//! - The idempotent re-normalisation pass over a persisted artifact ([`renormalise`])
//!
//! **No network concerns**: the outbound reachability probe lives in `rmp-probe`, and argument
//! handling and console reporting live in the `rmp` binary.

pub mod artifact;
pub mod config;
pub mod constants;
pub mod dates;
pub mod extract;
pub mod renormalise;
pub mod runtime;

mod error;

pub use artifact::Artifact;
pub use config::CoreConfig;
pub use error::{ParserError, ParserResult};
pub use extract::ExtractedFields;
pub use renormalise::RenormaliseSummary;
pub use runtime::RuntimeEnv;

use std::path::Path;

/// Reads the record at `input` and builds its artifact.
///
/// Fails only if the record cannot be located or read. Unmatched lines and unparseable dates
/// never cause an error.
pub fn parse_record_file(input: &Path) -> ParserResult<Artifact> {
    let content = artifact::read_input(input)?;
    tracing::info!("read {} bytes from {}", content.len(), input.display());

    Ok(Artifact::from_record(&content, RuntimeEnv::capture()))
}

/// Writes an artifact as pretty-printed JSON, creating the parent directory if needed.
pub fn write_artifact(output: &Path, artifact: &Artifact) -> ParserResult<()> {
    let json = artifact.to_json_pretty()?;
    artifact::write_output(output, &json)
}
