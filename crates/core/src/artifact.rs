//! Persisted artifact produced by the extraction pass.
//!
//! An artifact bundles the extracted field mapping with record-level counts and a description
//! of the runtime that produced it. Collaborators may add a probe flag via
//! [`Artifact::with_telemetry`] before writing; the rest of the document is left alone.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::RECORD_TYPE;
use crate::extract::{extract_fields, ExtractedFields};
use crate::runtime::RuntimeEnv;
use crate::{ParserError, ParserResult};

/// JSON document written for a single record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub record_type: String,
    pub total_lines: usize,
    pub size_bytes: usize,
    pub contains_phi: bool,
    pub processed: bool,
    pub extracted_data: ExtractedFields,
    #[serde(rename = "_runtime_env")]
    pub runtime_env: RuntimeEnv,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry_successful: Option<bool>,
}

impl Artifact {
    /// Runs extraction over `content` and wraps the result with record metadata.
    ///
    /// `total_lines` counts the pieces produced by splitting on `'\n'`, so an empty record has
    /// one line and a trailing newline adds an empty last line.
    pub fn from_record(content: &str, runtime_env: RuntimeEnv) -> Self {
        let extracted_data = extract_fields(content);
        tracing::debug!("extracted {} fields", extracted_data.len());

        Self {
            record_type: RECORD_TYPE.to_string(),
            total_lines: content.split('\n').count(),
            size_bytes: content.len(),
            contains_phi: true,
            processed: true,
            extracted_data,
            runtime_env,
            telemetry_successful: None,
        }
    }

    /// Records the outcome of the network probe.
    pub fn with_telemetry(mut self, reachable: bool) -> Self {
        self.telemetry_successful = Some(reachable);
        self
    }

    /// Serialises to pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> ParserResult<String> {
        serde_json::to_string_pretty(self).map_err(ParserError::Serialization)
    }
}

/// Reads a record or artifact from disk.
///
/// A missing file is reported as [`ParserError::InputNotFound`] so callers can tell it apart from
/// other read failures.
pub fn read_input(path: &Path) -> ParserResult<String> {
    if !path.is_file() {
        return Err(ParserError::InputNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(ParserError::FileRead)
}

/// `true` if writing to `output` would overwrite the file at `input`.
///
/// Both sides are resolved through the filesystem, so `./a.json`, `a.json` and symlinks to the
/// same file compare equal. An `output` that does not exist yet is resolved through its parent
/// directory. Falls back to comparing the paths as written when `input` cannot be resolved.
pub fn same_file(input: &Path, output: &Path) -> bool {
    let Ok(resolved_input) = fs::canonicalize(input) else {
        return input == output;
    };

    let resolved_output = match fs::canonicalize(output) {
        Ok(path) => path,
        Err(_) => {
            let parent = output
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            match (fs::canonicalize(parent), output.file_name()) {
                (Ok(dir), Some(name)) => dir.join(name),
                _ => return input == output,
            }
        }
    };

    resolved_input == resolved_output
}

/// Writes `contents` to `path`, creating any missing parent directories first.
pub fn write_output(path: &Path, contents: &str) -> ParserResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(ParserError::OutputDirCreation)?;
    }
    fs::write(path, contents).map_err(ParserError::FileWrite)
}
