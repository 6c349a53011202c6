//! Re-normalisation of dates in an existing artifact.
//!
//! The pass reads an artifact, rewrites the date entries listed in [`RENORMALISED_DATE_FIELDS`]
//! using [`RENORMALISATION_DATE_FORMATS`], and writes the result to a separate path. Everything
//! else in the document is passed through untouched, in its original key order.
//!
//! Running the pass on its own output is a no-op: every value it writes is either ISO (which
//! the first format re-emits verbatim) or a value no format accepts.
//!
//! [`RENORMALISATION_DATE_FORMATS`]: crate::constants::RENORMALISATION_DATE_FORMATS

use serde_json::{Map, Value};
use std::path::Path;

use crate::artifact::{read_input, same_file, write_output};
use crate::constants::{EXTRACTED_DATA_KEY, RENORMALISED_DATE_FIELDS};
use crate::dates::renormalise_value;
use crate::{ParserError, ParserResult};

/// Outcome of a re-normalisation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenormaliseSummary {
    /// Date fields present in the artifact.
    pub fields_seen: usize,
    /// Date fields whose value changed.
    pub fields_changed: usize,
}

/// Rewrites date fields in `document` in place.
///
/// A missing `extracted_data` object is treated as empty and inserted as `{}`. A document that
/// is not a JSON object, or whose `extracted_data` is not an object, is left as it is.
pub fn renormalise_artifact(document: &mut Value) -> RenormaliseSummary {
    let mut summary = RenormaliseSummary::default();

    let Some(root) = document.as_object_mut() else {
        tracing::warn!("artifact is not a JSON object; leaving unchanged");
        return summary;
    };

    let extracted = root
        .entry(EXTRACTED_DATA_KEY)
        .or_insert_with(|| Value::Object(Map::new()));

    let Some(extracted) = extracted.as_object_mut() else {
        tracing::warn!("{} is not a JSON object; leaving unchanged", EXTRACTED_DATA_KEY);
        return summary;
    };

    for field in RENORMALISED_DATE_FIELDS {
        let Some(value) = extracted.get_mut(*field) else {
            continue;
        };

        summary.fields_seen += 1;
        let normalised = renormalise_value(value);
        if normalised != *value {
            tracing::debug!("normalised {}: {} -> {}", field, value, normalised);
            summary.fields_changed += 1;
            *value = normalised;
        }
    }

    summary
}

/// Reads the artifact at `input`, re-normalises it, and writes it to `output`.
///
/// Fails if the input cannot be located, read, or parsed as JSON, or if `output` resolves to the
/// same file as `input`. Nothing is written on failure.
pub fn renormalise_file(input: &Path, output: &Path) -> ParserResult<RenormaliseSummary> {
    if same_file(input, output) {
        return Err(ParserError::InvalidInput(format!(
            "output path must differ from input artifact: {}",
            input.display()
        )));
    }

    let contents = read_input(input)?;
    let mut document: Value =
        serde_json::from_str(&contents).map_err(ParserError::Deserialization)?;

    let summary = renormalise_artifact(&mut document);

    let json = serde_json::to_string_pretty(&document).map_err(ParserError::Serialization)?;
    write_output(output, &json)?;

    tracing::info!(
        "normalised {} of {} date fields into {}",
        summary.fields_changed,
        summary.fields_seen,
        output.display()
    );

    Ok(summary)
}
