//! Constants used throughout the RMP core crate.
//!
//! The label table and both date format lists are fixed vocabularies. They are kept here as
//! named values so that the extraction pass and the re-normalisation pass can each refer to
//! their own list explicitly.

use crate::extract::{FieldKind, Label};

/// Record type tag written at the top of every artifact.
pub const RECORD_TYPE: &str = "patient_medical_record";

/// Key under which the extracted field mapping is nested in an artifact.
pub const EXTRACTED_DATA_KEY: &str = "extracted_data";

/// Suffix for the unparsed copy of a date field.
pub const RAW_SUFFIX: &str = "_raw";

/// Suffix for the long-form rendering of a date field.
pub const READABLE_SUFFIX: &str = "_readable";

/// Labels recognised by the record extractor, checked top to bottom for every line.
pub const LABELS: &[Label] = &[
    Label::new("Patient ID:", "patient_id", FieldKind::Text),
    Label::new("Full Name:", "patient_name", FieldKind::Text),
    Label::new("Date of Birth:", "date_of_birth", FieldKind::Date),
    Label::new("Blood Type:", "blood_type", FieldKind::Text),
    Label::new("Visit Date:", "visit_date", FieldKind::Date),
    Label::new("Chief Complaint:", "chief_complaint", FieldKind::Text),
];

/// Canonical rendering of a parsed date.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-readable rendering of a parsed date, e.g. `March 07, 1985`.
pub const READABLE_DATE_FORMAT: &str = "%B %d, %Y";

/// Formats tried at extraction time. US month/day first, day/month as the only fallback.
pub const EXTRACTION_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%d/%m/%Y"];

/// Formats tried when re-normalising an existing artifact.
///
/// ISO comes first so already-normalised values re-emit unchanged.
pub const RENORMALISATION_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Fields inside `extracted_data` touched by the re-normalisation pass.
pub const RENORMALISED_DATE_FIELDS: &[&str] = &[
    "date_of_birth",
    "date_of_birth_raw",
    "visit_date",
    "visit_date_raw",
];

/// Artifact read by the `normalize` command when no override is configured.
pub const DEFAULT_ARTIFACT_PATH: &str = "/output_data/processed_results.json";

/// Output written by the `normalize` command when no override is configured.
pub const DEFAULT_NORMALISED_PATH: &str = "/output_data/processed_results_normalized.json";

/// Endpoint used to check whether outbound network access is available.
pub const DEFAULT_TELEMETRY_URL: &str = "https://google.com";

/// Seconds before the network probe gives up.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

/// Placeholder used when the executable cannot be hashed.
pub const UNKNOWN_CHECKSUM: &str = "unknown";
