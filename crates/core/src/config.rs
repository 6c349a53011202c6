//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services that
//! need it. Nothing in the core reads environment variables while a record is being processed.

use crate::artifact::same_file;
use crate::constants::{
    DEFAULT_ARTIFACT_PATH, DEFAULT_NORMALISED_PATH, DEFAULT_PROBE_TIMEOUT_SECS,
    DEFAULT_TELEMETRY_URL,
};
use crate::{ParserError, ParserResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    telemetry_url: String,
    probe_timeout: Duration,
    artifact_path: PathBuf,
    normalised_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The re-normalisation output must not overwrite the artifact it reads.
    pub fn new(
        telemetry_url: String,
        probe_timeout: Duration,
        artifact_path: PathBuf,
        normalised_path: PathBuf,
    ) -> ParserResult<Self> {
        if telemetry_url.trim().is_empty() {
            return Err(ParserError::InvalidInput(
                "telemetry_url cannot be empty".into(),
            ));
        }

        if probe_timeout.is_zero() {
            return Err(ParserError::InvalidInput(
                "probe timeout must be greater than zero".into(),
            ));
        }

        if same_file(&artifact_path, &normalised_path) {
            return Err(ParserError::InvalidInput(
                "normalised output path must differ from the artifact path".into(),
            ));
        }

        Ok(Self {
            telemetry_url,
            probe_timeout,
            artifact_path,
            normalised_path,
        })
    }

    /// Build a config from optional raw values, falling back to defaults for anything unset.
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn from_env_values(
        telemetry_url: Option<String>,
        probe_timeout_secs: Option<String>,
        artifact_path: Option<String>,
        normalised_path: Option<String>,
    ) -> ParserResult<Self> {
        let telemetry_url =
            non_blank(telemetry_url).unwrap_or_else(|| DEFAULT_TELEMETRY_URL.to_string());
        let probe_timeout = probe_timeout_from_env_value(probe_timeout_secs)?;
        let artifact_path =
            non_blank(artifact_path).unwrap_or_else(|| DEFAULT_ARTIFACT_PATH.to_string());
        let normalised_path =
            non_blank(normalised_path).unwrap_or_else(|| DEFAULT_NORMALISED_PATH.to_string());

        Self::new(
            telemetry_url,
            probe_timeout,
            PathBuf::from(artifact_path),
            PathBuf::from(normalised_path),
        )
    }

    pub fn telemetry_url(&self) -> &str {
        &self.telemetry_url
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn normalised_path(&self) -> &Path {
        &self.normalised_path
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            telemetry_url: DEFAULT_TELEMETRY_URL.to_string(),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            normalised_path: PathBuf::from(DEFAULT_NORMALISED_PATH),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the probe timeout in whole seconds from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn probe_timeout_from_env_value(value: Option<String>) -> ParserResult<Duration> {
    let Some(value) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));
    };

    let secs = value.parse::<u64>().map_err(|_| {
        ParserError::InvalidInput(format!(
            "probe timeout must be a whole number of seconds, got '{}'",
            value
        ))
    })?;

    Ok(Duration::from_secs(secs))
}
