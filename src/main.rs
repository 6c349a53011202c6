use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rmp_core::renormalise::renormalise_file;
use rmp_core::{parse_record_file, write_artifact, Artifact, CoreConfig};
use rmp_probe::NetworkProbe;

#[derive(Parser)]
#[command(name = "rmp")]
#[command(about = "Extracts metadata from patient records and normalises embedded dates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a patient record into a JSON artifact
    Parse {
        /// Path to input text file containing the patient record
        input_file: PathBuf,
        /// Path where JSON output will be written
        output_file: PathBuf,
    },
    /// Re-normalise dates in the artifact at RMP_ARTIFACT_PATH into RMP_NORMALIZED_PATH
    Normalize,
}

/// Entry point for the record metadata parser.
///
/// # Environment Variables
/// - `RMP_TELEMETRY_URL`: URL used by the network isolation probe (default: "https://google.com")
/// - `RMP_PROBE_TIMEOUT_SECS`: probe timeout in seconds (default: 3)
/// - `RMP_ARTIFACT_PATH`: artifact read by `normalize`
/// - `RMP_NORMALIZED_PATH`: output written by `normalize`
///
/// # Exit status
/// `parse` exits non-zero when the record cannot be processed, and also when the probe shows
/// outbound network access is available. `normalize` exits non-zero only when the artifact
/// cannot be read or the output cannot be written.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rmp=info".parse()?)
                .add_directive("rmp_core=info".parse()?)
                .add_directive("rmp_probe=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = CoreConfig::from_env_values(
        std::env::var("RMP_TELEMETRY_URL").ok(),
        std::env::var("RMP_PROBE_TIMEOUT_SECS").ok(),
        std::env::var("RMP_ARTIFACT_PATH").ok(),
        std::env::var("RMP_NORMALIZED_PATH").ok(),
    )?;

    match cli.command {
        Commands::Parse {
            input_file,
            output_file,
        } => parse(&config, &input_file, &output_file).await,
        Commands::Normalize => normalize(&config),
    }
}

async fn parse(config: &CoreConfig, input: &Path, output: &Path) -> anyhow::Result<ExitCode> {
    tracing::info!("reading input file: {}", input.display());
    let artifact = match parse_record_file(input) {
        Ok(artifact) => artifact,
        Err(e) => {
            eprintln!("Error reading record: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    print_extracted(&artifact);

    let reachable = probe_network(config).await;
    let artifact = artifact.with_telemetry(reachable);

    tracing::info!("writing output to: {}", output.display());
    if let Err(e) = write_artifact(output, &artifact) {
        eprintln!("Error writing output: {}", e);
        return Ok(ExitCode::FAILURE);
    }

    println!("Records processed: 1");
    println!("Output file: {}", output.display());
    println!(
        "Network activity: {}",
        if reachable { "DETECTED" } else { "BLOCKED" }
    );

    if reachable {
        eprintln!("Network access detected - not safe for production");
        Ok(ExitCode::FAILURE)
    } else {
        println!("Network properly isolated - safe for production");
        Ok(ExitCode::SUCCESS)
    }
}

fn normalize(config: &CoreConfig) -> anyhow::Result<ExitCode> {
    let summary = renormalise_file(config.artifact_path(), config.normalised_path())?;
    println!(
        "Date normalisation complete ({} of {} fields changed). Output saved to {}",
        summary.fields_changed,
        summary.fields_seen,
        config.normalised_path().display()
    );
    Ok(ExitCode::SUCCESS)
}

async fn probe_network(config: &CoreConfig) -> bool {
    match NetworkProbe::new(config.telemetry_url(), config.probe_timeout()) {
        Ok(probe) => probe.run().await.is_reachable(),
        Err(e) => {
            tracing::warn!("network probe unavailable: {}", e);
            false
        }
    }
}

fn print_extracted(artifact: &Artifact) {
    let fields = &artifact.extracted_data;
    println!("Parsed {} fields", fields.len());
    if let Some(name) = fields.get("patient_name") {
        println!("  - Patient: {}", name);
        if let Some(dob) = fields.get("date_of_birth_readable") {
            println!("  - DOB: {}", dob);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_takes_two_paths() {
        let cli = Cli::try_parse_from(["rmp", "parse", "patient_data.txt", "out/results.json"])
            .unwrap();
        match cli.command {
            Commands::Parse {
                input_file,
                output_file,
            } => {
                assert_eq!(input_file, PathBuf::from("patient_data.txt"));
                assert_eq!(output_file, PathBuf::from("out/results.json"));
            }
            Commands::Normalize => panic!("expected parse"),
        }
    }

    #[test]
    fn test_parse_command_requires_output() {
        assert!(Cli::try_parse_from(["rmp", "parse", "patient_data.txt"]).is_err());
    }

    #[test]
    fn test_normalize_takes_no_arguments() {
        assert!(matches!(
            Cli::try_parse_from(["rmp", "normalize"]).unwrap().command,
            Commands::Normalize
        ));
        assert!(Cli::try_parse_from(["rmp", "normalize", "extra.json"]).is_err());
    }

    #[tokio::test]
    async fn test_parse_missing_input_fails_without_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let output = temp.path().join("out.json");
        let config = CoreConfig::default();

        let code = parse(&config, &temp.path().join("missing.txt"), &output)
            .await
            .unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(!output.exists());
    }

    #[test]
    fn test_normalize_writes_distinct_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("processed_results.json");
        let output = temp.path().join("processed_results_normalized.json");
        std::fs::write(&input, r#"{"extracted_data": {"visit_date": "Mar 07, 2024"}}"#).unwrap();

        let config = CoreConfig::from_env_values(
            None,
            None,
            Some(input.display().to_string()),
            Some(output.display().to_string()),
        )
        .unwrap();

        assert_eq!(normalize(&config).unwrap(), ExitCode::SUCCESS);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"visit_date\": \"2024-03-07\""));
    }
}
