//! Runtime environment descriptor embedded in every artifact.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::constants::UNKNOWN_CHECKSUM;

/// Where and with what binary an artifact was produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnv {
    pub hostname: String,
    pub platform: String,
    pub runtime_version: String,
    pub checksum: String,
}

impl RuntimeEnv {
    /// Describes the current process.
    pub fn capture() -> Self {
        let checksum = std::env::current_exe()
            .ok()
            .and_then(|path| file_checksum(&path))
            .unwrap_or_else(|| UNKNOWN_CHECKSUM.to_string());

        Self {
            hostname: host_name(),
            platform: std::env::consts::OS.to_string(),
            runtime_version: format!(
                "{} {} ({})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                std::env::consts::ARCH
            ),
            checksum,
        }
    }
}

/// SHA-256 of a file's contents as lowercase hex, or `None` if it cannot be read.
pub fn file_checksum(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(hex::encode(Sha256::digest(&bytes))),
        Err(e) => {
            tracing::warn!("cannot checksum {}: {}", path.display(), e);
            None
        }
    }
}

pub(crate) fn host_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_checksum_matches_known_digest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("payload.bin");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(
            file_checksum(&path).as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn test_file_checksum_missing_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(file_checksum(&temp.path().join("absent")), None);
    }

    #[test]
    fn test_capture_fills_every_field() {
        let env = RuntimeEnv::capture();

        assert!(!env.hostname.is_empty());
        assert_eq!(env.platform, std::env::consts::OS);
        assert!(env.runtime_version.starts_with("rmp-core "));
        assert!(env.checksum == UNKNOWN_CHECKSUM || env.checksum.len() == 64);
    }
}
