#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("input file not found: {}", .0.display())]
    InputNotFound(std::path::PathBuf),
    #[error("failed to read input file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to create output directory: {0}")]
    OutputDirCreation(std::io::Error),
    #[error("failed to write output file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize artifact: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize artifact: {0}")]
    Deserialization(serde_json::Error),
}

pub type ParserResult<T> = std::result::Result<T, ParserError>;
