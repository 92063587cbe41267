// CLI module for ferrotag
//
// Command-line functionality on top of the library; only compiled into the
// binary.

pub mod commands;
pub mod output;

pub use output::{OutputFormat, OutputFormatter};

// Error type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    FileNotFound(String),
    IoError(std::io::Error),
    ParseError(String),
    TagError(ferrotag::TagError),
    Other(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {}", path),
            CliError::IoError(e) => write!(f, "I/O error: {}", e),
            CliError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            CliError::TagError(e) => write!(f, "{}", e),
            CliError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::IoError(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::ParseError(e.to_string())
    }
}

impl From<ferrotag::TagError> for CliError {
    fn from(e: ferrotag::TagError) -> Self {
        CliError::TagError(e)
    }
}
