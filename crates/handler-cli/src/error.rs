use handler_core::HostError;
use std::path::PathBuf;

/// Failures that stop the CLI before or after a session.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),
    #[error(transparent)]
    Host(#[from] HostError),
}
