/// CLI error types
use segue_core::MixError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input not found: {}", .0.display())]
    MissingInput(std::path::PathBuf),

    #[error("Encoder unavailable: {0}")]
    EncoderUnavailable(String),

    #[error(transparent)]
    Mix(#[from] MixError),
}
