use parmnet::core::forcefield::readout::ReadoutError;
use parmnet::core::graph::GraphError;
use parmnet::core::io::IoError;
use parmnet::engine::error::ParametrizationError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Parametrization(#[from] ParametrizationError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    File(#[from] IoError),

    #[error(transparent)]
    Readout(#[from] ReadoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
