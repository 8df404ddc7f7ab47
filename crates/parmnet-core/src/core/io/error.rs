use crate::core::models::molecule::MoleculeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid molecule in '{path}': {message}")]
    InvalidRecord { path: String, message: String },
    #[error("Inconsistent molecule in '{path}': {source}")]
    Molecule {
        path: String,
        source: MoleculeError,
    },
}
