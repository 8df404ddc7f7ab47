//! # I/O Module
//!
//! File formats at the edges of the pipeline.
//!
//! - [`molecule`] - TOML molecule descriptions (atoms and bonds)
//! - [`parameters`] - CSV export of parameter sets and force-field terms
//!
//! ```ignore
//! use parmnet::core::io::{molecule::read_molecule, parameters::write_parameter_set};
//!
//! let molecule = read_molecule("ethane.toml")?;
//! // ... parametrize ...
//! write_parameter_set(&parameters, "out/ethane")?;
//! ```

pub mod error;
pub mod molecule;
pub mod parameters;

pub use error::IoError;
