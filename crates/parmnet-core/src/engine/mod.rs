//! # Engine Module
//!
//! The learned parts of the parametrization pipeline and their configuration.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Model widths, depths, activation, parameter
//!   schema and seed, assembled through [`config::ModelConfigBuilder`]
//! - **Node Representation** ([`representation`]) - Per-atom embeddings from the
//!   bonded graph, by mean aggregation (GraphSAGE) or multi-head attention
//! - **Janossy Pooling** ([`janossy`]) - Symmetrized per-kind stacks mapping
//!   tuples of atom embeddings to named parameter arrays
//! - **Error Handling** ([`error`]) - [`error::ParametrizationError`]
//!
//! All weights are created once from a seeded generator and never mutated
//! afterwards, so every module here is `Send + Sync` and a forward pass has no
//! side effects.

pub mod config;
pub mod error;
pub mod janossy;
pub mod representation;
