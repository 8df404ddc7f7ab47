//! # Core Module
//!
//! Fundamental building blocks shared by the engine and the workflows.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, elements, bonds and molecules
//! - **Graphs** ([`graph`]) - The message-passing `Homograph`, the per-interaction
//!   `Heterograph` index store, and the converter from a `Molecule`
//! - **Numerics** ([`nn`]) - Dense layers, activations and segment reductions
//!   needed by the forward pass
//! - **Force Field** ([`forcefield`]) - Conversion of predicted raw parameters
//!   into physical force constants and equilibrium values
//! - **File I/O** ([`io`]) - Molecule input and parameter output formats

pub mod forcefield;
pub mod graph;
pub mod io;
pub mod models;
pub mod nn;
