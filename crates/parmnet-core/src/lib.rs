//! # parmnet Core Library
//!
//! Predicts classical force-field parameters (bond, angle, proper and improper
//! torsion terms) from the bonded topology of a molecule. A learned graph
//! representation assigns an embedding to every atom, and Janossy pooling turns
//! the embeddings of each interaction tuple into parameters while exactly
//! respecting the permutation symmetry of that interaction.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Homograph`,
//!   `Heterograph`), the forward-only numeric layer (`Dense`, segment reductions),
//!   the force-field readout and file I/O.
//!
//! - **[`engine`]: The Logic Core.** Model configuration, the node representation
//!   strategies (mean aggregation and graph attention) and Janossy pooling,
//!   which fills a fresh `ParameterSet` per call.
//!
//! - **[`workflows`]: The Public API.** `Parametrization`, which composes the
//!   representation and the pooling into `parametrize(graph) -> ParameterSet`.

pub mod core;
pub mod engine;
pub mod workflows;
