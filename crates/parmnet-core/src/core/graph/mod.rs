//! # Graph Module
//!
//! The two graph views a molecule is split into before parametrization.
//!
//! - [`homograph`] - Atoms and directed bonded edges, consumed by message passing
//! - [`heterograph`] - The interaction index store: ordered atom tuples per
//!   interaction kind (bond, angle, proper, improper) plus optional reference
//!   parameters
//! - [`builder`] - Derivation of both views from a [`Molecule`](crate::core::models::molecule::Molecule)
//!
//! A [`Graph`] simply pairs the two views; it is rebuilt per molecule and never
//! mutated by the pipeline.

pub mod builder;
pub mod error;
pub mod heterograph;
pub mod homograph;

pub use error::GraphError;
pub use heterograph::{Heterograph, InteractionKind, InteractionTuples};
pub use homograph::Homograph;

#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub homograph: Homograph,
    pub heterograph: Heterograph,
}

impl Graph {
    pub fn new(homograph: Homograph, heterograph: Heterograph) -> Self {
        Self {
            homograph,
            heterograph,
        }
    }
}
