//! # Numeric Layer Module
//!
//! The forward-only building blocks the parametrization pipeline is made of.
//! Everything operates on row-major batches stored in `nalgebra::DMatrix<f64>`:
//! one row per atom, edge or interaction tuple.
//!
//! - [`activation`] - Element-wise nonlinearities
//! - [`dense`] - Affine layers with seeded initialization and feed-forward stacks
//! - [`segment`] - Row gathers and grouped (segment) sum, mean and softmax
//!
//! Gradient computation and optimizer state are not provided; trained weights
//! can be injected with [`dense::Dense::from_parts`].

pub mod activation;
pub mod dense;
pub mod error;
pub mod segment;

pub use activation::Activation;
pub use dense::{Dense, FeedForward};
pub use error::NnError;
