//! # Workflows Module
//!
//! Top-level entry points. [`parametrize::Parametrization`] composes the node
//! representation and Janossy pooling into a single
//! `parametrize(graph) -> ParameterSet` call, plus a batch variant that runs
//! independent molecules in parallel when the `parallel` feature is enabled.

pub mod parametrize;
