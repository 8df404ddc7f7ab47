//! # Force Field Module
//!
//! Turns the raw per-tuple outputs of the pooling heads into physical
//! force-field terms.
//!
//! ## Overview
//!
//! Bond and angle heads predict `coefficients`: unconstrained weights of a
//! linear mixture over two fixed reference values ("phases"). After a softplus,
//! the force constant is the sum of the weights and the equilibrium value is the
//! weighted average of the phases. Torsion heads predict one force constant per
//! periodicity `n = 1..=dim`, used as is.
//!
//! - [`readout`] - Phases, the linear mixture and `ForceFieldTerms`

pub mod readout;
