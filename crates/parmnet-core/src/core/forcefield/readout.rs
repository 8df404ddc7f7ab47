use crate::core::graph::heterograph::InteractionKind;
use crate::core::models::parameters::ParameterSet;
use crate::core::nn::activation::softplus;
use nalgebra::DMatrix;
use std::f64::consts::PI;
use thiserror::Error;

/// Reference bond lengths (nm) mixed by the bond coefficients.
pub const BOND_PHASES: [f64; 2] = [0.0, 1.0];
/// Reference angles (rad) mixed by the angle coefficients.
pub const ANGLE_PHASES: [f64; 2] = [0.0, PI];

pub const COEFFICIENTS: &str = "coefficients";
pub const TORSION_K: &str = "k";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadoutError {
    #[error("Parameter '{name}' is missing for '{kind}'")]
    MissingParameter {
        kind: InteractionKind,
        name: &'static str,
    },
    #[error("Parameter '{name}' for '{kind}' has {found} columns, expected {expected}")]
    Width {
        kind: InteractionKind,
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicTerm {
    pub atoms: Vec<usize>,
    pub k: f64,
    pub eq: f64,
}

/// Periodic torsion: `k[n - 1]` is the force constant of periodicity `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct TorsionTerm {
    pub atoms: Vec<usize>,
    pub k: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceFieldTerms {
    pub bonds: Vec<HarmonicTerm>,
    pub angles: Vec<HarmonicTerm>,
    pub propers: Vec<TorsionTerm>,
    pub impropers: Vec<TorsionTerm>,
}

/// Converts raw mixture coefficients (one row per tuple) into `(k, eq)` pairs.
///
/// Coefficients pass through a softplus, so a row of large negative values
/// describes a term that is effectively switched off. If every weight of a row
/// underflows to zero, the equilibrium falls back to the mean phase.
pub fn linear_mixture(coefficients: &DMatrix<f64>, phases: &[f64]) -> Vec<(f64, f64)> {
    debug_assert_eq!(coefficients.ncols(), phases.len());
    coefficients
        .row_iter()
        .map(|row| {
            let weights: Vec<f64> = row.iter().map(|&c| softplus(c)).collect();
            let k: f64 = weights.iter().sum();
            let eq = if k > 0.0 {
                weights.iter().zip(phases).map(|(w, p)| w * p).sum::<f64>() / k
            } else {
                phases.iter().sum::<f64>() / phases.len() as f64
            };
            (k, eq)
        })
        .collect()
}

fn harmonic_terms(
    parameters: &ParameterSet,
    kind: InteractionKind,
    phases: &[f64],
) -> Result<Vec<HarmonicTerm>, ReadoutError> {
    let Some(kind_parameters) = parameters.get(kind) else {
        return Ok(Vec::new());
    };
    let coefficients = kind_parameters
        .get(COEFFICIENTS)
        .ok_or(ReadoutError::MissingParameter {
            kind,
            name: COEFFICIENTS,
        })?;
    if coefficients.ncols() != phases.len() {
        return Err(ReadoutError::Width {
            kind,
            name: COEFFICIENTS,
            expected: phases.len(),
            found: coefficients.ncols(),
        });
    }

    Ok(kind_parameters
        .tuples()
        .iter()
        .zip(linear_mixture(coefficients, phases))
        .map(|(atoms, (k, eq))| HarmonicTerm {
            atoms: atoms.to_vec(),
            k,
            eq,
        })
        .collect())
}

fn torsion_terms(
    parameters: &ParameterSet,
    kind: InteractionKind,
) -> Result<Vec<TorsionTerm>, ReadoutError> {
    let Some(kind_parameters) = parameters.get(kind) else {
        return Ok(Vec::new());
    };
    let k = kind_parameters
        .get(TORSION_K)
        .ok_or(ReadoutError::MissingParameter {
            kind,
            name: TORSION_K,
        })?;

    Ok(kind_parameters
        .tuples()
        .iter()
        .zip(k.row_iter())
        .map(|(atoms, row)| TorsionTerm {
            atoms: atoms.to_vec(),
            k: row.iter().copied().collect(),
        })
        .collect())
}

impl ForceFieldTerms {
    /// Reads physical terms out of a parameter set that follows the default
    /// schema. Kinds absent from the set produce no terms.
    pub fn from_parameters(parameters: &ParameterSet) -> Result<Self, ReadoutError> {
        Ok(Self {
            bonds: harmonic_terms(parameters, InteractionKind::Bond, &BOND_PHASES)?,
            angles: harmonic_terms(parameters, InteractionKind::Angle, &ANGLE_PHASES)?,
            propers: torsion_terms(parameters, InteractionKind::Proper)?,
            impropers: torsion_terms(parameters, InteractionKind::Improper)?,
        })
    }
}
