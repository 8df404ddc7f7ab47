use super::error::GraphError;
use super::heterograph::{Heterograph, InteractionKind, InteractionTuples};
use super::homograph::Homograph;
use super::Graph;
use crate::core::models::atom::Element;
use crate::core::models::molecule::Molecule;
use nalgebra::DMatrix;
use std::collections::BTreeSet;
use tracing::debug;

/// Width of the per-atom feature rows produced by [`atom_features`]: the element
/// one-hot encoding followed by an aromaticity flag.
pub const ATOM_FEATURES: usize = Element::COUNT + 1;

/// Element one-hot encoding plus a trailing aromaticity flag, one row per atom.
pub fn atom_features(molecule: &Molecule) -> DMatrix<f64> {
    let mut features = DMatrix::<f64>::zeros(molecule.num_atoms(), ATOM_FEATURES);
    for (i, atom) in molecule.atoms().iter().enumerate() {
        features[(i, atom.element.one_hot_index())] = 1.0;
        if molecule.is_aromatic(i) {
            features[(i, Element::COUNT)] = 1.0;
        }
    }
    features
}

impl Graph {
    /// Derives the message-passing homograph and the interaction heterograph from
    /// the bonded topology of a molecule.
    ///
    /// Every tuple list is sorted, so the same molecule always yields the same
    /// tuple ordering.
    pub fn from_molecule(molecule: &Molecule) -> Result<Self, GraphError> {
        let adjacency = molecule.adjacency();

        let bonds = enumerate_bonds(&adjacency);
        let angles = enumerate_angles(&adjacency);
        let propers = enumerate_propers(&adjacency);
        let impropers = enumerate_impropers(&adjacency);

        debug!(
            molecule = %molecule.name,
            atoms = molecule.num_atoms(),
            bonds = bonds.len(),
            angles = angles.len(),
            propers = propers.len(),
            impropers = impropers.len(),
            "Enumerated interaction tuples."
        );

        let pairs: Vec<(usize, usize)> = bonds.iter().map(|&[i, j]| (i, j)).collect();
        let homograph = Homograph::from_pairs(atom_features(molecule), &pairs)?;

        let heterograph = Heterograph::new()
            .with_tuples(InteractionTuples::from_tuples(InteractionKind::Bond, &bonds)?)
            .with_tuples(InteractionTuples::from_tuples(InteractionKind::Angle, &angles)?)
            .with_tuples(InteractionTuples::from_tuples(InteractionKind::Proper, &propers)?)
            .with_tuples(InteractionTuples::from_tuples(
                InteractionKind::Improper,
                &impropers,
            )?);

        Ok(Graph::new(homograph, heterograph))
    }
}

fn enumerate_bonds(adjacency: &[BTreeSet<usize>]) -> Vec<[usize; 2]> {
    let mut bonds = Vec::new();
    for (i, neighbors) in adjacency.iter().enumerate() {
        for &j in neighbors.range(i + 1..) {
            bonds.push([i, j]);
        }
    }
    bonds
}

// (i, j, k) with j central and i < k.
fn enumerate_angles(adjacency: &[BTreeSet<usize>]) -> Vec<[usize; 3]> {
    let mut angles = Vec::new();
    for (j, neighbors) in adjacency.iter().enumerate() {
        for &i in neighbors {
            for &k in neighbors.range(i + 1..) {
                angles.push([i, j, k]);
            }
        }
    }
    angles.sort_unstable();
    angles
}

// Bonded paths i-j-k-l over distinct atoms, kept in the orientation that is
// lexicographically smaller than its reverse.
fn enumerate_propers(adjacency: &[BTreeSet<usize>]) -> Vec<[usize; 4]> {
    let mut propers = Vec::new();
    for (j, j_neighbors) in adjacency.iter().enumerate() {
        for &k in j_neighbors {
            for &i in j_neighbors.iter().filter(|&&i| i != k) {
                for &l in adjacency[k].iter().filter(|&&l| l != j && l != i) {
                    let forward = [i, j, k, l];
                    let reverse = [l, k, j, i];
                    if forward < reverse {
                        propers.push(forward);
                    }
                }
            }
        }
    }
    propers.sort_unstable();
    propers
}

// (c, a, b, d): central atom first, then a 3-combination of its neighbours.
fn enumerate_impropers(adjacency: &[BTreeSet<usize>]) -> Vec<[usize; 4]> {
    let mut impropers = Vec::new();
    for (c, neighbors) in adjacency.iter().enumerate() {
        if neighbors.len() < 3 {
            continue;
        }
        let ns: Vec<usize> = neighbors.iter().copied().collect();
        for x in 0..ns.len() {
            for y in x + 1..ns.len() {
                for z in y + 1..ns.len() {
                    impropers.push([c, ns[x], ns[y], ns[z]]);
                }
            }
        }
    }
    impropers
}
