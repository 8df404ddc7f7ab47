use super::atom::Atom;
use super::topology::{Bond, BondOrder};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Bond {bond} references atom {atom}, but the molecule has only {num_atoms} atoms")]
    AtomOutOfRange {
        bond: usize,
        atom: usize,
        num_atoms: usize,
    },
    #[error("Bond {bond} connects atom {atom} to itself")]
    SelfBond { bond: usize, atom: usize },
    #[error("Atoms {0} and {1} are bonded more than once")]
    DuplicateBond(usize, usize),
}

/// A molecule as a list of atoms and the bonds between them.
///
/// Bond indices are validated on construction, so every downstream consumer may
/// index `atoms` with any bond endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    pub name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new(name: &str, atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, MoleculeError> {
        let num_atoms = atoms.len();
        let mut seen = HashSet::with_capacity(bonds.len());
        for (idx, bond) in bonds.iter().enumerate() {
            for atom in [bond.atom1, bond.atom2] {
                if atom >= num_atoms {
                    return Err(MoleculeError::AtomOutOfRange {
                        bond: idx,
                        atom,
                        num_atoms,
                    });
                }
            }
            if bond.atom1 == bond.atom2 {
                return Err(MoleculeError::SelfBond {
                    bond: idx,
                    atom: bond.atom1,
                });
            }
            let pair = bond.canonical_pair();
            if !seen.insert(pair) {
                return Err(MoleculeError::DuplicateBond(pair.0, pair.1));
            }
        }

        Ok(Self {
            name: name.to_string(),
            atoms,
            bonds,
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Sorted neighbour sets, one per atom.
    pub fn adjacency(&self) -> Vec<BTreeSet<usize>> {
        let mut adjacency = vec![BTreeSet::new(); self.atoms.len()];
        for bond in &self.bonds {
            adjacency[bond.atom1].insert(bond.atom2);
            adjacency[bond.atom2].insert(bond.atom1);
        }
        adjacency
    }

    /// Whether the atom takes part in at least one aromatic bond.
    pub fn is_aromatic(&self, atom: usize) -> bool {
        self.bonds
            .iter()
            .any(|b| b.order == BondOrder::Aromatic && b.contains(atom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Element;

    fn carbons(n: usize) -> Vec<Atom> {
        (0..n).map(|_| Atom::new(Element::Carbon)).collect()
    }

    #[test]
    fn new_accepts_valid_topology() {
        let mol = Molecule::new(
            "propane",
            carbons(3),
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(1, 2, BondOrder::Single),
            ],
        )
        .unwrap();
        assert_eq!(mol.num_atoms(), 3);
        assert_eq!(mol.bonds().len(), 2);
        assert_eq!(mol.name, "propane");
    }

    #[test]
    fn new_rejects_out_of_range_atoms() {
        let result = Molecule::new("bad", carbons(2), vec![Bond::new(0, 2, BondOrder::Single)]);
        assert_eq!(
            result.unwrap_err(),
            MoleculeError::AtomOutOfRange {
                bond: 0,
                atom: 2,
                num_atoms: 2
            }
        );
    }

    #[test]
    fn new_rejects_self_bonds() {
        let result = Molecule::new("bad", carbons(2), vec![Bond::new(1, 1, BondOrder::Single)]);
        assert!(matches!(result, Err(MoleculeError::SelfBond { bond: 0, atom: 1 })));
    }

    #[test]
    fn new_rejects_duplicate_bonds_in_either_direction() {
        let result = Molecule::new(
            "bad",
            carbons(2),
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(1, 0, BondOrder::Double),
            ],
        );
        assert_eq!(result.unwrap_err(), MoleculeError::DuplicateBond(0, 1));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mol = Molecule::new(
            "chain",
            carbons(3),
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(2, 1, BondOrder::Single),
            ],
        )
        .unwrap();
        let adjacency = mol.adjacency();
        assert_eq!(adjacency[0], BTreeSet::from([1]));
        assert_eq!(adjacency[1], BTreeSet::from([0, 2]));
        assert_eq!(adjacency[2], BTreeSet::from([1]));
    }

    #[test]
    fn is_aromatic_checks_bond_orders() {
        let mol = Molecule::new(
            "fragment",
            carbons(3),
            vec![
                Bond::new(0, 1, BondOrder::Aromatic),
                Bond::new(1, 2, BondOrder::Single),
            ],
        )
        .unwrap();
        assert!(mol.is_aromatic(0));
        assert!(mol.is_aromatic(1));
        assert!(!mol.is_aromatic(2));
    }
}
