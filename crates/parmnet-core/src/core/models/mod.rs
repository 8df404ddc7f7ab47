//! # Core Models Module
//!
//! Data structures describing a molecule before it is turned into graphs.
//!
//! - [`atom`] - Chemical elements and atoms
//! - [`topology`] - Bonds and bond orders
//! - [`molecule`] - A validated set of atoms and bonds
//! - [`parameters`] - The per-interaction `ParameterSet` produced by parametrization
//!
//! ```ignore
//! use parmnet::core::models::{atom::{Atom, Element}, molecule::Molecule, topology::{Bond, BondOrder}};
//!
//! let atoms = vec![Atom::new(Element::Carbon), Atom::new(Element::Carbon)];
//! let bonds = vec![Bond::new(0, 1, BondOrder::Single)];
//! let ethane_backbone = Molecule::new("CC", atoms, bonds)?;
//! ```

pub mod atom;
pub mod molecule;
pub mod parameters;
pub mod topology;
