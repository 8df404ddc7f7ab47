use super::error::IoError;
use crate::core::models::atom::{Atom, Element};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{Bond, BondOrder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoleculeRecord {
    name: Option<String>,
    #[serde(default)]
    atoms: Vec<AtomRecord>,
    #[serde(default)]
    bonds: Vec<BondRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtomRecord {
    element: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondRecord {
    atoms: [usize; 2],
    order: Option<String>,
}

/// Parses a molecule from TOML text:
///
/// ```toml
/// name = "ethanol"
///
/// [[atoms]]
/// element = "C"
///
/// [[atoms]]
/// element = "O"
/// name = "O1"
///
/// [[bonds]]
/// atoms = [0, 1]
/// order = "single"
/// ```
///
/// `source` only labels error messages. A missing name falls back to
/// `default_name`; a missing bond order means a single bond.
pub fn parse_molecule(content: &str, source: &str, default_name: &str) -> Result<Molecule, IoError> {
    let record: MoleculeRecord = toml::from_str(content).map_err(|e| IoError::Toml {
        path: source.to_string(),
        source: e,
    })?;

    let atoms = record
        .atoms
        .into_iter()
        .enumerate()
        .map(|(idx, a)| {
            let element = a.element.parse::<Element>().map_err(|e| IoError::InvalidRecord {
                path: source.to_string(),
                message: format!("atom {idx}: {e}"),
            })?;
            Ok(Atom {
                element,
                name: a.name,
            })
        })
        .collect::<Result<Vec<_>, IoError>>()?;

    let bonds = record
        .bonds
        .into_iter()
        .enumerate()
        .map(|(idx, b)| {
            let order = match b.order.as_deref() {
                Some(s) => s.parse::<BondOrder>().map_err(|e| IoError::InvalidRecord {
                    path: source.to_string(),
                    message: format!("bond {idx}: {e} '{s}'"),
                })?,
                None => BondOrder::default(),
            };
            Ok(Bond::new(b.atoms[0], b.atoms[1], order))
        })
        .collect::<Result<Vec<_>, IoError>>()?;

    let name = record.name.unwrap_or_else(|| default_name.to_string());
    Molecule::new(&name, atoms, bonds).map_err(|e| IoError::Molecule {
        path: source.to_string(),
        source: e,
    })
}

/// Reads a TOML molecule file; the file stem names molecules without a `name`.
pub fn read_molecule<P: AsRef<Path>>(path: P) -> Result<Molecule, IoError> {
    let path = path.as_ref();
    let display = path.to_string_lossy().to_string();
    debug!("Reading molecule from {:?}", path);

    let content = std::fs::read_to_string(path).map_err(|e| IoError::Io {
        path: display.clone(),
        source: e,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "molecule".to_string());
    parse_molecule(&content, &display, &stem)
}
