use super::error::IoError;
use crate::core::forcefield::readout::{ForceFieldTerms, HarmonicTerm, TorsionTerm};
use crate::core::graph::heterograph::InteractionKind;
use crate::core::models::parameters::{KindParameters, ParameterSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

fn kind_header(parameters: &KindParameters) -> Vec<String> {
    let mut header: Vec<String> = (0..parameters.tuples().arity())
        .map(|i| format!("atom{i}"))
        .collect();
    for (name, values) in parameters.iter() {
        header.extend((0..values.ncols()).map(|i| format!("{name}_{i}")));
    }
    header
}

/// Writes one interaction kind as CSV: atom index columns followed by one
/// column per parameter component (`name_0`, `name_1`, ...). An empty kind
/// produces a header-only table.
pub fn write_kind_parameters<W: Write>(
    writer: W,
    parameters: &KindParameters,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(kind_header(parameters))?;

    for (t, atoms) in parameters.tuples().iter().enumerate() {
        let mut record: Vec<String> = atoms.iter().map(|a| a.to_string()).collect();
        for (_, values) in parameters.iter() {
            record.extend(values.row(t).iter().map(|v| v.to_string()));
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), IoError> {
    std::fs::create_dir_all(dir).map_err(|e| IoError::Io {
        path: dir.to_string_lossy().to_string(),
        source: e,
    })
}

fn create_file(path: &Path) -> Result<std::fs::File, IoError> {
    std::fs::File::create(path).map_err(|e| IoError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path, source: csv::Error) -> IoError {
    IoError::Csv {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

/// Writes `<dir>/<stem>_<kind>.csv` for every kind in the set and returns the
/// paths in kind order.
pub fn write_parameter_set<P: AsRef<Path>>(
    parameters: &ParameterSet,
    dir: P,
    stem: &str,
) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    create_dir(dir)?;

    let mut written = Vec::new();
    for (kind, kind_parameters) in parameters.iter() {
        let path = dir.join(format!("{stem}_{kind}.csv"));
        let file = create_file(&path)?;
        write_kind_parameters(file, kind_parameters).map_err(|e| csv_error(&path, e))?;
        debug!(path = %path.display(), tuples = kind_parameters.len(), "Wrote parameters.");
        written.push(path);
    }
    Ok(written)
}

fn joined(atoms: &[usize]) -> String {
    atoms
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Harmonic terms as `kind,atoms,k,eq`; atoms are dash-joined indices.
pub fn write_harmonic_terms<W: Write>(writer: W, terms: &ForceFieldTerms) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["kind", "atoms", "k", "eq"])?;
    let groups: [(InteractionKind, &[HarmonicTerm]); 2] = [
        (InteractionKind::Bond, terms.bonds.as_slice()),
        (InteractionKind::Angle, terms.angles.as_slice()),
    ];
    for (kind, group) in groups {
        for term in group {
            wtr.write_record([
                kind.to_string(),
                joined(&term.atoms),
                term.k.to_string(),
                term.eq.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Torsion terms as `kind,atoms,periodicity,k`, one row per periodicity.
pub fn write_torsion_terms<W: Write>(writer: W, terms: &ForceFieldTerms) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["kind", "atoms", "periodicity", "k"])?;
    let groups: [(InteractionKind, &[TorsionTerm]); 2] = [
        (InteractionKind::Proper, terms.propers.as_slice()),
        (InteractionKind::Improper, terms.impropers.as_slice()),
    ];
    for (kind, group) in groups {
        for term in group {
            let atoms = joined(&term.atoms);
            for (n, k) in term.k.iter().enumerate() {
                wtr.write_record([kind.to_string(), atoms.clone(), (n + 1).to_string(), k.to_string()])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `<dir>/<stem>_harmonic.csv` and `<dir>/<stem>_torsion.csv`.
pub fn write_force_field_terms<P: AsRef<Path>>(
    terms: &ForceFieldTerms,
    dir: P,
    stem: &str,
) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    create_dir(dir)?;

    let harmonic = dir.join(format!("{stem}_harmonic.csv"));
    write_harmonic_terms(create_file(&harmonic)?, terms).map_err(|e| csv_error(&harmonic, e))?;

    let torsion = dir.join(format!("{stem}_torsion.csv"));
    write_torsion_terms(create_file(&torsion)?, terms).map_err(|e| csv_error(&torsion, e))?;

    Ok(vec![harmonic, torsion])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::heterograph::InteractionTuples;
    use nalgebra::DMatrix;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    fn bond_parameters(tuples: &[[usize; 2]], coefficients: &[f64]) -> KindParameters {
        let mut values = BTreeMap::new();
        values.insert(
            "coefficients".to_string(),
            DMatrix::from_row_slice(tuples.len(), 2, coefficients),
        );
        KindParameters::new(
            InteractionTuples::from_tuples(InteractionKind::Bond, tuples).unwrap(),
            values,
        )
    }

    #[test]
    fn write_kind_parameters_emits_header_and_rows() {
        let params = bond_parameters(&[[0, 1], [1, 2]], &[0.5, -1.0, 2.0, 3.0]);
        let mut buffer = Vec::new();
        write_kind_parameters(&mut buffer, &params).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "atom0,atom1,coefficients_0,coefficients_1",
                "0,1,0.5,-1",
                "1,2,2,3"
            ]
        );
    }

    #[test]
    fn write_kind_parameters_for_empty_kind_is_header_only() {
        let mut values = BTreeMap::new();
        values.insert("k".to_string(), DMatrix::<f64>::zeros(0, 6));
        let params = KindParameters::new(InteractionTuples::empty(InteractionKind::Proper), values);

        let mut buffer = Vec::new();
        write_kind_parameters(&mut buffer, &params).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("atom0,atom1,atom2,atom3,k_0"));
    }

    #[test]
    fn write_parameter_set_creates_one_file_per_kind() {
        let dir = tempdir().unwrap();
        let mut set = ParameterSet::new();
        set.insert(InteractionKind::Bond, bond_parameters(&[[0, 1]], &[1.0, 2.0]));

        let out = dir.path().join("nested");
        let paths = write_parameter_set(&set, &out, "co").unwrap();
        assert_eq!(paths, vec![out.join("co_bond.csv")]);
        let content = fs::read_to_string(&paths[0]).unwrap();
        assert!(content.contains("0,1,1,2"));
    }

    #[test]
    fn force_field_terms_are_written_in_two_tables() {
        let dir = tempdir().unwrap();
        let terms = ForceFieldTerms {
            bonds: vec![HarmonicTerm {
                atoms: vec![0, 1],
                k: 2.0,
                eq: 0.5,
            }],
            propers: vec![TorsionTerm {
                atoms: vec![0, 1, 2, 3],
                k: vec![1.0, 0.0],
            }],
            ..Default::default()
        };

        let paths = write_force_field_terms(&terms, dir.path(), "mol").unwrap();
        let harmonic = fs::read_to_string(&paths[0]).unwrap();
        let torsion = fs::read_to_string(&paths[1]).unwrap();

        assert_eq!(harmonic.lines().nth(1), Some("bond,0-1,2,0.5"));
        assert_eq!(
            torsion.lines().skip(1).collect::<Vec<_>>(),
            vec!["proper,0-1-2-3,1,1", "proper,0-1-2-3,2,0"]
        );
    }
}
