use crate::cli::InspectArgs;
use crate::error::Result;
use parmnet::core::graph::{Graph, InteractionKind};
use parmnet::core::io::molecule::read_molecule;
use parmnet::core::models::molecule::Molecule;
use std::fmt::Write;
use tracing::info;

/// Human-readable summary of the graph derived from a molecule.
pub fn describe(molecule: &Molecule, graph: &Graph) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Molecule '{}': {} atoms, {} bonds, {} directed edges",
        molecule.name,
        molecule.num_atoms(),
        molecule.bonds().len(),
        graph.homograph.num_edges()
    );
    for kind in InteractionKind::ALL {
        let _ = writeln!(
            out,
            "  {:<9} {}",
            kind.name(),
            graph.heterograph.num_tuples(kind)
        );
    }
    out
}

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Loading molecule from {:?}", &args.input);
    let molecule = read_molecule(&args.input)?;
    let graph = Graph::from_molecule(&molecule)?;
    print!("{}", describe(&molecule, &graph));
    Ok(())
}
