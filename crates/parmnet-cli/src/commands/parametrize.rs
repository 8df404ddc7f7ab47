use crate::cli::ParametrizeArgs;
use crate::config::PartialModelConfig;
use crate::error::{CliError, Result};
use parmnet::core::forcefield::readout::ForceFieldTerms;
use parmnet::core::graph::Graph;
use parmnet::core::io::molecule::read_molecule;
use parmnet::core::io::parameters::{write_force_field_terms, write_parameter_set};
use parmnet::workflows::parametrize::Parametrization;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// File-name stem of the outputs of one input; falls back to its position.
fn output_stem(input: &Path, index: usize) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("molecule_{}", index + 1))
}

pub fn run(args: ParametrizeArgs) -> Result<Vec<PathBuf>> {
    let stems: Vec<String> = args
        .inputs
        .iter()
        .enumerate()
        .map(|(i, input)| output_stem(input, i))
        .collect();
    let mut seen = BTreeSet::new();
    if let Some(duplicate) = stems.iter().find(|stem| !seen.insert(stem.as_str())) {
        return Err(CliError::Argument(format!(
            "Several inputs would write outputs named '{}'",
            duplicate
        )));
    }

    let partial_config = match &args.config {
        Some(path) => PartialModelConfig::from_file(path)?,
        None => PartialModelConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;
    let model = Parametrization::new(&config);

    let mut graphs = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        info!("Loading molecule from {:?}", input);
        let molecule = read_molecule(input)?;
        graphs.push(Graph::from_molecule(&molecule)?);
    }

    println!("Parametrizing {} molecule(s)...", graphs.len());
    let results = model.parametrize_batch(&graphs);

    let mut written = Vec::new();
    for ((input, stem), result) in args.inputs.iter().zip(&stems).zip(results) {
        let parameters = result?;

        let paths = write_parameter_set(&parameters, &args.output, stem)?;
        info!(molecule = %stem, files = paths.len(), "Wrote parameter tables.");
        written.extend(paths);

        if args.readout {
            let terms = ForceFieldTerms::from_parameters(&parameters)?;
            written.extend(write_force_field_terms(&terms, &args.output, stem)?);
        }
        println!("  {} -> {}", input.display(), args.output.join(stem).display());
    }

    Ok(written)
}
