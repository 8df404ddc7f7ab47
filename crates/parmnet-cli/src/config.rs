use crate::cli::{ParametrizeArgs, RepresentationChoice};
use crate::error::{CliError, Result};
use clap::ValueEnum;
use parmnet::core::graph::builder::ATOM_FEATURES;
use parmnet::core::nn::activation::Activation;
use parmnet::engine::config::{
    self as core_config, DEFAULT_ATTENTION_HEADS, ModelConfigBuilder, ParameterSchema,
    RepresentationKind,
};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_HIDDEN_FEATURES: usize = 128;
pub const DEFAULT_DEPTH: usize = 3;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRepresentationConfig {
    kind: Option<RepresentationChoice>,
    #[serde(rename = "hidden-features")]
    hidden_features: Option<usize>,
    depth: Option<usize>,
    heads: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPoolingConfig {
    #[serde(rename = "hidden-features")]
    hidden_features: Option<usize>,
    depth: Option<usize>,
    activation: Option<Activation>,
}

/// Model configuration as written in a TOML file; every field is optional.
///
/// ```toml
/// seed = 7
///
/// [representation]
/// kind = "attention"
/// hidden-features = 64
/// depth = 3
/// heads = 4
///
/// [pooling]
/// hidden-features = 64
/// depth = 2
/// activation = "elu"
///
/// [schema.bond]
/// coefficients = 2
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialModelConfig {
    seed: Option<u64>,
    representation: Option<PartialRepresentationConfig>,
    pooling: Option<PartialPoolingConfig>,
    schema: Option<ParameterSchema>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", what, key, value)))
}

impl PartialModelConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves the final model configuration. Precedence, highest first:
    /// `--set` values, dedicated CLI flags, the config file, built-in defaults.
    pub fn merge_with_cli(mut self, args: &ParametrizeArgs) -> Result<core_config::ModelConfig> {
        self.apply_set_values(&args.set_values)?;

        let repr = self.representation.take().unwrap_or_default();
        let pooling = self.pooling.take().unwrap_or_default();

        let choice = args
            .representation
            .or(repr.kind)
            .unwrap_or(RepresentationChoice::Sage);
        let kind = match choice {
            RepresentationChoice::Sage => {
                if args.heads.is_some() || repr.heads.is_some() {
                    debug!("Ignoring attention heads for the mean-aggregation representation.");
                }
                RepresentationKind::GraphSage
            }
            RepresentationChoice::Attention => RepresentationKind::GraphAttention {
                heads: args.heads.or(repr.heads).unwrap_or(DEFAULT_ATTENTION_HEADS),
            },
        };

        let hidden_features = args
            .hidden
            .or(repr.hidden_features)
            .unwrap_or(DEFAULT_HIDDEN_FEATURES);
        let depth = args.depth.or(repr.depth).unwrap_or(DEFAULT_DEPTH);

        let mut builder = ModelConfigBuilder::new()
            .representation(kind)
            .in_features(ATOM_FEATURES)
            .hidden_features(hidden_features)
            .depth(depth)
            .seed(args.seed.or(self.seed).unwrap_or(0));

        if let Some(n) = pooling.hidden_features {
            builder = builder.pooling_hidden_features(n);
        }
        if let Some(n) = pooling.depth {
            builder = builder.pooling_depth(n);
        }
        if let Some(activation) = pooling.activation {
            builder = builder.activation(activation);
        }
        if let Some(schema) = self.schema.take() {
            builder = builder.schema(schema);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "seed" => {
                    self.seed = Some(parse_value(key, value_str, "integer")?);
                }
                "representation.kind" => {
                    let choice = <RepresentationChoice as ValueEnum>::from_str(value_str, true).map_err(|_| {
                        CliError::Config(format!(
                            "Invalid representation for {}: {}",
                            key, value_str
                        ))
                    })?;
                    self.representation
                        .get_or_insert_with(Default::default)
                        .kind = Some(choice);
                }
                "representation.hidden-features" => {
                    self.representation
                        .get_or_insert_with(Default::default)
                        .hidden_features = Some(parse_value(key, value_str, "integer")?);
                }
                "representation.depth" => {
                    self.representation
                        .get_or_insert_with(Default::default)
                        .depth = Some(parse_value(key, value_str, "integer")?);
                }
                "representation.heads" => {
                    self.representation
                        .get_or_insert_with(Default::default)
                        .heads = Some(parse_value(key, value_str, "integer")?);
                }
                "pooling.hidden-features" => {
                    self.pooling
                        .get_or_insert_with(Default::default)
                        .hidden_features = Some(parse_value(key, value_str, "integer")?);
                }
                "pooling.depth" => {
                    self.pooling.get_or_insert_with(Default::default).depth =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "pooling.activation" => {
                    let activation: Activation = toml::Value::String(value_str.to_string())
                        .try_into()
                        .map_err(|_| {
                            CliError::Config(format!(
                                "Invalid activation for {}: {}",
                                key, value_str
                            ))
                        })?;
                    self.pooling.get_or_insert_with(Default::default).activation =
                        Some(activation);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
