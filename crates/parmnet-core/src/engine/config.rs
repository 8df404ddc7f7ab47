use crate::core::graph::heterograph::InteractionKind;
use crate::core::nn::activation::Activation;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_ATTENTION_HEADS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
    #[error("Parameter schema declares no interaction kinds")]
    EmptySchema,
    #[error("Parameter schema declares no parameters for '{0}'")]
    EmptyKind(InteractionKind),
    #[error("Parameter '{name}' of '{kind}' has zero dimension")]
    ZeroDimension { kind: InteractionKind, name: String },
}

/// Names and widths of the parameters predicted for each interaction kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ParameterSchema {
    kinds: BTreeMap<InteractionKind, BTreeMap<String, usize>>,
}

impl Default for ParameterSchema {
    /// Bond and angle mixture coefficients (2 each) and six torsion force
    /// constants for propers and impropers.
    fn default() -> Self {
        Self::empty()
            .with(InteractionKind::Bond, "coefficients", 2)
            .with(InteractionKind::Angle, "coefficients", 2)
            .with(InteractionKind::Proper, "k", 6)
            .with(InteractionKind::Improper, "k", 6)
    }
}

impl ParameterSchema {
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    pub fn with(mut self, kind: InteractionKind, name: &str, dim: usize) -> Self {
        self.kinds
            .entry(kind)
            .or_default()
            .insert(name.to_string(), dim);
        self
    }

    /// Drops a kind entirely; tuples of that kind are then rejected by pooling.
    pub fn without(mut self, kind: InteractionKind) -> Self {
        self.kinds.remove(&kind);
        self
    }

    pub fn get(&self, kind: InteractionKind) -> Option<&BTreeMap<String, usize>> {
        self.kinds.get(&kind)
    }

    pub fn contains(&self, kind: InteractionKind) -> bool {
        self.kinds.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InteractionKind, &BTreeMap<String, usize>)> {
        self.kinds.iter().map(|(k, v)| (*k, v))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kinds.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        for (&kind, parameters) in &self.kinds {
            if parameters.is_empty() {
                return Err(ConfigError::EmptyKind(kind));
            }
            if let Some((name, _)) = parameters.iter().find(|(_, dim)| **dim == 0) {
                return Err(ConfigError::ZeroDimension {
                    kind,
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationKind {
    /// Mean aggregation over neighbours.
    GraphSage,
    /// Multi-head attention over neighbours.
    GraphAttention { heads: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepresentationConfig {
    pub kind: RepresentationKind,
    pub in_features: usize,
    pub hidden_features: usize,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolingConfig {
    pub hidden_features: usize,
    pub depth: usize,
    pub activation: Activation,
    pub schema: ParameterSchema,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub representation: RepresentationConfig,
    pub pooling: PoolingConfig,
    pub seed: u64,
}

/// Builds a [`ModelConfig`].
///
/// `in_features`, `hidden_features` and `depth` are required. The pooling
/// stack reuses the representation width and depth unless set separately;
/// the representation defaults to GraphSAGE, the schema to
/// [`ParameterSchema::default`] and the seed to zero.
#[derive(Default)]
pub struct ModelConfigBuilder {
    representation: Option<RepresentationKind>,
    in_features: Option<usize>,
    hidden_features: Option<usize>,
    depth: Option<usize>,
    pooling_hidden_features: Option<usize>,
    pooling_depth: Option<usize>,
    activation: Option<Activation>,
    schema: Option<ParameterSchema>,
    seed: Option<u64>,
}

impl ModelConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn representation(mut self, kind: RepresentationKind) -> Self {
        self.representation = Some(kind);
        self
    }
    pub fn in_features(mut self, n: usize) -> Self {
        self.in_features = Some(n);
        self
    }
    pub fn hidden_features(mut self, n: usize) -> Self {
        self.hidden_features = Some(n);
        self
    }
    pub fn depth(mut self, n: usize) -> Self {
        self.depth = Some(n);
        self
    }
    pub fn pooling_hidden_features(mut self, n: usize) -> Self {
        self.pooling_hidden_features = Some(n);
        self
    }
    pub fn pooling_depth(mut self, n: usize) -> Self {
        self.pooling_depth = Some(n);
        self
    }
    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }
    pub fn schema(mut self, schema: ParameterSchema) -> Self {
        self.schema = Some(schema);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<ModelConfig, ConfigError> {
        let in_features = positive(
            "in_features",
            self.in_features
                .ok_or(ConfigError::MissingParameter("in_features"))?,
        )?;
        let hidden_features = positive(
            "hidden_features",
            self.hidden_features
                .ok_or(ConfigError::MissingParameter("hidden_features"))?,
        )?;
        let depth = positive(
            "depth",
            self.depth.ok_or(ConfigError::MissingParameter("depth"))?,
        )?;

        let kind = self.representation.unwrap_or(RepresentationKind::GraphSage);
        if let RepresentationKind::GraphAttention { heads } = kind {
            positive("heads", heads)?;
        }

        let schema = self.schema.unwrap_or_default();
        schema.validate()?;

        Ok(ModelConfig {
            representation: RepresentationConfig {
                kind,
                in_features,
                hidden_features,
                depth,
            },
            pooling: PoolingConfig {
                hidden_features: positive(
                    "pooling_hidden_features",
                    self.pooling_hidden_features.unwrap_or(hidden_features),
                )?,
                depth: positive("pooling_depth", self.pooling_depth.unwrap_or(depth))?,
                activation: self.activation.unwrap_or_default(),
                schema,
            },
            seed: self.seed.unwrap_or(0),
        })
    }
}

fn positive(parameter: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            parameter,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}
