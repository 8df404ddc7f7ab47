//! Node representation: per-atom embeddings from the bonded graph.

pub mod attention;
pub mod sage;

use super::config::{RepresentationConfig, RepresentationKind};
use super::error::ParametrizationError;
use crate::core::graph::homograph::Homograph;
use attention::GraphAttention;
use nalgebra::DMatrix;
use rand::Rng;
use sage::GraphSage;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub enum Representation {
    GraphSage(GraphSage),
    GraphAttention(GraphAttention),
}

impl Representation {
    pub fn new<R: Rng + ?Sized>(config: &RepresentationConfig, rng: &mut R) -> Self {
        match config.kind {
            RepresentationKind::GraphSage => Representation::GraphSage(GraphSage::new(
                config.in_features,
                config.hidden_features,
                config.depth,
                rng,
            )),
            RepresentationKind::GraphAttention { heads } => {
                Representation::GraphAttention(GraphAttention::new(
                    config.in_features,
                    config.hidden_features,
                    config.depth,
                    heads,
                    rng,
                ))
            }
        }
    }

    /// Expected atom feature width.
    pub fn in_features(&self) -> usize {
        let first = match self {
            Representation::GraphSage(model) => model.layers().first().map(|l| l.in_features()),
            Representation::GraphAttention(model) => {
                model.layers().first().map(|l| l.in_features())
            }
        };
        first.unwrap_or(0)
    }

    /// Embedding width `D`.
    pub fn out_features(&self) -> usize {
        let last = match self {
            Representation::GraphSage(model) => model.layers().last().map(|l| l.out_features()),
            Representation::GraphAttention(model) => {
                model.layers().last().map(|l| l.out_features())
            }
        };
        last.unwrap_or_else(|| self.in_features())
    }

    /// Embeds every atom of the homograph, one `[N, D]` row per atom.
    #[instrument(skip_all, name = "represent")]
    pub fn represent(&self, homograph: &Homograph) -> Result<DMatrix<f64>, ParametrizationError> {
        if homograph.feature_width() != self.in_features() {
            return Err(ParametrizationError::FeatureWidth {
                expected: self.in_features(),
                found: homograph.feature_width(),
            });
        }
        let embeddings = match self {
            Representation::GraphSage(model) => model.forward(homograph)?,
            Representation::GraphAttention(model) => model.forward(homograph)?,
        };
        debug!(
            num_atoms = homograph.num_atoms(),
            num_edges = homograph.num_edges(),
            width = embeddings.ncols(),
            "Computed atom embeddings."
        );
        Ok(embeddings)
    }
}
