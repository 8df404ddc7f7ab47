use crate::core::graph::Graph;
use crate::core::models::parameters::ParameterSet;
use crate::engine::config::ModelConfig;
use crate::engine::error::ParametrizationError;
use crate::engine::janossy::JanossyPooling;
use crate::engine::representation::Representation;
use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A complete parametrization model: node representation followed by Janossy
/// pooling. Weights are fixed at construction; calls share nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct Parametrization {
    representation: Representation,
    pooling: JanossyPooling,
}

impl Parametrization {
    /// Initializes every weight from `config.seed`: the same configuration
    /// always yields the same model.
    pub fn new(config: &ModelConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let representation = Representation::new(&config.representation, &mut rng);
        let pooling = JanossyPooling::new(representation.out_features(), &config.pooling, &mut rng);
        Self {
            representation,
            pooling,
        }
    }

    /// Combines separately built modules; the embedding widths must agree.
    pub fn from_parts(
        representation: Representation,
        pooling: JanossyPooling,
    ) -> Result<Self, ParametrizationError> {
        if representation.out_features() != pooling.embedding_features() {
            return Err(ParametrizationError::EmbeddingWidth {
                expected: pooling.embedding_features(),
                found: representation.out_features(),
            });
        }
        Ok(Self {
            representation,
            pooling,
        })
    }

    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    pub fn pooling(&self) -> &JanossyPooling {
        &self.pooling
    }

    /// Atom embeddings only, without pooling.
    pub fn embed(&self, graph: &Graph) -> Result<DMatrix<f64>, ParametrizationError> {
        self.representation.represent(&graph.homograph)
    }

    #[instrument(skip_all, name = "parametrize")]
    pub fn parametrize(&self, graph: &Graph) -> Result<ParameterSet, ParametrizationError> {
        let embeddings = self.representation.represent(&graph.homograph)?;
        self.pooling.pool(&graph.heterograph, &embeddings)
    }

    /// Parametrizes independent graphs; results keep the input order.
    #[instrument(skip_all, name = "parametrize_batch")]
    pub fn parametrize_batch(
        &self,
        graphs: &[Graph],
    ) -> Vec<Result<ParameterSet, ParametrizationError>> {
        info!(molecules = graphs.len(), "Parametrizing batch.");

        #[cfg(not(feature = "parallel"))]
        let iterator = graphs.iter();

        #[cfg(feature = "parallel")]
        let iterator = graphs.par_iter();

        iterator.map(|graph| self.parametrize(graph)).collect()
    }
}
