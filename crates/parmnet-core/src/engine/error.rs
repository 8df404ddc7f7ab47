use crate::core::graph::error::GraphError;
use crate::core::graph::heterograph::InteractionKind;
use crate::core::nn::error::NnError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParametrizationError {
    #[error("Interaction kind '{0}' has tuples but no entry in the parameter schema")]
    SchemaMismatch(InteractionKind),

    #[error("Tuple {tuple} of '{kind}' references atom {atom}, but the graph has {num_atoms} atoms")]
    AtomOutOfRange {
        kind: InteractionKind,
        tuple: usize,
        atom: usize,
        num_atoms: usize,
    },

    #[error("Atom features have {found} columns, the model expects {expected}")]
    FeatureWidth { expected: usize, found: usize },

    #[error("Embeddings have {found} columns, the pooling module expects {expected}")]
    EmbeddingWidth { expected: usize, found: usize },

    #[error("Pooling module for '{found}' is registered under '{key}'")]
    KindMismatch {
        key: InteractionKind,
        found: InteractionKind,
    },

    #[error("A '{kind}' pooling layer takes {found} columns, but its input has {expected}")]
    PoolingWidth {
        kind: InteractionKind,
        expected: usize,
        found: usize,
    },

    #[error("Invalid graph: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error("Numeric failure: {source}")]
    Numeric {
        #[from]
        source: NnError,
    },
}
