use super::heterograph::InteractionKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Edge list length mismatch: {senders} senders but {receivers} receivers")]
    EdgeListLength { senders: usize, receivers: usize },
    #[error("Edge {edge} references atom {atom}, but the graph has only {num_atoms} atoms")]
    EdgeOutOfRange {
        edge: usize,
        atom: usize,
        num_atoms: usize,
    },
    #[error("Edge {sender} -> {receiver} has no matching reverse edge")]
    AsymmetricEdge { sender: usize, receiver: usize },
    #[error(
        "Index buffer of length {len} for '{kind}' is not a whole number of {arity}-atom tuples"
    )]
    MalformedTuples {
        kind: InteractionKind,
        len: usize,
        arity: usize,
    },
    #[error("'{kind}' tuples have {expected} atoms, but {found}-atom tuples were supplied")]
    ArityMismatch {
        kind: InteractionKind,
        expected: usize,
        found: usize,
    },
    #[error("Reference parameter '{name}' for '{kind}' has {rows} rows, expected {tuples}")]
    MisalignedReference {
        kind: InteractionKind,
        name: String,
        rows: usize,
        tuples: usize,
    },
    #[error("No '{0}' tuples are registered in the heterograph")]
    MissingKind(InteractionKind),
}
