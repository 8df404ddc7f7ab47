use super::error::GraphError;
use nalgebra::DMatrix;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::slice::ChunksExact;
use std::str::FromStr;
use thiserror::Error;

/// The bonded interaction types a force field assigns parameters to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Bond,
    Angle,
    Proper,
    Improper,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::Bond,
        InteractionKind::Angle,
        InteractionKind::Proper,
        InteractionKind::Improper,
    ];

    /// Number of atoms in one tuple of this kind.
    pub fn arity(self) -> usize {
        match self {
            InteractionKind::Bond => 2,
            InteractionKind::Angle => 3,
            InteractionKind::Proper | InteractionKind::Improper => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InteractionKind::Bond => "bond",
            InteractionKind::Angle => "angle",
            InteractionKind::Proper => "proper",
            InteractionKind::Improper => "improper",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown interaction kind: '{0}'")]
pub struct ParseInteractionKindError(pub String);

impl FromStr for InteractionKind {
    type Err = ParseInteractionKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bond" | "bonds" => Ok(Self::Bond),
            "angle" | "angles" => Ok(Self::Angle),
            "proper" | "propers" | "torsion" => Ok(Self::Proper),
            "improper" | "impropers" => Ok(Self::Improper),
            _ => Err(ParseInteractionKindError(s.to_string())),
        }
    }
}

/// An ordered, immutable list of atom-index tuples of a single interaction kind.
///
/// Tuples are stored back to back in one flat buffer; tuple `t` occupies
/// `indices[t * arity..(t + 1) * arity]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionTuples {
    kind: InteractionKind,
    indices: Vec<usize>,
}

impl InteractionTuples {
    /// Wraps a flat index buffer, rejecting buffers that do not hold a whole
    /// number of tuples.
    pub fn new(kind: InteractionKind, indices: Vec<usize>) -> Result<Self, GraphError> {
        let arity = kind.arity();
        if indices.len() % arity != 0 {
            return Err(GraphError::MalformedTuples {
                kind,
                len: indices.len(),
                arity,
            });
        }
        Ok(Self { kind, indices })
    }

    /// Builds the list from fixed-size tuples. `N` must equal the kind's arity.
    pub fn from_tuples<const N: usize>(
        kind: InteractionKind,
        tuples: &[[usize; N]],
    ) -> Result<Self, GraphError> {
        if N != kind.arity() {
            return Err(GraphError::ArityMismatch {
                kind,
                expected: kind.arity(),
                found: N,
            });
        }
        Ok(Self {
            kind,
            indices: tuples.iter().flatten().copied().collect(),
        })
    }

    pub fn empty(kind: InteractionKind) -> Self {
        Self {
            kind,
            indices: Vec::new(),
        }
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    pub fn len(&self) -> usize {
        self.indices.len() / self.arity()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, tuple: usize) -> Option<&[usize]> {
        let arity = self.arity();
        self.indices.get(tuple * arity..(tuple + 1) * arity)
    }

    pub fn iter(&self) -> ChunksExact<'_, usize> {
        self.indices.chunks_exact(self.arity())
    }

    pub fn as_flat(&self) -> &[usize] {
        &self.indices
    }

    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct KindEntry {
    tuples: InteractionTuples,
    reference: BTreeMap<String, DMatrix<f64>>,
}

/// Interaction index store: for each interaction kind, its tuples and any
/// precomputed reference parameters aligned with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Heterograph {
    entries: BTreeMap<InteractionKind, KindEntry>,
}

impl Heterograph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the tuples of one kind, replacing any previous registration of
    /// that kind together with its reference parameters.
    pub fn with_tuples(mut self, tuples: InteractionTuples) -> Self {
        self.entries.insert(
            tuples.kind(),
            KindEntry {
                tuples,
                reference: BTreeMap::new(),
            },
        );
        self
    }

    /// Attaches a reference parameter array (one row per tuple) to a registered kind.
    pub fn with_reference(
        mut self,
        kind: InteractionKind,
        name: &str,
        values: DMatrix<f64>,
    ) -> Result<Self, GraphError> {
        let entry = self
            .entries
            .get_mut(&kind)
            .ok_or(GraphError::MissingKind(kind))?;
        if values.nrows() != entry.tuples.len() {
            return Err(GraphError::MisalignedReference {
                kind,
                name: name.to_string(),
                rows: values.nrows(),
                tuples: entry.tuples.len(),
            });
        }
        entry.reference.insert(name.to_string(), values);
        Ok(self)
    }

    pub fn tuples(&self, kind: InteractionKind) -> Option<&InteractionTuples> {
        self.entries.get(&kind).map(|e| &e.tuples)
    }

    pub fn reference(&self, kind: InteractionKind, name: &str) -> Option<&DMatrix<f64>> {
        self.entries.get(&kind).and_then(|e| e.reference.get(name))
    }

    /// Tuple count for a kind; kinds that were never registered count as empty.
    pub fn num_tuples(&self, kind: InteractionKind) -> usize {
        self.tuples(kind).map_or(0, InteractionTuples::len)
    }

    pub fn kinds(&self) -> impl Iterator<Item = InteractionKind> + '_ {
        self.entries.keys().copied()
    }
}
