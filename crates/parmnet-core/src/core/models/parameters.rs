use crate::core::graph::heterograph::{InteractionKind, InteractionTuples};
use nalgebra::DMatrix;
use std::collections::BTreeMap;
use std::ops::Index;

/// Predicted parameters of one interaction kind.
///
/// Every array has one row per tuple, in the order of [`tuples`](Self::tuples).
/// A kind with no tuples holds `[0, dim]` arrays for every parameter name.
#[derive(Debug, Clone, PartialEq)]
pub struct KindParameters {
    tuples: InteractionTuples,
    values: BTreeMap<String, DMatrix<f64>>,
}

impl KindParameters {
    pub(crate) fn new(tuples: InteractionTuples, values: BTreeMap<String, DMatrix<f64>>) -> Self {
        debug_assert!(values.values().all(|v| v.nrows() == tuples.len()));
        Self { tuples, values }
    }

    pub fn tuples(&self) -> &InteractionTuples {
        &self.tuples
    }

    pub fn get(&self, name: &str) -> Option<&DMatrix<f64>> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DMatrix<f64>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tuples, which is also the row count of every parameter array.
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

impl Index<&str> for KindParameters {
    type Output = DMatrix<f64>;

    fn index(&self, name: &str) -> &Self::Output {
        self.values
            .get(name)
            .unwrap_or_else(|| panic!("no parameter named '{name}'"))
    }
}

/// Parameters for every interaction kind in the schema, built fresh by each
/// pooling call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    kinds: BTreeMap<InteractionKind, KindParameters>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, kind: InteractionKind, parameters: KindParameters) {
        self.kinds.insert(kind, parameters);
    }

    pub fn get(&self, kind: InteractionKind) -> Option<&KindParameters> {
        self.kinds.get(&kind)
    }

    pub fn value(&self, kind: InteractionKind, name: &str) -> Option<&DMatrix<f64>> {
        self.kinds.get(&kind).and_then(|p| p.get(name))
    }

    pub fn kinds(&self) -> impl Iterator<Item = InteractionKind> + '_ {
        self.kinds.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InteractionKind, &KindParameters)> {
        self.kinds.iter().map(|(k, v)| (*k, v))
    }
}

impl Index<InteractionKind> for ParameterSet {
    type Output = KindParameters;

    fn index(&self, kind: InteractionKind) -> &Self::Output {
        self.kinds
            .get(&kind)
            .unwrap_or_else(|| panic!("no parameters for interaction kind '{kind}'"))
    }
}
