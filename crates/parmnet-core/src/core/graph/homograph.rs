use super::error::GraphError;
use nalgebra::DMatrix;
use std::collections::HashMap;

/// Atom features plus the directed bonded edges used for message passing.
///
/// Edges always come in symmetric pairs: if `i -> j` is present, so is `j -> i`,
/// with the same multiplicity.
#[derive(Debug, Clone, PartialEq)]
pub struct Homograph {
    features: DMatrix<f64>,
    senders: Vec<usize>,
    receivers: Vec<usize>,
}

impl Homograph {
    /// Builds a homograph from an explicit edge list, validating index range and
    /// edge symmetry.
    pub fn new(
        features: DMatrix<f64>,
        senders: Vec<usize>,
        receivers: Vec<usize>,
    ) -> Result<Self, GraphError> {
        if senders.len() != receivers.len() {
            return Err(GraphError::EdgeListLength {
                senders: senders.len(),
                receivers: receivers.len(),
            });
        }

        let num_atoms = features.nrows();
        let mut multiplicity: HashMap<(usize, usize), isize> = HashMap::new();
        for (edge, (&s, &r)) in senders.iter().zip(&receivers).enumerate() {
            for atom in [s, r] {
                if atom >= num_atoms {
                    return Err(GraphError::EdgeOutOfRange {
                        edge,
                        atom,
                        num_atoms,
                    });
                }
            }
            *multiplicity.entry((s, r)).or_default() += 1;
        }
        for (&(s, r), &count) in &multiplicity {
            if multiplicity.get(&(r, s)).copied().unwrap_or(0) != count {
                return Err(GraphError::AsymmetricEdge {
                    sender: s,
                    receiver: r,
                });
            }
        }

        Ok(Self {
            features,
            senders,
            receivers,
        })
    }

    /// Builds a homograph from undirected atom pairs, emitting both directions
    /// of every pair.
    pub fn from_pairs(features: DMatrix<f64>, pairs: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut senders = Vec::with_capacity(pairs.len() * 2);
        let mut receivers = Vec::with_capacity(pairs.len() * 2);
        for &(a, b) in pairs {
            senders.extend([a, b]);
            receivers.extend([b, a]);
        }
        Self::new(features, senders, receivers)
    }

    pub fn features(&self) -> &DMatrix<f64> {
        &self.features
    }

    pub fn senders(&self) -> &[usize] {
        &self.senders
    }

    pub fn receivers(&self) -> &[usize] {
        &self.receivers
    }

    pub fn num_atoms(&self) -> usize {
        self.features.nrows()
    }

    pub fn num_edges(&self) -> usize {
        self.senders.len()
    }

    pub fn feature_width(&self) -> usize {
        self.features.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, 2, |i, j| (i * 2 + j) as f64)
    }

    #[test]
    fn from_pairs_emits_both_directions() {
        let graph = Homograph::from_pairs(features(3), &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(graph.num_atoms(), 3);
        assert_eq!(graph.num_edges(), 4);
        assert_eq!(graph.senders(), &[0, 1, 1, 2]);
        assert_eq!(graph.receivers(), &[1, 0, 2, 1]);
        assert_eq!(graph.feature_width(), 2);
    }

    #[test]
    fn new_rejects_one_directional_edges() {
        let result = Homograph::new(features(2), vec![0], vec![1]);
        assert_eq!(
            result.unwrap_err(),
            GraphError::AsymmetricEdge {
                sender: 0,
                receiver: 1
            }
        );
    }

    #[test]
    fn new_rejects_unbalanced_multiplicity() {
        let result = Homograph::new(features(2), vec![0, 0, 1], vec![1, 1, 0]);
        assert!(matches!(result, Err(GraphError::AsymmetricEdge { .. })));
    }

    #[test]
    fn new_rejects_out_of_range_edges() {
        let result = Homograph::from_pairs(features(2), &[(0, 2)]);
        assert_eq!(
            result.unwrap_err(),
            GraphError::EdgeOutOfRange {
                edge: 0,
                atom: 2,
                num_atoms: 2
            }
        );
    }

    #[test]
    fn new_rejects_mismatched_edge_lists() {
        let result = Homograph::new(features(2), vec![0, 1], vec![1]);
        assert!(matches!(result, Err(GraphError::EdgeListLength { .. })));
    }

    #[test]
    fn isolated_atoms_are_allowed() {
        let graph = Homograph::new(features(1), vec![], vec![]).unwrap();
        assert_eq!(graph.num_atoms(), 1);
        assert_eq!(graph.num_edges(), 0);
    }
}
