use crate::core::graph::homograph::Homograph;
use crate::core::nn::activation::{LEAKY_RELU_SLOPE, elu, leaky_relu};
use crate::core::nn::dense::Dense;
use crate::core::nn::error::NnError;
use crate::core::nn::segment::{concat_columns, gather_rows, segment_softmax, segment_sum};
use nalgebra::DMatrix;
use rand::Rng;

/// How the per-head aggregates of one round are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadCombine {
    /// Heads side by side, `hidden * heads` columns.
    Concat,
    /// Average over heads, `hidden` columns.
    Mean,
}

/// One round of multi-head graph attention.
///
/// Each edge `j -> i` scores `leaky_relu(W_a [q_j, q_i] + b_a)` with one
/// column per head; scores are normalized over the incoming edges of `i` and
/// used to weight the sender queries `q_j`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphAttentionLayer {
    query: Dense,
    attention: Dense,
    combine: HeadCombine,
}

impl GraphAttentionLayer {
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        hidden_features: usize,
        heads: usize,
        combine: HeadCombine,
        rng: &mut R,
    ) -> Self {
        Self {
            query: Dense::new(in_features, hidden_features, rng),
            attention: Dense::new(2 * hidden_features, heads, rng),
            combine,
        }
    }

    /// `attention` must map `2 * query.out_features()` columns to one logit
    /// per head, with at least one head.
    pub fn from_parts(
        query: Dense,
        attention: Dense,
        combine: HeadCombine,
    ) -> Result<Self, NnError> {
        if attention.out_features() == 0 {
            return Err(NnError::NoHeads);
        }
        if attention.in_features() != 2 * query.out_features() {
            return Err(NnError::InputWidth {
                expected: 2 * query.out_features(),
                found: attention.in_features(),
            });
        }
        Ok(Self {
            query,
            attention,
            combine,
        })
    }

    pub fn heads(&self) -> usize {
        self.attention.out_features()
    }

    pub fn in_features(&self) -> usize {
        self.query.in_features()
    }

    pub fn out_features(&self) -> usize {
        match self.combine {
            HeadCombine::Concat => self.query.out_features() * self.heads(),
            HeadCombine::Mean => self.query.out_features(),
        }
    }

    pub fn forward(
        &self,
        h: &DMatrix<f64>,
        senders: &[usize],
        receivers: &[usize],
    ) -> Result<DMatrix<f64>, NnError> {
        let num_atoms = h.nrows();
        let q = self.query.forward(h)?;
        let q_senders = gather_rows(&q, senders)?;
        let q_receivers = gather_rows(&q, receivers)?;

        let mut logits = self
            .attention
            .forward(&concat_columns(&[&q_senders, &q_receivers])?)?;
        logits.apply(|v| *v = leaky_relu(*v, LEAKY_RELU_SLOPE));
        let alpha = segment_softmax(&logits, receivers, num_atoms)?;

        let per_head = (0..self.heads())
            .map(|head| {
                let mut weighted = q_senders.clone();
                for (edge, mut row) in weighted.row_iter_mut().enumerate() {
                    row *= alpha[(edge, head)];
                }
                segment_sum(&weighted, receivers, num_atoms)
            })
            .collect::<Result<Vec<_>, NnError>>()?;

        let mut out = match self.combine {
            HeadCombine::Concat => concat_columns(&per_head.iter().collect::<Vec<_>>())?,
            HeadCombine::Mean => {
                let mut sum = DMatrix::<f64>::zeros(num_atoms, q.ncols());
                for head in &per_head {
                    sum += head;
                }
                sum / per_head.len() as f64
            }
        };
        out.apply(|v| *v = elu(*v));
        Ok(out)
    }
}

/// Stacked attention rounds: intermediate rounds concatenate heads, the last
/// one averages them so the output width equals the hidden width.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphAttention {
    layers: Vec<GraphAttentionLayer>,
}

impl GraphAttention {
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        hidden_features: usize,
        depth: usize,
        heads: usize,
        rng: &mut R,
    ) -> Self {
        let layers = (0..depth)
            .map(|idx| {
                let fan_in = if idx == 0 {
                    in_features
                } else {
                    hidden_features * heads
                };
                let combine = if idx + 1 == depth {
                    HeadCombine::Mean
                } else {
                    HeadCombine::Concat
                };
                GraphAttentionLayer::new(fan_in, hidden_features, heads, combine, rng)
            })
            .collect();
        Self { layers }
    }

    pub fn from_layers(layers: Vec<GraphAttentionLayer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[GraphAttentionLayer] {
        &self.layers
    }

    pub fn forward(&self, homograph: &Homograph) -> Result<DMatrix<f64>, NnError> {
        let mut h = homograph.features().clone();
        for layer in &self.layers {
            h = layer.forward(&h, homograph.senders(), homograph.receivers())?;
        }
        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn identity(width: usize) -> Dense {
        Dense::from_parts(DMatrix::identity(width, width), DVector::zeros(width)).unwrap()
    }

    // Constant logits give uniform attention, so each atom receives the plain
    // mean of its neighbours' queries.
    fn uniform_layer(width: usize, heads: usize, combine: HeadCombine) -> GraphAttentionLayer {
        let attention =
            Dense::from_parts(DMatrix::zeros(2 * width, heads), DVector::zeros(heads)).unwrap();
        GraphAttentionLayer::from_parts(identity(width), attention, combine).unwrap()
    }

    #[test]
    fn uniform_attention_averages_neighbours() {
        let features = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 6.0]);
        let graph = Homograph::from_pairs(features, &[(0, 1), (0, 2)]).unwrap();
        let model = GraphAttention::from_layers(vec![uniform_layer(1, 2, HeadCombine::Mean)]);

        let h = model.forward(&graph).unwrap();
        let expected = [4.0, 1.0, 1.0];
        for (i, e) in expected.iter().enumerate() {
            assert!((h[(i, 0)] - e).abs() < 1e-9);
        }
    }

    #[test]
    fn concat_combine_repeats_heads_side_by_side() {
        let features = DMatrix::from_row_slice(2, 1, &[-1.0, 3.0]);
        let graph = Homograph::from_pairs(features, &[(0, 1)]).unwrap();
        let layer = uniform_layer(1, 3, HeadCombine::Concat);
        assert_eq!(layer.out_features(), 3);

        let h = layer
            .forward(graph.features(), graph.senders(), graph.receivers())
            .unwrap();
        assert_eq!(h.shape(), (2, 3));
        for c in 0..3 {
            assert!((h[(0, c)] - 3.0).abs() < 1e-9);
            assert!((h[(1, c)] - elu(-1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn isolated_atom_gets_zero_aggregate() {
        let graph = Homograph::from_pairs(DMatrix::from_element(1, 1, 5.0), &[]).unwrap();
        let model = GraphAttention::from_layers(vec![uniform_layer(1, 4, HeadCombine::Mean)]);
        let h = model.forward(&graph).unwrap();
        assert_eq!(h, DMatrix::zeros(1, 1));
    }

    #[test]
    fn stacked_layers_widen_then_average() {
        let mut rng = StdRng::seed_from_u64(3);
        let model = GraphAttention::new(6, 4, 3, 2, &mut rng);
        let widths: Vec<(usize, usize)> = model
            .layers()
            .iter()
            .map(|l| (l.in_features(), l.out_features()))
            .collect();
        assert_eq!(widths, vec![(6, 8), (8, 8), (8, 4)]);

        let graph =
            Homograph::from_pairs(DMatrix::from_element(3, 6, 0.5), &[(0, 1), (1, 2)]).unwrap();
        let h = model.forward(&graph).unwrap();
        assert_eq!(h.shape(), (3, 4));
        assert!(h.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn from_parts_rejects_headless_or_misshaped_attention() {
        let headless = Dense::from_parts(DMatrix::zeros(4, 0), DVector::zeros(0)).unwrap();
        assert_eq!(
            GraphAttentionLayer::from_parts(identity(2), headless, HeadCombine::Mean).unwrap_err(),
            NnError::NoHeads
        );

        let narrow = Dense::from_parts(DMatrix::zeros(3, 2), DVector::zeros(2)).unwrap();
        assert_eq!(
            GraphAttentionLayer::from_parts(identity(2), narrow, HeadCombine::Mean).unwrap_err(),
            NnError::InputWidth {
                expected: 4,
                found: 3
            }
        );
    }
}
