use crate::core::graph::homograph::Homograph;
use crate::core::nn::activation::relu;
use crate::core::nn::dense::Dense;
use crate::core::nn::error::NnError;
use crate::core::nn::segment::{concat_columns, gather_rows, segment_mean};
use nalgebra::DMatrix;
use rand::Rng;

/// One round of mean aggregation: `relu(W [mean_{j -> i} h_j, h_i] + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSageLayer {
    dense: Dense,
}

impl GraphSageLayer {
    pub fn new<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        Self {
            dense: Dense::new(2 * in_features, out_features, rng),
        }
    }

    /// Wraps an existing affine map; it must accept `2 * in_features` columns.
    pub fn from_dense(dense: Dense) -> Self {
        Self { dense }
    }

    pub fn in_features(&self) -> usize {
        self.dense.in_features() / 2
    }

    pub fn out_features(&self) -> usize {
        self.dense.out_features()
    }

    pub fn forward(
        &self,
        h: &DMatrix<f64>,
        senders: &[usize],
        receivers: &[usize],
    ) -> Result<DMatrix<f64>, NnError> {
        let messages = gather_rows(h, senders)?;
        let aggregate = segment_mean(&messages, receivers, h.nrows())?;
        let mut out = self.dense.forward(&concat_columns(&[&aggregate, h])?)?;
        out.apply(|v| *v = relu(*v));
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphSage {
    layers: Vec<GraphSageLayer>,
}

impl GraphSage {
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        hidden_features: usize,
        depth: usize,
        rng: &mut R,
    ) -> Self {
        let layers = (0..depth)
            .map(|idx| {
                let fan_in = if idx == 0 { in_features } else { hidden_features };
                GraphSageLayer::new(fan_in, hidden_features, rng)
            })
            .collect();
        Self { layers }
    }

    pub fn from_layers(layers: Vec<GraphSageLayer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[GraphSageLayer] {
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

    fn identity_layer(width: usize) -> GraphSageLayer {
        // Output = aggregate + self.
        let mut weight = DMatrix::<f64>::zeros(2 * width, width);
        for i in 0..width {
            weight[(i, i)] = 1.0;
            weight[(width + i, i)] = 1.0;
        }
        GraphSageLayer::from_dense(Dense::from_parts(weight, DVector::zeros(width)).unwrap())
    }

    #[test]
    fn layer_adds_neighbour_mean_to_self() {
        let features = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 6.0]);
        let graph = Homograph::from_pairs(features, &[(0, 1), (0, 2)]).unwrap();
        let model = GraphSage::from_layers(vec![identity_layer(1)]);

        let h = model.forward(&graph).unwrap();
        // Atom 0 sees mean(2, 6) = 4; atoms 1 and 2 see atom 0.
        assert_eq!(h, DMatrix::from_row_slice(3, 1, &[5.0, 3.0, 7.0]));
    }

    #[test]
    fn isolated_atom_aggregates_zero() {
        let features = DMatrix::from_row_slice(2, 1, &[3.0, -4.0]);
        let graph = Homograph::from_pairs(features, &[]).unwrap();
        let model = GraphSage::from_layers(vec![identity_layer(1)]);

        // relu(0 + 3) and relu(0 - 4).
        let h = model.forward(&graph).unwrap();
        assert_eq!(h, DMatrix::from_row_slice(2, 1, &[3.0, 0.0]));
    }

    #[test]
    fn stacked_layers_produce_hidden_width() {
        let mut rng = StdRng::seed_from_u64(7);
        let model = GraphSage::new(5, 8, 3, &mut rng);
        assert_eq!(model.layers().len(), 3);
        assert_eq!(model.layers()[0].in_features(), 5);
        assert_eq!(model.layers()[2].in_features(), 8);

        let graph = Homograph::from_pairs(DMatrix::zeros(4, 5), &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let h = model.forward(&graph).unwrap();
        assert_eq!(h.shape(), (4, 8));
        assert!(h.iter().all(|v| *v >= 0.0));
    }
}
