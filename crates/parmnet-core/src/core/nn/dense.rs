use super::activation::Activation;
use super::error::NnError;
use nalgebra::{DMatrix, DVector};
use rand::Rng;

/// An affine layer `y = x W + b` applied to every row of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    weight: DMatrix<f64>, // in_features x out_features
    bias: DVector<f64>,   // out_features
}

impl Dense {
    /// Creates a layer with LeCun-uniform weights and a zero bias.
    pub fn new<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        Self::with_bias(in_features, out_features, 0.0, rng)
    }

    /// Creates a layer with LeCun-uniform weights and every bias entry set to `bias`.
    pub fn with_bias<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        bias: f64,
        rng: &mut R,
    ) -> Self {
        let limit = (3.0 / in_features.max(1) as f64).sqrt();
        let weight =
            DMatrix::from_fn(in_features, out_features, |_, _| rng.gen_range(-limit..=limit));
        Self {
            weight,
            bias: DVector::from_element(out_features, bias),
        }
    }

    /// Assembles a layer from externally owned weights.
    pub fn from_parts(weight: DMatrix<f64>, bias: DVector<f64>) -> Result<Self, NnError> {
        if weight.ncols() != bias.len() {
            return Err(NnError::BiasLength {
                rows: weight.nrows(),
                cols: weight.ncols(),
                bias: bias.len(),
            });
        }
        Ok(Self { weight, bias })
    }

    pub fn in_features(&self) -> usize {
        self.weight.nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weight.ncols()
    }

    pub fn weight(&self) -> &DMatrix<f64> {
        &self.weight
    }

    pub fn bias(&self) -> &DVector<f64> {
        &self.bias
    }

    pub fn forward(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>, NnError> {
        if x.ncols() != self.in_features() {
            return Err(NnError::InputWidth {
                expected: self.in_features(),
                found: x.ncols(),
            });
        }
        let mut out = x * &self.weight;
        for (j, mut column) in out.column_iter_mut().enumerate() {
            column.add_scalar_mut(self.bias[j]);
        }
        Ok(out)
    }
}

/// A stack of `Dense` layers, each followed by the same activation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedForward {
    layers: Vec<Dense>,
    activation: Activation,
}

impl FeedForward {
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        hidden_features: usize,
        depth: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let layers = (0..depth)
            .map(|idx| {
                let fan_in = if idx == 0 { in_features } else { hidden_features };
                Dense::new(fan_in, hidden_features, rng)
            })
            .collect();
        Self { layers, activation }
    }

    pub fn from_layers(layers: Vec<Dense>, activation: Activation) -> Self {
        Self { layers, activation }
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Width of the output rows; an empty stack passes its input through.
    pub fn out_features(&self, in_features: usize) -> usize {
        self.layers.last().map_or(in_features, Dense::out_features)
    }

    pub fn forward(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>, NnError> {
        let mut h = x.clone();
        for layer in &self.layers {
            h = layer.forward(&h)?;
            let activation = self.activation;
            h.apply(|v| *v = activation.apply(*v));
        }
        Ok(h)
    }
}
