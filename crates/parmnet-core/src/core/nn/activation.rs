use serde::Deserialize;

/// Slope used by the attention logits for negative inputs.
pub const LEAKY_RELU_SLOPE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activation {
    Relu,
    #[default]
    Elu,
    LeakyRelu,
    Identity,
}

impl Activation {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => relu(x),
            Activation::Elu => elu(x),
            Activation::LeakyRelu => leaky_relu(x, LEAKY_RELU_SLOPE),
            Activation::Identity => x,
        }
    }
}

#[inline]
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

#[inline]
pub fn elu(x: f64) -> f64 {
    if x > 0.0 { x } else { x.exp_m1() }
}

#[inline]
pub fn leaky_relu(x: f64, negative_slope: f64) -> f64 {
    if x >= 0.0 { x } else { negative_slope * x }
}

/// `ln(1 + e^x)` without overflow for large `x`.
#[inline]
pub fn softplus(x: f64) -> f64 {
    if x > 30.0 { x } else { x.exp().ln_1p() }
}
