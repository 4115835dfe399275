//! Activation functions for recurrent cells
//!
//! Thin wrappers over Burn's element-wise activations, fixed to the feature-major
//! layout used throughout this crate: a 2D tensor is `[features, batch]`, so softmax
//! normalises along dimension 0.

use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Feature axis of a `[features, batch]` tensor.
pub const FEATURE_DIM: usize = 0;

/// Batch axis of a `[features, batch]` tensor.
pub const BATCH_DIM: usize = 1;

/// Element-wise hyperbolic tangent, range (-1, 1).
pub fn tanh<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    x.tanh()
}

/// Element-wise logistic sigmoid, range (0, 1).
///
/// Computed as `1 / (1 + e^-x)` in the backend's own float type, so an `f64` backend
/// keeps full precision.
pub fn sigmoid<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    x.neg().exp().add_scalar(1.0).recip()
}

/// Softmax over the feature axis, so every column (sample) sums to 1.
///
/// # Example
///
/// ```rust
/// use burn::backend::NdArray;
/// use burn::tensor::Tensor;
/// use rnn_cells::activation::softmax;
///
/// type Backend = NdArray<f32>;
/// let device = Default::default();
///
/// // Two features, three samples
/// let logits = Tensor::<Backend, 2>::from_floats([[1.0, 0.0, -2.0], [1.0, 3.0, 2.0]], &device);
/// let probs = softmax(logits);
/// assert_eq!(probs.dims(), [2, 3]);
/// ```
pub fn softmax<B: Backend>(x: Tensor<B, 2>) -> Tensor<B, 2> {
    activation::softmax(x, FEATURE_DIM)
}

/// Backward of tanh expressed through its output: `(1 - y²) ⊙ upstream`.
pub fn tanh_backward<B: Backend, const D: usize>(
    output: Tensor<B, D>,
    upstream: Tensor<B, D>,
) -> Tensor<B, D> {
    let local = (output.clone() * output).neg().add_scalar(1.0);
    local * upstream
}
