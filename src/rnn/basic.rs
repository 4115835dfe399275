//! Basic RNN Layer
//!
//! Unrolls an [`RnnCell`] over the time axis and runs backpropagation through time
//! over the recorded trace.

use crate::cache::{RnnTrace, Trace};
use crate::cells::{RnnCell, RnnCellConfig, RnnCellGradients};
use crate::error::{check_batch, check_dims, RecurrentError, Result};
use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use tracing::{debug, trace};

/// Time axis of a `[features, batch, time]` tensor.
pub const TIME_DIM: usize = 2;

/// Basic RNN Layer
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct Rnn<B: Backend> {
    /// The cell applied at every timestep
    cell: RnnCell<B>,
}

/// Gradients of a full sequence backward pass
#[derive(Debug, Clone)]
pub struct RnnGradients<B: Backend> {
    /// Gradient w.r.t. the input sequence `[n_x, m, T]`
    pub dx: Tensor<B, 3>,
    /// Gradient w.r.t. the initial hidden state `[n_a, m]`
    pub da0: Tensor<B, 2>,
    /// `[n_a, n_x]`, summed over timesteps
    pub dwax: Tensor<B, 2>,
    /// `[n_a, n_a]`, summed over timesteps
    pub dwaa: Tensor<B, 2>,
    /// `[n_a, 1]`, summed over timesteps
    pub dba: Tensor<B, 2>,
}

/// Running state of the reverse-time fold
struct Bptt<B: Backend> {
    /// Hidden-state gradient flowing into the previous (earlier) step
    da_carry: Tensor<B, 2>,
    dwax: Tensor<B, 2>,
    dwaa: Tensor<B, 2>,
    dba: Tensor<B, 2>,
    /// Per-step input gradients, latest timestep first
    dxs: Vec<Tensor<B, 2>>,
}

impl<B: Backend> Bptt<B> {
    fn start(zeros: RnnCellGradients<B>, timesteps: usize) -> Self {
        Self {
            da_carry: zeros.da_prev,
            dwax: zeros.dwax,
            dwaa: zeros.dwaa,
            dba: zeros.dba,
            dxs: Vec::with_capacity(timesteps),
        }
    }

    fn absorb(self, step: RnnCellGradients<B>) -> Self {
        let mut dxs = self.dxs;
        dxs.push(step.dxt);
        Self {
            da_carry: step.da_prev,
            dwax: self.dwax + step.dwax,
            dwaa: self.dwaa + step.dwaa,
            dba: self.dba + step.dba,
            dxs,
        }
    }

    fn finish(self) -> RnnGradients<B> {
        let mut dxs = self.dxs;
        dxs.reverse();
        RnnGradients {
            dx: Tensor::stack(dxs, TIME_DIM),
            da0: self.da_carry,
            dwax: self.dwax,
            dwaa: self.dwaa,
            dba: self.dba,
        }
    }
}

/// Slice timestep `t` out of a `[features, batch, time]` tensor.
pub(crate) fn timestep<B: Backend>(x: &Tensor<B, 3>, t: usize) -> Tensor<B, 2> {
    x.clone().narrow(TIME_DIM, t, 1).squeeze(TIME_DIM)
}

impl<B: Backend> Rnn<B> {
    /// Create a layer around an existing cell
    pub fn new(cell: RnnCell<B>) -> Self {
        Self { cell }
    }

    /// Create a layer with a freshly initialised cell
    pub fn from_config(config: &RnnCellConfig, device: &B::Device) -> Result<Self> {
        Ok(Self::new(config.init(device)?))
    }

    /// The underlying cell (parameter bundle)
    pub fn cell(&self) -> &RnnCell<B> {
        &self.cell
    }

    /// Get input size
    pub fn input_size(&self) -> usize {
        self.cell.input_size()
    }

    /// Get hidden size
    pub fn hidden_size(&self) -> usize {
        self.cell.hidden_size()
    }

    /// Get output size
    pub fn output_size(&self) -> usize {
        self.cell.output_size()
    }

    /// Forward pass over a whole sequence
    ///
    /// # Arguments
    /// * `x` - Input of shape `[n_x, batch, T]`
    /// * `a0` - Initial hidden state of shape `[n_a, batch]`
    ///
    /// # Returns
    /// Tuple of (a `[n_a, batch, T]`, y_pred `[n_y, batch, T]`, trace)
    pub fn forward(
        &self,
        x: Tensor<B, 3>,
        a0: Tensor<B, 2>,
    ) -> Result<(Tensor<B, 3>, Tensor<B, 3>, RnnTrace<'_, B>)> {
        let [n_x, batch, seq_len] = x.dims();
        if seq_len == 0 {
            return Err(RecurrentError::EmptySequence);
        }
        check_batch(batch)?;
        check_dims("x", [n_x, batch, seq_len], [self.input_size(), batch, seq_len])?;
        check_dims("a0", a0.dims(), [self.hidden_size(), batch])?;

        debug!(
            timesteps = seq_len,
            batch,
            hidden = self.hidden_size(),
            "rnn forward"
        );

        let mut hidden = Vec::with_capacity(seq_len);
        let mut predictions = Vec::with_capacity(seq_len);
        let mut caches = Vec::with_capacity(seq_len);
        let mut a_next = a0;

        for t in 0..seq_len {
            let (a, y_pred, cache) = self.cell.forward(timestep(&x, t), a_next)?;
            trace!(t, "rnn step");

            hidden.push(a.clone());
            predictions.push(y_pred);
            caches.push(cache);
            a_next = a;
        }

        let a: Tensor<B, 3> = Tensor::stack(hidden, TIME_DIM);
        let y_pred: Tensor<B, 3> = Tensor::stack(predictions, TIME_DIM);

        Ok((a, y_pred, Trace::new(caches, x)))
    }

    /// Backpropagation through time
    ///
    /// # Arguments
    /// * `da` - Upstream gradient of every hidden state, shape `[n_a, batch, T]`
    /// * `trace` - Trace returned by [`Rnn::forward`]
    ///
    /// Walks the trace from the last timestep to the first. The gradient entering step
    /// `t` is `da[:, :, t]` plus the `da_prev` returned by step `t + 1`; parameter
    /// gradients are the sum of every step's local gradients.
    pub fn backward(da: Tensor<B, 3>, trace: &RnnTrace<'_, B>) -> Result<RnnGradients<B>> {
        let first = trace.step(0).ok_or(RecurrentError::EmptySequence)?;
        let cell = first.params;
        let [_, batch] = first.xt.dims();
        check_dims(
            "da",
            da.dims(),
            [cell.hidden_size(), batch, trace.len()],
        )?;

        debug!(timesteps = trace.len(), batch, "rnn backward");

        let zeros = RnnCellGradients::zeros(cell, batch, &da.device());
        let state = trace.steps().iter().enumerate().rev().try_fold(
            Bptt::start(zeros, trace.len()),
            |acc, (t, cache)| {
                trace!(t, "rnn backward step");
                let da_next = timestep(&da, t) + acc.da_carry.clone();
                let step = RnnCell::backward(da_next, cache)?;
                Ok::<_, RecurrentError>(acc.absorb(step))
            },
        )?;

        Ok(state.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::backend::Backend as BurnBackend;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;
    type TestDevice = <TestBackend as BurnBackend>::Device;

    fn get_test_device() -> TestDevice {
        Default::default()
    }

    fn create_test_layer() -> Rnn<TestBackend> {
        let config = RnnCellConfig::new(3, 5, 2).with_init_scale(0.5);
        Rnn::from_config(&config, &get_test_device()).unwrap()
    }

    #[test]
    fn test_rnn_creation() {
        let rnn = create_test_layer();

        assert_eq!(rnn.input_size(), 3);
        assert_eq!(rnn.hidden_size(), 5);
        assert_eq!(rnn.output_size(), 2);
    }

    #[test]
    fn test_rnn_forward() {
        let device = get_test_device();
        let rnn = create_test_layer();

        let x = Tensor::<TestBackend, 3>::random([3, 4, 6], Distribution::Default, &device);
        let a0 = Tensor::<TestBackend, 2>::zeros([5, 4], &device);

        let (a, y_pred, trace) = rnn.forward(x, a0).unwrap();

        assert_eq!(a.dims(), [5, 4, 6]);
        assert_eq!(y_pred.dims(), [2, 4, 6]);
        assert_eq!(trace.len(), 6);
        assert_eq!(trace.x().dims(), [3, 4, 6]);
    }

    #[test]
    fn test_rnn_hidden_state_is_threaded() {
        let device = get_test_device();
        let rnn = create_test_layer();

        let x = Tensor::<TestBackend, 3>::random([3, 2, 3], Distribution::Default, &device);
        let a0 = Tensor::<TestBackend, 2>::random([5, 2], Distribution::Default, &device);

        let (a, _, trace) = rnn.forward(x, a0.clone()).unwrap();

        let seeded = (trace.steps()[0].a_prev.clone() - a0).abs().max().into_scalar();
        assert_eq!(seeded, 0.0);

        for t in 1..3 {
            let prev = timestep(&a, t - 1);
            let diff = (trace.steps()[t].a_prev.clone() - prev).abs().max().into_scalar();
            assert_eq!(diff, 0.0, "step {} did not receive a[:, :, {}]", t, t - 1);
        }
    }

    #[test]
    fn test_rnn_empty_sequence() {
        let device = get_test_device();
        let rnn = create_test_layer();

        let x = Tensor::<TestBackend, 3>::zeros([3, 2, 0], &device);
        let a0 = Tensor::<TestBackend, 2>::zeros([5, 2], &device);

        assert!(matches!(
            rnn.forward(x, a0),
            Err(RecurrentError::EmptySequence)
        ));
    }

    #[test]
    fn test_rnn_backward_shapes() {
        let device = get_test_device();
        let rnn = create_test_layer();

        let x = Tensor::<TestBackend, 3>::random([3, 4, 5], Distribution::Default, &device);
        let a0 = Tensor::<TestBackend, 2>::zeros([5, 4], &device);
        let (_, _, trace) = rnn.forward(x, a0).unwrap();

        let da = Tensor::<TestBackend, 3>::random([5, 4, 5], Distribution::Default, &device);
        let grads = Rnn::backward(da, &trace).unwrap();

        assert_eq!(grads.dx.dims(), [3, 4, 5]);
        assert_eq!(grads.da0.dims(), [5, 4]);
        assert_eq!(grads.dwax.dims(), [5, 3]);
        assert_eq!(grads.dwaa.dims(), [5, 5]);
        assert_eq!(grads.dba.dims(), [5, 1]);
    }

    #[test]
    fn test_rnn_backward_rejects_wrong_length() {
        let device = get_test_device();
        let rnn = create_test_layer();

        let x = Tensor::<TestBackend, 3>::zeros([3, 2, 4], &device);
        let (_, _, trace) = rnn.forward(x, Tensor::zeros([5, 2], &device)).unwrap();

        let da = Tensor::<TestBackend, 3>::zeros([5, 2, 3], &device);
        assert!(matches!(
            Rnn::backward(da, &trace),
            Err(RecurrentError::ShapeMismatch { name: "da", .. })
        ));
    }
}
