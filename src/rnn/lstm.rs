//! LSTM Layer
//!
//! Unrolls an [`LstmCell`] over the time axis, threading both the hidden state and the
//! memory state. The memory state always starts at zero.

use super::basic::{timestep, TIME_DIM};
use crate::cache::{LstmTrace, Trace};
use crate::cells::{LstmCell, LstmCellConfig};
use crate::error::{check_batch, check_dims, RecurrentError, Result};
use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use tracing::{debug, trace};

/// LSTM Layer
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct Lstm<B: Backend> {
    /// The LSTM cell applied at every timestep
    cell: LstmCell<B>,
}

impl<B: Backend> Lstm<B> {
    /// Create a layer around an existing cell
    pub fn new(cell: LstmCell<B>) -> Self {
        Self { cell }
    }

    /// Create a layer with a freshly initialised cell
    pub fn from_config(config: &LstmCellConfig, device: &B::Device) -> Result<Self> {
        Ok(Self::new(config.init(device)?))
    }

    /// The underlying cell (parameter bundle)
    pub fn cell(&self) -> &LstmCell<B> {
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
    /// Tuple of (a `[n_a, batch, T]`, y `[n_y, batch, T]`, c `[n_a, batch, T]`, trace)
    pub fn forward(
        &self,
        x: Tensor<B, 3>,
        a0: Tensor<B, 2>,
    ) -> Result<(Tensor<B, 3>, Tensor<B, 3>, Tensor<B, 3>, LstmTrace<'_, B>)> {
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
            "lstm forward"
        );

        let mut hidden = Vec::with_capacity(seq_len);
        let mut memory = Vec::with_capacity(seq_len);
        let mut predictions = Vec::with_capacity(seq_len);
        let mut caches = Vec::with_capacity(seq_len);

        let mut c_next = a0.zeros_like();
        let mut a_next = a0;

        for t in 0..seq_len {
            let (a, c, y_pred, cache) = self.cell.forward(timestep(&x, t), a_next, c_next)?;
            trace!(t, "lstm step");

            hidden.push(a.clone());
            memory.push(c.clone());
            predictions.push(y_pred);
            caches.push(cache);
            a_next = a;
            c_next = c;
        }

        let a: Tensor<B, 3> = Tensor::stack(hidden, TIME_DIM);
        let y: Tensor<B, 3> = Tensor::stack(predictions, TIME_DIM);
        let c: Tensor<B, 3> = Tensor::stack(memory, TIME_DIM);

        Ok((a, y, c, Trace::new(caches, x)))
    }
}
