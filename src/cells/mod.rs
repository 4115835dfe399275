//! # Recurrent Cell Implementations
//!
//! Single-timestep cells. Each cell struct is also the parameter bundle of its
//! variant: weights are stored as Burn [`Param`](burn::module::Param)s and validated
//! once, when the cell is built. The sequence layers in [`crate::rnn`] unroll these
//! cells over time.
//!
//! ## Cell Types
//!
//! | Cell | Forward | Backward | Cache |
//! |------|---------|----------|-------|
//! | [`RnnCell`] | tanh recurrence + softmax readout | yes | [`RnnCache`] |
//! | [`LstmCell`] | forget/update/output gates + memory | no | [`LstmCache`] |
//!
//! ## Tensor Shapes
//!
//! Tensors are feature-major, one column per sample:
//!
//! | Tensor | Shape | Description |
//! |--------|-------|-------------|
//! | `xt` | `[n_x, batch]` | Input at one timestep |
//! | `a_prev`, `a_next` | `[n_a, batch]` | Hidden state |
//! | `c_prev`, `c_next` | `[n_a, batch]` | LSTM memory state |
//! | `y_pred` | `[n_y, batch]` | Softmax prediction |
//!
//! ## Example: Using RnnCell Directly
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use rnn_cells::cells::{RnnCell, RnnCellConfig};
//!
//! type Backend = NdArray<f64>;
//! let device = Default::default();
//!
//! let cell = RnnCellConfig::new(3, 5, 2).init::<Backend>(&device).unwrap();
//!
//! let xt = Tensor::<Backend, 2>::ones([3, 4], &device);
//! let a_prev = Tensor::<Backend, 2>::zeros([5, 4], &device);
//! let (a_next, y_pred, cache) = cell.forward(xt, a_prev).unwrap();
//! assert_eq!(a_next.dims(), [5, 4]);
//! assert_eq!(y_pred.dims(), [2, 4]);
//!
//! let grads = RnnCell::backward(Tensor::ones([5, 4], &device), &cache).unwrap();
//! assert_eq!(grads.dwax.dims(), [5, 3]);
//! ```

pub mod lstm_cell;
pub mod rnn_cell;

pub use lstm_cell::{LstmCache, LstmCell, LstmCellConfig, LstmTensors};
pub use rnn_cell::{RnnCache, RnnCell, RnnCellConfig, RnnCellGradients, RnnTensors};

use crate::error::{RecurrentError, Result};

fn validate_sizes(input_size: usize, hidden_size: usize, output_size: usize) -> Result<()> {
    if input_size == 0 || hidden_size == 0 || output_size == 0 {
        return Err(RecurrentError::InvalidConfig(format!(
            "sizes must be non-zero, got input={}, hidden={}, output={}",
            input_size, hidden_size, output_size
        )));
    }
    Ok(())
}

fn validate_scale(init_scale: f64) -> Result<()> {
    if !init_scale.is_finite() || init_scale <= 0.0 {
        return Err(RecurrentError::InvalidConfig(format!(
            "init_scale must be positive and finite, got {}",
            init_scale
        )));
    }
    Ok(())
}
