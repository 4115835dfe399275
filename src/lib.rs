//! # rnn-cells - Recurrent cells with explicit backpropagation through time
//!
//! Basic RNN and LSTM cells written out equation by equation on top of the Burn
//! tensor library, without relying on autodiff.
//!
//! ## Features
//!
//! - **RnnCell**: tanh recurrence with a softmax readout, forward and backward
//! - **Rnn**: sequence unroll and backpropagation through time with summed parameter gradients
//! - **LstmCell**: forget/update/output gates with a gated memory state (forward only)
//! - **Lstm**: sequence unroll threading hidden and memory state
//! - **Traces**: named per-timestep caches of every forward intermediate
//! - **Validated bundles**: parameter shapes checked once, at construction
//!
//! ## Quick Start
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::{Distribution, Tensor};
//! use rnn_cells::prelude::*;
//!
//! type Backend = NdArray<f64>;
//! let device = Default::default();
//!
//! // n_x = 3 input features, n_a = 5 hidden units, n_y = 2 classes
//! let rnn = Rnn::<Backend>::from_config(&RnnCellConfig::new(3, 5, 2), &device).unwrap();
//!
//! // [n_x, batch, T]
//! let x = Tensor::<Backend, 3>::random([3, 4, 6], Distribution::Default, &device);
//! let a0 = Tensor::<Backend, 2>::zeros([5, 4], &device);
//!
//! let (a, y_pred, trace) = rnn.forward(x, a0).unwrap();
//! assert_eq!(a.dims(), [5, 4, 6]);
//! assert_eq!(y_pred.dims(), [2, 4, 6]);
//! assert_eq!(trace.len(), 6);
//! ```

pub mod activation;
pub mod cache;
pub mod cells;
pub mod error;
pub mod interop;
pub mod rnn;

pub mod prelude {
    pub use crate::cache::{LstmTrace, RnnTrace, StepCache, Trace};
    pub use crate::cells::{
        LstmCache, LstmCell, LstmCellConfig, LstmTensors, RnnCache, RnnCell, RnnCellConfig,
        RnnCellGradients, RnnTensors,
    };
    pub use crate::error::RecurrentError;
    pub use crate::rnn::{Lstm, Rnn, RnnGradients};
}
