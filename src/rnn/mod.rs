//! # Sequence Layers
//!
//! Layers that unroll a cell over the time axis of a sequence. **These are the primary
//! APIs most users should use.**
//!
//! | Layer | Cell | Forward | Backward (BPTT) |
//! |-------|------|---------|-----------------|
//! | [`Rnn`] | [`RnnCell`](crate::cells::RnnCell) | ✓ | ✓ |
//! | [`Lstm`] | [`LstmCell`](crate::cells::LstmCell) | ✓ | ✗ |
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape |
//! |--------|-------|
//! | Input `x` | `[n_x, batch, T]` |
//! | Initial hidden state `a0` | `[n_a, batch]` |
//! | Hidden states `a` | `[n_a, batch, T]` |
//! | Predictions | `[n_y, batch, T]` |
//! | LSTM memory `c` | `[n_a, batch, T]` |
//!
//! ## Training Step Shape
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::{Distribution, Tensor};
//! use rnn_cells::cells::RnnCellConfig;
//! use rnn_cells::rnn::Rnn;
//!
//! type Backend = NdArray<f64>;
//! let device = Default::default();
//!
//! let rnn = Rnn::<Backend>::from_config(&RnnCellConfig::new(3, 5, 2), &device).unwrap();
//!
//! let x = Tensor::<Backend, 3>::random([3, 10, 4], Distribution::Default, &device);
//! let a0 = Tensor::<Backend, 2>::zeros([5, 10], &device);
//! let (a, y_pred, trace) = rnn.forward(x, a0).unwrap();
//! assert_eq!(y_pred.dims(), [2, 10, 4]);
//!
//! // Upstream gradient for every hidden state, e.g. from a loss on `a`
//! let da = a.ones_like();
//! let grads = Rnn::backward(da, &trace).unwrap();
//! assert_eq!(grads.dx.dims(), [3, 10, 4]);
//! assert_eq!(grads.da0.dims(), [5, 10]);
//! ```
//!
//! The memory state of [`Lstm`] is always seeded with zeros; only the hidden state
//! is caller supplied.

pub mod basic;
pub mod lstm;

pub use basic::{Rnn, RnnGradients, TIME_DIM};
pub use lstm::Lstm;
