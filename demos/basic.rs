//! Basic usage example of the RNN and LSTM layers
//!
//! Runs a forward pass and a backpropagation-through-time pass on a basic RNN, then a
//! forward pass on an LSTM, printing the shapes involved.

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use rnn_cells::prelude::*;

fn main() -> Result<(), RecurrentError> {
    println!("=== rnn-cells Basic Example ===\n");

    // Use the NdArray backend (CPU)
    type Backend = NdArray<f64>;
    let device = Default::default();

    // Example 1: Basic RNN forward
    println!("Example 1: RNN forward");
    let config = RnnCellConfig::new(3, 5, 2).with_init_scale(0.5).with_seed(42);
    let rnn = Rnn::<Backend>::from_config(&config, &device)?;

    println!("Created RNN:");
    println!("  Input size:  {}", rnn.input_size());
    println!("  Hidden size: {}", rnn.hidden_size());
    println!("  Output size: {}", rnn.output_size());
    println!();

    // Input shape: [features=3, batch=10, time=4]
    let x = Tensor::<Backend, 3>::random([3, 10, 4], Distribution::Uniform(-1.0, 1.0), &device);
    let a0 = Tensor::<Backend, 2>::zeros([5, 10], &device);

    let (a, y_pred, trace) = rnn.forward(x, a0)?;

    println!("  Input shape:       [3, 10, 4]");
    println!("  Hidden states:     {:?}", a.dims());
    println!("  Predictions:       {:?}", y_pred.dims());
    println!("  Recorded steps:    {}", trace.len());
    println!();

    // Example 2: Backpropagation through time
    println!("Example 2: RNN backward");
    let da = Tensor::<Backend, 3>::random([5, 10, 4], Distribution::Default, &device);
    let grads = Rnn::backward(da, &trace)?;

    println!("  dx:   {:?}", grads.dx.dims());
    println!("  da0:  {:?}", grads.da0.dims());
    println!("  dWax: {:?}", grads.dwax.dims());
    println!("  dWaa: {:?}", grads.dwaa.dims());
    println!("  dba:  {:?}", grads.dba.dims());
    println!();

    // Example 3: LSTM forward
    println!("Example 3: LSTM forward");
    let lstm = Lstm::<Backend>::from_config(
        &LstmCellConfig::new(3, 5, 2).with_forget_bias(1.0),
        &device,
    )?;

    let x = Tensor::<Backend, 3>::random([3, 10, 7], Distribution::Uniform(-1.0, 1.0), &device);
    let a0 = Tensor::<Backend, 2>::zeros([5, 10], &device);
    let (a, y, c, trace) = lstm.forward(x, a0)?;

    println!("  Hidden states: {:?}", a.dims());
    println!("  Predictions:   {:?}", y.dims());
    println!("  Memory states: {:?}", c.dims());

    if let Some(last) = trace.step(trace.len() - 1) {
        let forget = last.ft.clone().mean().into_scalar();
        println!("  Mean forget gate at last step: {:.4}", forget);
    }
    println!();

    println!("=== Example Complete ===");
    Ok(())
}
