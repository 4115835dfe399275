//! Finite-difference check of the RNN backward pass
//!
//! The scalar loss is `L = sum(a ⊙ G)` for a fixed random `G`, so `dL/da = G` and the
//! analytic gradients come from `Rnn::backward(G, &trace)`.

use burn::backend::NdArray;
use burn::tensor::{Tensor, TensorData};
use rand::prelude::*;
use rnn_cells::cells::{RnnCell, RnnCellConfig, RnnTensors};
use rnn_cells::rnn::Rnn;

type Backend = NdArray<f64>;

const N_X: usize = 3;
const N_A: usize = 5;
const N_Y: usize = 2;
const BATCH: usize = 4;
const STEPS: usize = 4;
const EPS: f64 = 1e-6;

fn values<const D: usize>(tensor: Tensor<Backend, D>) -> Vec<f64> {
    tensor.into_data().convert::<f64>().to_vec().unwrap()
}

fn seeded<const D: usize>(shape: [usize; D], rng: &mut StdRng) -> Tensor<Backend, D> {
    let n = shape.iter().product();
    let data: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Tensor::from_data(TensorData::new(data, shape), &Default::default())
}

/// Copy of `tensor` with element `index` (row-major) shifted by `delta`
fn nudged<const D: usize>(
    tensor: &Tensor<Backend, D>,
    index: usize,
    delta: f64,
) -> Tensor<Backend, D> {
    let shape = tensor.dims();
    let mut data = values(tensor.clone());
    data[index] += delta;
    Tensor::from_data(TensorData::new(data, shape), &Default::default())
}

struct Problem {
    params: RnnTensors<Backend>,
    x: Tensor<Backend, 3>,
    a0: Tensor<Backend, 2>,
    upstream: Tensor<Backend, 3>,
}

impl Problem {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(2024);
        let cell = RnnCellConfig::new(N_X, N_A, N_Y)
            .with_init_scale(0.7)
            .with_seed(17)
            .init::<Backend>(&Default::default())
            .unwrap();

        // Non-zero bias so its gradient is exercised away from the origin
        let mut params = cell.tensors();
        params.ba = seeded([N_A, 1], &mut rng).mul_scalar(0.3);

        Self {
            params,
            x: seeded([N_X, BATCH, STEPS], &mut rng),
            a0: seeded([N_A, BATCH], &mut rng),
            upstream: seeded([N_A, BATCH, STEPS], &mut rng),
        }
    }

    fn loss(
        &self,
        params: RnnTensors<Backend>,
        x: Tensor<Backend, 3>,
        a0: Tensor<Backend, 2>,
    ) -> f64 {
        let rnn = Rnn::new(RnnCell::from_tensors(params).unwrap());
        let (a, _, _) = rnn.forward(x, a0).unwrap();
        (a * self.upstream.clone()).sum().into_scalar()
    }

    fn central_difference<const D: usize>(
        &self,
        base: &Tensor<Backend, D>,
        index: usize,
        eval: impl Fn(Tensor<Backend, D>) -> f64,
    ) -> f64 {
        let plus = eval(nudged(base, index, EPS));
        let minus = eval(nudged(base, index, -EPS));
        (plus - minus) / (2.0 * EPS)
    }
}

fn assert_close(name: &str, analytic: &[f64], numeric: &[f64]) {
    assert_eq!(analytic.len(), numeric.len(), "{} length", name);
    for (i, (a, n)) in analytic.iter().zip(numeric).enumerate() {
        let scale = a.abs().max(n.abs()).max(1.0);
        assert!(
            (a - n).abs() / scale < 1e-4,
            "{}[{}]: analytic {} vs numeric {}",
            name,
            i,
            a,
            n
        );
    }
}

fn analytic() -> (Problem, rnn_cells::rnn::RnnGradients<Backend>) {
    let problem = Problem::new();
    let rnn = Rnn::new(RnnCell::from_tensors(problem.params.clone()).unwrap());
    let (_, _, trace) = rnn.forward(problem.x.clone(), problem.a0.clone()).unwrap();
    let grads = Rnn::backward(problem.upstream.clone(), &trace).unwrap();
    (problem, grads)
}

#[test]
fn test_gradient_check_wax() {
    let (p, grads) = analytic();
    let numeric: Vec<f64> = (0..N_A * N_X)
        .map(|i| {
            p.central_difference(&p.params.wax, i, |wax| {
                let params = RnnTensors { wax, ..p.params.clone() };
                p.loss(params, p.x.clone(), p.a0.clone())
            })
        })
        .collect();

    assert_close("dwax", &values(grads.dwax), &numeric);
}

#[test]
fn test_gradient_check_waa() {
    let (p, grads) = analytic();
    let numeric: Vec<f64> = (0..N_A * N_A)
        .map(|i| {
            p.central_difference(&p.params.waa, i, |waa| {
                let params = RnnTensors { waa, ..p.params.clone() };
                p.loss(params, p.x.clone(), p.a0.clone())
            })
        })
        .collect();

    assert_close("dwaa", &values(grads.dwaa), &numeric);
}

#[test]
fn test_gradient_check_ba() {
    let (p, grads) = analytic();
    let numeric: Vec<f64> = (0..N_A)
        .map(|i| {
            p.central_difference(&p.params.ba, i, |ba| {
                let params = RnnTensors { ba, ..p.params.clone() };
                p.loss(params, p.x.clone(), p.a0.clone())
            })
        })
        .collect();

    assert_close("dba", &values(grads.dba), &numeric);
}

#[test]
fn test_gradient_check_input_sequence() {
    let (p, grads) = analytic();
    let numeric: Vec<f64> = (0..N_X * BATCH * STEPS)
        .map(|i| {
            p.central_difference(&p.x, i, |x| p.loss(p.params.clone(), x, p.a0.clone()))
        })
        .collect();

    assert_close("dx", &values(grads.dx), &numeric);
}

#[test]
fn test_gradient_check_initial_state() {
    let (p, grads) = analytic();
    let numeric: Vec<f64> = (0..N_A * BATCH)
        .map(|i| {
            p.central_difference(&p.a0, i, |a0| p.loss(p.params.clone(), p.x.clone(), a0))
        })
        .collect();

    assert_close("da0", &values(grads.da0), &numeric);
}

#[test]
fn test_readout_parameters_do_not_affect_hidden_loss() {
    let p = Problem::new();
    let base = p.loss(p.params.clone(), p.x.clone(), p.a0.clone());

    let params = RnnTensors {
        wya: nudged(&p.params.wya, 0, 0.5),
        by: nudged(&p.params.by, 1, 0.5),
        ..p.params.clone()
    };
    let shifted = p.loss(params, p.x.clone(), p.a0.clone());

    assert_eq!(base, shifted);
}
