use crate::activation;
use crate::error::{self, check_dims};
use crate::interop::{tensor_from_ndarray, uniform_tensor};
use burn::config::Config;
use burn::module::{Module, Param};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use ndarray::Array2;
use rand::prelude::*;

/// Configuration for a randomly initialised [`LstmCell`]
#[derive(Config, Debug)]
pub struct LstmCellConfig {
    /// Number of input features (n_x)
    pub input_size: usize,
    /// Number of hidden units (n_a)
    pub hidden_size: usize,
    /// Number of output classes (n_y)
    pub output_size: usize,
    /// Weights are drawn uniformly from `[-init_scale, init_scale]`
    #[config(default = 0.01)]
    pub init_scale: f64,
    /// Constant added to the forget-gate bias at initialisation
    #[config(default = 0.0)]
    pub forget_bias: f64,
    /// Seed for weight initialisation
    #[config(default = 1)]
    pub seed: u64,
}

impl LstmCellConfig {
    /// Initialise a cell with seeded uniform weights and zero biases
    /// (the forget gate bias is set to `forget_bias`).
    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<LstmCell<B>> {
        super::validate_sizes(self.input_size, self.hidden_size, self.output_size)?;
        super::validate_scale(self.init_scale)?;

        let (n_x, n_a, n_y) = (self.input_size, self.hidden_size, self.output_size);
        let concat = n_a + n_x;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let wf = uniform_tensor(&mut rng, [n_a, concat], self.init_scale, device);
        let wi = uniform_tensor(&mut rng, [n_a, concat], self.init_scale, device);
        let wc = uniform_tensor(&mut rng, [n_a, concat], self.init_scale, device);
        let wo = uniform_tensor(&mut rng, [n_a, concat], self.init_scale, device);
        let wy = uniform_tensor(&mut rng, [n_y, n_a], self.init_scale, device);

        LstmCell::from_tensors(LstmTensors {
            wf,
            bf: Tensor::full([n_a, 1], self.forget_bias, device),
            wi,
            bi: Tensor::zeros([n_a, 1], device),
            wc,
            bc: Tensor::zeros([n_a, 1], device),
            wo,
            bo: Tensor::zeros([n_a, 1], device),
            wy,
            by: Tensor::zeros([n_y, 1], device),
        })
    }
}

/// Raw tensors of an LSTM parameter bundle.
///
/// Gate weights act on `concat = [a_prev; xt]`: their first `n_a` columns multiply
/// the hidden state, the remaining `n_x` columns multiply the input.
#[derive(Debug, Clone)]
pub struct LstmTensors<B: Backend> {
    /// Forget gate weights `[n_a, n_a + n_x]`
    pub wf: Tensor<B, 2>,
    /// Forget gate bias `[n_a, 1]`
    pub bf: Tensor<B, 2>,
    /// Update gate weights `[n_a, n_a + n_x]`
    pub wi: Tensor<B, 2>,
    /// Update gate bias `[n_a, 1]`
    pub bi: Tensor<B, 2>,
    /// Candidate weights `[n_a, n_a + n_x]`
    pub wc: Tensor<B, 2>,
    /// Candidate bias `[n_a, 1]`
    pub bc: Tensor<B, 2>,
    /// Output gate weights `[n_a, n_a + n_x]`
    pub wo: Tensor<B, 2>,
    /// Output gate bias `[n_a, 1]`
    pub bo: Tensor<B, 2>,
    /// Hidden-to-output weights `[n_y, n_a]`
    pub wy: Tensor<B, 2>,
    /// Output bias `[n_y, 1]`
    pub by: Tensor<B, 2>,
}

/// LSTM cell with forget/update/output gates
///
/// Implements:
/// - ft = sigmoid(Wf · concat + bf)
/// - it = sigmoid(Wi · concat + bi)
/// - cct = tanh(Wc · concat + bc)
/// - c_next = ft * c_prev + it * cct
/// - ot = sigmoid(Wo · concat + bo)
/// - a_next = ot * tanh(c_next)
/// - y_pred = softmax(Wy · a_next + by)
///
/// where `concat = [a_prev; xt]` stacks the hidden state over the input.
#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    wf: Param<Tensor<B, 2>>,
    bf: Param<Tensor<B, 2>>,
    wi: Param<Tensor<B, 2>>,
    bi: Param<Tensor<B, 2>>,
    wc: Param<Tensor<B, 2>>,
    bc: Param<Tensor<B, 2>>,
    wo: Param<Tensor<B, 2>>,
    bo: Param<Tensor<B, 2>>,
    wy: Param<Tensor<B, 2>>,
    by: Param<Tensor<B, 2>>,
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
}

/// Forward intermediates of one LSTM step
#[derive(Debug, Clone)]
pub struct LstmCache<'a, B: Backend> {
    pub a_next: Tensor<B, 2>,
    pub c_next: Tensor<B, 2>,
    pub a_prev: Tensor<B, 2>,
    pub c_prev: Tensor<B, 2>,
    /// Forget gate activations
    pub ft: Tensor<B, 2>,
    /// Update gate activations
    pub it: Tensor<B, 2>,
    /// Candidate value
    pub cct: Tensor<B, 2>,
    /// Output gate activations
    pub ot: Tensor<B, 2>,
    pub xt: Tensor<B, 2>,
    pub params: &'a LstmCell<B>,
}

impl<B: Backend> LstmCell<B> {
    /// Build a cell from explicit tensors.
    ///
    /// `n_a` and `n_y` are read from `wy`; `n_x` is the remainder of `wf`'s column count.
    pub fn from_tensors(tensors: LstmTensors<B>) -> error::Result<Self> {
        let LstmTensors {
            wf,
            bf,
            wi,
            bi,
            wc,
            bc,
            wo,
            bo,
            wy,
            by,
        } = tensors;

        let [n_y, n_a] = wy.dims();
        let [_, concat] = wf.dims();
        let n_x = concat.saturating_sub(n_a);
        super::validate_sizes(n_x, n_a, n_y)?;

        let gate = [n_a, n_a + n_x];
        let bias = [n_a, 1];
        check_dims("wf", wf.dims(), gate)?;
        check_dims("wi", wi.dims(), gate)?;
        check_dims("wc", wc.dims(), gate)?;
        check_dims("wo", wo.dims(), gate)?;
        check_dims("bf", bf.dims(), bias)?;
        check_dims("bi", bi.dims(), bias)?;
        check_dims("bc", bc.dims(), bias)?;
        check_dims("bo", bo.dims(), bias)?;
        check_dims("by", by.dims(), [n_y, 1])?;

        Ok(Self {
            wf: Param::from_tensor(wf),
            bf: Param::from_tensor(bf),
            wi: Param::from_tensor(wi),
            bi: Param::from_tensor(bi),
            wc: Param::from_tensor(wc),
            bc: Param::from_tensor(bc),
            wo: Param::from_tensor(wo),
            bo: Param::from_tensor(bo),
            wy: Param::from_tensor(wy),
            by: Param::from_tensor(by),
            input_size: n_x,
            hidden_size: n_a,
            output_size: n_y,
        })
    }

    /// Build a cell from `ndarray` matrices, one per [`LstmTensors`] field in the same order.
    pub fn from_ndarray(arrays: [&Array2<f64>; 10], device: &B::Device) -> error::Result<Self> {
        let [wf, bf, wi, bi, wc, bc, wo, bo, wy, by] =
            arrays.map(|a| tensor_from_ndarray(a, device));
        Self::from_tensors(LstmTensors {
            wf,
            bf,
            wi,
            bi,
            wc,
            bc,
            wo,
            bo,
            wy,
            by,
        })
    }

    /// Copy of all parameter tensors
    pub fn tensors(&self) -> LstmTensors<B> {
        LstmTensors {
            wf: self.wf.val(),
            bf: self.bf.val(),
            wi: self.wi.val(),
            bi: self.bi.val(),
            wc: self.wc.val(),
            bc: self.bc.val(),
            wo: self.wo.val(),
            bo: self.bo.val(),
            wy: self.wy.val(),
            by: self.by.val(),
        }
    }

    /// Get the input size (n_x)
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the hidden size (n_a)
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Get the output size (n_y)
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    fn affine(
        &self,
        w: &Param<Tensor<B, 2>>,
        b: &Param<Tensor<B, 2>>,
        x: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let w = w.val();
        let [rows, _] = w.dims();
        let [_, batch] = x.dims();
        w.matmul(x) + b.val().expand([rows, batch])
    }

    /// Perform a forward pass through the LSTM cell
    ///
    /// # Arguments
    /// * `xt` - Input of shape `[n_x, batch]`
    /// * `a_prev` - Previous hidden state of shape `[n_a, batch]`
    /// * `c_prev` - Previous memory state of shape `[n_a, batch]`
    ///
    /// # Returns
    /// Tuple of (a_next, c_next, y_pred, cache)
    pub fn forward(
        &self,
        xt: Tensor<B, 2>,
        a_prev: Tensor<B, 2>,
        c_prev: Tensor<B, 2>,
    ) -> error::Result<(Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 2>, LstmCache<'_, B>)> {
        let [_, batch] = xt.dims();
        error::check_batch(batch)?;
        check_dims("xt", xt.dims(), [self.input_size, batch])?;
        check_dims("a_prev", a_prev.dims(), [self.hidden_size, batch])?;
        check_dims("c_prev", c_prev.dims(), [self.hidden_size, batch])?;

        // Hidden state first, then input
        let concat = Tensor::cat(vec![a_prev.clone(), xt.clone()], activation::FEATURE_DIM);

        let ft = activation::sigmoid(self.affine(&self.wf, &self.bf, concat.clone()));
        let it = activation::sigmoid(self.affine(&self.wi, &self.bi, concat.clone()));
        let cct = activation::tanh(self.affine(&self.wc, &self.bc, concat.clone()));
        let c_next = ft.clone() * c_prev.clone() + it.clone() * cct.clone();
        let ot = activation::sigmoid(self.affine(&self.wo, &self.bo, concat));
        let a_next = ot.clone() * activation::tanh(c_next.clone());

        let y_pred = activation::softmax(self.affine(&self.wy, &self.by, a_next.clone()));

        let cache = LstmCache {
            a_next: a_next.clone(),
            c_next: c_next.clone(),
            a_prev,
            c_prev,
            ft,
            it,
            cct,
            ot,
            xt,
            params: self,
        };

        Ok((a_next, c_next, y_pred, cache))
    }
}
