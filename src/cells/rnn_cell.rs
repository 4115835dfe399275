//! Basic recurrent cell with an explicit backward pass
//!
//! ```text
//! a_next = tanh(Waa · a_prev + Wax · xt + ba)
//! y_pred = softmax(Wya · a_next + by)
//! ```

use crate::activation::{self, BATCH_DIM};
use crate::error::{self, check_dims};
use crate::interop::{tensor_from_ndarray, uniform_tensor};
use burn::config::Config;
use burn::module::{Module, Param};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use ndarray::Array2;
use rand::prelude::*;

/// Configuration for a randomly initialised [`RnnCell`]
#[derive(Config, Debug)]
pub struct RnnCellConfig {
    /// Number of input features (n_x)
    pub input_size: usize,
    /// Number of hidden units (n_a)
    pub hidden_size: usize,
    /// Number of output classes (n_y)
    pub output_size: usize,
    /// Weights are drawn uniformly from `[-init_scale, init_scale]`
    #[config(default = 0.01)]
    pub init_scale: f64,
    /// Seed for weight initialisation
    #[config(default = 1)]
    pub seed: u64,
}

impl RnnCellConfig {
    /// Initialise a cell with seeded uniform weights and zero biases.
    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<RnnCell<B>> {
        super::validate_sizes(self.input_size, self.hidden_size, self.output_size)?;
        super::validate_scale(self.init_scale)?;

        let (n_x, n_a, n_y) = (self.input_size, self.hidden_size, self.output_size);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let wax = uniform_tensor(&mut rng, [n_a, n_x], self.init_scale, device);
        let waa = uniform_tensor(&mut rng, [n_a, n_a], self.init_scale, device);
        let wya = uniform_tensor(&mut rng, [n_y, n_a], self.init_scale, device);

        RnnCell::from_tensors(RnnTensors {
            wax,
            waa,
            wya,
            ba: Tensor::zeros([n_a, 1], device),
            by: Tensor::zeros([n_y, 1], device),
        })
    }
}

/// Raw tensors of an RNN parameter bundle, named as in the cell equations
#[derive(Debug, Clone)]
pub struct RnnTensors<B: Backend> {
    /// Input-to-hidden weights `[n_a, n_x]`
    pub wax: Tensor<B, 2>,
    /// Hidden-to-hidden weights `[n_a, n_a]`
    pub waa: Tensor<B, 2>,
    /// Hidden-to-output weights `[n_y, n_a]`
    pub wya: Tensor<B, 2>,
    /// Hidden bias `[n_a, 1]`
    pub ba: Tensor<B, 2>,
    /// Output bias `[n_y, 1]`
    pub by: Tensor<B, 2>,
}

/// Basic RNN cell: the RNN parameter bundle plus its single-timestep transitions.
///
/// Tensors are feature-major: inputs are `[n_x, batch]`, hidden states `[n_a, batch]`.
#[derive(Module, Debug)]
pub struct RnnCell<B: Backend> {
    wax: Param<Tensor<B, 2>>,
    waa: Param<Tensor<B, 2>>,
    wya: Param<Tensor<B, 2>>,
    ba: Param<Tensor<B, 2>>,
    by: Param<Tensor<B, 2>>,
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
}

/// Everything [`RnnCell::backward`] needs from one forward step
#[derive(Debug, Clone)]
pub struct RnnCache<'a, B: Backend> {
    /// Hidden state produced by the step `[n_a, m]`
    pub a_next: Tensor<B, 2>,
    /// Hidden state fed into the step `[n_a, m]`
    pub a_prev: Tensor<B, 2>,
    /// Input at this timestep `[n_x, m]`
    pub xt: Tensor<B, 2>,
    /// Bundle that produced the step
    pub params: &'a RnnCell<B>,
}

/// Local gradients of one RNN step
#[derive(Debug, Clone)]
pub struct RnnCellGradients<B: Backend> {
    /// Gradient w.r.t. the step input `[n_x, m]`
    pub dxt: Tensor<B, 2>,
    /// Gradient w.r.t. the previous hidden state `[n_a, m]`
    pub da_prev: Tensor<B, 2>,
    /// `[n_a, n_x]`
    pub dwax: Tensor<B, 2>,
    /// `[n_a, n_a]`
    pub dwaa: Tensor<B, 2>,
    /// `[n_a, 1]`
    pub dba: Tensor<B, 2>,
}

impl<B: Backend> RnnCell<B> {
    /// Build a cell from explicit tensors.
    ///
    /// `n_a` and `n_x` are read from `wax`, `n_y` from `wya`; every other tensor must agree.
    pub fn from_tensors(tensors: RnnTensors<B>) -> error::Result<Self> {
        let RnnTensors {
            wax,
            waa,
            wya,
            ba,
            by,
        } = tensors;

        let [n_a, n_x] = wax.dims();
        let [n_y, _] = wya.dims();
        super::validate_sizes(n_x, n_a, n_y)?;

        check_dims("waa", waa.dims(), [n_a, n_a])?;
        check_dims("wya", wya.dims(), [n_y, n_a])?;
        check_dims("ba", ba.dims(), [n_a, 1])?;
        check_dims("by", by.dims(), [n_y, 1])?;

        Ok(Self {
            wax: Param::from_tensor(wax),
            waa: Param::from_tensor(waa),
            wya: Param::from_tensor(wya),
            ba: Param::from_tensor(ba),
            by: Param::from_tensor(by),
            input_size: n_x,
            hidden_size: n_a,
            output_size: n_y,
        })
    }

    /// Build a cell from `ndarray` matrices laid out as in [`RnnTensors`].
    pub fn from_ndarray(
        wax: &Array2<f64>,
        waa: &Array2<f64>,
        wya: &Array2<f64>,
        ba: &Array2<f64>,
        by: &Array2<f64>,
        device: &B::Device,
    ) -> error::Result<Self> {
        Self::from_tensors(RnnTensors {
            wax: tensor_from_ndarray(wax, device),
            waa: tensor_from_ndarray(waa, device),
            wya: tensor_from_ndarray(wya, device),
            ba: tensor_from_ndarray(ba, device),
            by: tensor_from_ndarray(by, device),
        })
    }

    /// Copy of all parameter tensors
    pub fn tensors(&self) -> RnnTensors<B> {
        RnnTensors {
            wax: self.wax(),
            waa: self.waa(),
            wya: self.wya(),
            ba: self.ba(),
            by: self.by(),
        }
    }

    pub fn wax(&self) -> Tensor<B, 2> {
        self.wax.val()
    }

    pub fn waa(&self) -> Tensor<B, 2> {
        self.waa.val()
    }

    pub fn wya(&self) -> Tensor<B, 2> {
        self.wya.val()
    }

    pub fn ba(&self) -> Tensor<B, 2> {
        self.ba.val()
    }

    pub fn by(&self) -> Tensor<B, 2> {
        self.by.val()
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

    /// Perform a forward pass through the cell for one timestep
    ///
    /// # Arguments
    /// * `xt` - Input of shape `[n_x, batch]`
    /// * `a_prev` - Previous hidden state of shape `[n_a, batch]`
    ///
    /// # Returns
    /// Tuple of (a_next `[n_a, batch]`, y_pred `[n_y, batch]`, cache)
    pub fn forward(
        &self,
        xt: Tensor<B, 2>,
        a_prev: Tensor<B, 2>,
    ) -> error::Result<(Tensor<B, 2>, Tensor<B, 2>, RnnCache<'_, B>)> {
        let [_, batch] = xt.dims();
        error::check_batch(batch)?;
        check_dims("xt", xt.dims(), [self.input_size, batch])?;
        check_dims("a_prev", a_prev.dims(), [self.hidden_size, batch])?;

        let z = self.waa().matmul(a_prev.clone())
            + self.wax().matmul(xt.clone())
            + self.ba().expand([self.hidden_size, batch]);
        let a_next = activation::tanh(z);

        let logits =
            self.wya().matmul(a_next.clone()) + self.by().expand([self.output_size, batch]);
        let y_pred = activation::softmax(logits);

        let cache = RnnCache {
            a_next: a_next.clone(),
            a_prev,
            xt,
            params: self,
        };

        Ok((a_next, y_pred, cache))
    }

    /// Backward pass for one timestep.
    ///
    /// Returns the local gradients only; accumulation over time is done by
    /// [`Rnn::backward`](crate::rnn::Rnn::backward).
    pub fn backward(
        da_next: Tensor<B, 2>,
        cache: &RnnCache<'_, B>,
    ) -> error::Result<RnnCellGradients<B>> {
        check_dims("da_next", da_next.dims(), cache.a_next.dims())?;
        let params = cache.params;

        let dtanh = activation::tanh_backward(cache.a_next.clone(), da_next);

        let dxt = params.wax().transpose().matmul(dtanh.clone());
        let dwax = dtanh.clone().matmul(cache.xt.clone().transpose());

        let da_prev = params.waa().transpose().matmul(dtanh.clone());
        let dwaa = dtanh.clone().matmul(cache.a_prev.clone().transpose());

        let dba = dtanh.sum_dim(BATCH_DIM);

        Ok(RnnCellGradients {
            dxt,
            da_prev,
            dwax,
            dwaa,
            dba,
        })
    }
}

impl<B: Backend> RnnCellGradients<B> {
    /// Zero parameter gradients for a cell; `dxt` and `da_prev` are zero `[·, batch]` tensors.
    pub fn zeros(cell: &RnnCell<B>, batch: usize, device: &B::Device) -> Self {
        let (n_x, n_a) = (cell.input_size(), cell.hidden_size());
        Self {
            dxt: Tensor::zeros([n_x, batch], device),
            da_prev: Tensor::zeros([n_a, batch], device),
            dwax: Tensor::zeros([n_a, n_x], device),
            dwaa: Tensor::zeros([n_a, n_a], device),
            dba: Tensor::zeros([n_a, 1], device),
        }
    }
}
