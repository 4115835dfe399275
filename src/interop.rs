//! Conversions between `ndarray` matrices and Burn tensors

use crate::error::{RecurrentError, Result};
use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use ndarray::Array2;
use rand::prelude::*;

/// Convert an `Array2<f64>` into a 2D tensor, keeping row-major order.
pub fn tensor_from_ndarray<B: Backend>(arr: &Array2<f64>, device: &B::Device) -> Tensor<B, 2> {
    let (rows, cols) = arr.dim();
    let data: Vec<f64> = arr.iter().copied().collect();
    Tensor::from_data(
        TensorData::new(data, [rows, cols]).convert::<B::FloatElem>(),
        device,
    )
}

/// Copy a 2D tensor into an `Array2<f64>`.
pub fn tensor_to_ndarray<B: Backend>(tensor: Tensor<B, 2>) -> Result<Array2<f64>> {
    let [rows, cols] = tensor.dims();
    let data: Vec<f64> = tensor
        .into_data()
        .convert::<f64>()
        .to_vec()
        .map_err(|e| RecurrentError::Conversion(format!("{:?}", e)))?;
    Array2::from_shape_vec((rows, cols), data)
        .map_err(|e| RecurrentError::Conversion(e.to_string()))
}

/// Seeded uniform matrix in `[-scale, scale]`.
pub(crate) fn uniform_tensor<B: Backend>(
    rng: &mut StdRng,
    shape: [usize; 2],
    scale: f64,
    device: &B::Device,
) -> Tensor<B, 2> {
    let data: Vec<f64> = (0..shape[0] * shape[1])
        .map(|_| rng.gen_range(-scale..=scale))
        .collect();
    Tensor::from_data(TensorData::new(data, shape).convert::<B::FloatElem>(), device)
}
