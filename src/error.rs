//! Error types for recurrent cell operations

use thiserror::Error;

/// Result type for recurrent cell operations
pub type Result<T> = std::result::Result<T, RecurrentError>;

/// Errors that can occur while building or running recurrent cells
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrentError {
    /// An operand does not have the shape implied by the parameter bundle
    #[error("Shape mismatch for `{name}`: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Name of the offending operand
        name: &'static str,
        /// Shape implied by the bundle or the other operands
        expected: Vec<usize>,
        /// Shape that was supplied
        actual: Vec<usize>,
    },

    /// A sequence pass was asked to unroll zero timesteps
    #[error("Empty sequence: at least one timestep is required")]
    EmptySequence,

    /// An input carried zero samples along the batch axis
    #[error("Empty batch: at least one sample is required")]
    EmptyBatch,

    /// A tensor could not be copied out of the backend
    #[error("Tensor conversion failed: {0}")]
    Conversion(String),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RecurrentError {
    pub(crate) fn shape(name: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            name,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

/// Fails with [`RecurrentError::ShapeMismatch`] unless `actual == expected`.
pub(crate) fn check_dims<const D: usize>(
    name: &'static str,
    actual: [usize; D],
    expected: [usize; D],
) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(RecurrentError::shape(name, &expected, &actual))
    }
}

/// Fails with [`RecurrentError::EmptyBatch`] when there are no samples.
pub(crate) fn check_batch(batch: usize) -> Result<()> {
    if batch == 0 {
        return Err(RecurrentError::EmptyBatch);
    }
    Ok(())
}
