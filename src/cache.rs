//! Forward traces kept for backpropagation through time
//!
//! Each cell forward call returns a named cache record ([`RnnCache`] or [`LstmCache`]).
//! Sequence layers collect those records, in time order, into a [`Trace`] together
//! with the full input tensor. [`StepCache`] tags a record with the cell kind that
//! produced it, so code that only needs the shared fields can handle both.

use crate::cells::{LstmCache, RnnCache};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Ordered per-timestep caches of one sequence forward pass, plus its input `[n_x, m, T]`
#[derive(Debug, Clone)]
pub struct Trace<C, B: Backend> {
    steps: Vec<C>,
    x: Tensor<B, 3>,
}

/// Trace of [`Rnn::forward`](crate::rnn::Rnn::forward)
pub type RnnTrace<'a, B> = Trace<RnnCache<'a, B>, B>;

/// Trace of [`Lstm::forward`](crate::rnn::Lstm::forward)
pub type LstmTrace<'a, B> = Trace<LstmCache<'a, B>, B>;

impl<C, B: Backend> Trace<C, B> {
    pub(crate) fn new(steps: Vec<C>, x: Tensor<B, 3>) -> Self {
        Self { steps, x }
    }

    /// Caches in increasing time order
    pub fn steps(&self) -> &[C] {
        &self.steps
    }

    /// Cache of timestep `t`
    pub fn step(&self, t: usize) -> Option<&C> {
        self.steps.get(t)
    }

    /// Input tensor the trace was recorded from
    pub fn x(&self) -> &Tensor<B, 3> {
        &self.x
    }

    /// Number of recorded timesteps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Split into the ordered caches and the input tensor
    pub fn into_parts(self) -> (Vec<C>, Tensor<B, 3>) {
        (self.steps, self.x)
    }
}

impl<'a, C, B> Trace<C, B>
where
    B: Backend,
    C: Clone + Into<StepCache<'a, B>>,
{
    /// Caches tagged with their cell kind, in time order
    pub fn tagged(&self) -> Vec<StepCache<'a, B>> {
        self.steps.iter().cloned().map(Into::into).collect()
    }
}

/// A timestep cache from either cell kind
#[derive(Debug, Clone)]
pub enum StepCache<'a, B: Backend> {
    Rnn(RnnCache<'a, B>),
    Lstm(LstmCache<'a, B>),
}

impl<'a, B: Backend> StepCache<'a, B> {
    /// Hidden state produced by the step
    pub fn a_next(&self) -> &Tensor<B, 2> {
        match self {
            StepCache::Rnn(cache) => &cache.a_next,
            StepCache::Lstm(cache) => &cache.a_next,
        }
    }

    /// Hidden state fed into the step
    pub fn a_prev(&self) -> &Tensor<B, 2> {
        match self {
            StepCache::Rnn(cache) => &cache.a_prev,
            StepCache::Lstm(cache) => &cache.a_prev,
        }
    }

    /// Input of the step
    pub fn xt(&self) -> &Tensor<B, 2> {
        match self {
            StepCache::Rnn(cache) => &cache.xt,
            StepCache::Lstm(cache) => &cache.xt,
        }
    }

    /// Memory state produced by the step; `None` for RNN steps
    pub fn c_next(&self) -> Option<&Tensor<B, 2>> {
        match self {
            StepCache::Rnn(_) => None,
            StepCache::Lstm(cache) => Some(&cache.c_next),
        }
    }

    pub fn is_lstm(&self) -> bool {
        matches!(self, StepCache::Lstm(_))
    }
}

impl<'a, B: Backend> From<RnnCache<'a, B>> for StepCache<'a, B> {
    fn from(cache: RnnCache<'a, B>) -> Self {
        StepCache::Rnn(cache)
    }
}

impl<'a, B: Backend> From<LstmCache<'a, B>> for StepCache<'a, B> {
    fn from(cache: LstmCache<'a, B>) -> Self {
        StepCache::Lstm(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::{LstmCellConfig, RnnCellConfig};
    use crate::rnn::{Lstm, Rnn};
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_trace_accessors() {
        let device = Default::default();
        let rnn = Rnn::<TestBackend>::from_config(&RnnCellConfig::new(2, 3, 2), &device).unwrap();

        let x = Tensor::<TestBackend, 3>::random([2, 4, 5], Distribution::Default, &device);
        let (_, _, trace) = rnn.forward(x.clone(), Tensor::zeros([3, 4], &device)).unwrap();

        assert_eq!(trace.len(), 5);
        assert!(!trace.is_empty());
        assert!(trace.step(4).is_some());
        assert!(trace.step(5).is_none());

        let diff = (trace.x().clone() - x).abs().max().into_scalar();
        assert_eq!(diff, 0.0);

        let (steps, input) = trace.into_parts();
        assert_eq!(steps.len(), 5);
        assert_eq!(input.dims(), [2, 4, 5]);
    }

    #[test]
    fn test_tagged_rnn_steps() {
        let device = Default::default();
        let rnn = Rnn::<TestBackend>::from_config(&RnnCellConfig::new(2, 3, 2), &device).unwrap();

        let x = Tensor::<TestBackend, 3>::random([2, 1, 3], Distribution::Default, &device);
        let (a, _, trace) = rnn.forward(x, Tensor::zeros([3, 1], &device)).unwrap();

        let tagged = trace.tagged();
        assert_eq!(tagged.len(), 3);

        for (t, step) in tagged.iter().enumerate() {
            assert!(!step.is_lstm());
            assert!(step.c_next().is_none());
            assert_eq!(step.xt().dims(), [2, 1]);

            let a_t = a.clone().narrow(2, t, 1).squeeze::<2>(2);
            let diff = (step.a_next().clone() - a_t).abs().max().into_scalar();
            assert_eq!(diff, 0.0);
        }
    }

    #[test]
    fn test_tagged_lstm_steps() {
        let device = Default::default();
        let lstm =
            Lstm::<TestBackend>::from_config(&LstmCellConfig::new(2, 3, 2), &device).unwrap();

        let x = Tensor::<TestBackend, 3>::random([2, 2, 2], Distribution::Default, &device);
        let (_, _, c, trace) = lstm.forward(x, Tensor::zeros([3, 2], &device)).unwrap();

        let tagged = trace.tagged();
        assert_eq!(tagged.len(), 2);
        let (first, last) = (&tagged[0], &tagged[1]);
        assert!(last.is_lstm());

        let c_last = c.narrow(2, 1, 1).squeeze::<2>(2);
        let diff = (last.c_next().unwrap().clone() - c_last).abs().max().into_scalar();
        assert_eq!(diff, 0.0);

        // The second step starts from the first step's hidden state
        let diff = (last.a_prev().clone() - first.a_next().clone())
            .abs()
            .max()
            .into_scalar();
        assert_eq!(diff, 0.0);
    }
}
