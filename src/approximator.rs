//! The contract between the agent and whatever maps states to action-values.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::Result;
use crate::network::NeuralNetwork;

/// A trainable mapping from state vectors to action-value vectors.
///
/// `Clone` must produce a deep, independently mutable copy of the current
/// parameters; the target network relies on it to take value snapshots.
pub trait QFunction: Clone {
    /// Predict action-values for a `(batch, state_size)` input.
    ///
    /// Returns a `(batch, action_size)` array and never mutates parameters.
    fn predict(&self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Regress `targets` from `states` for `epochs` passes in minibatches of
    /// `batch_size` rows. Returns the final epoch's mean loss.
    fn fit(
        &mut self,
        states: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        epochs: usize,
        batch_size: usize,
    ) -> Result<f32>;

    /// Predict action-values for a single state.
    fn predict_one(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        let values = self.predict(state.insert_axis(Axis(0)))?;
        Ok(values.index_axis_move(Axis(0), 0))
    }
}

impl QFunction for NeuralNetwork {
    fn predict(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.forward_batch(states)
    }

    fn fit(
        &mut self,
        states: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        epochs: usize,
        batch_size: usize,
    ) -> Result<f32> {
        NeuralNetwork::fit(self, states, targets, epochs, batch_size)
    }
}
