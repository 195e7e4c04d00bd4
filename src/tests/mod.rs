pub mod test_encoder;
pub mod test_network;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::approximator::QFunction;
use crate::error::Result;

/// Deterministic stand-in for the Q-network.
///
/// Every row of a prediction equals `values`; each fit call records its
/// inputs and shifts `values` up by one so that trained and untrained copies
/// are easy to tell apart.
#[derive(Clone, Debug, PartialEq)]
pub struct StubQ {
    pub values: Array1<f32>,
    pub fit_calls: usize,
    pub last_states: Option<Array2<f32>>,
    pub last_targets: Option<Array2<f32>>,
}

impl StubQ {
    pub fn new(values: &[f32]) -> Self {
        StubQ {
            values: Array1::from_vec(values.to_vec()),
            fit_calls: 0,
            last_states: None,
            last_targets: None,
        }
    }
}

impl QFunction for StubQ {
    fn predict(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        let row = self.values.view().insert_axis(Axis(0));
        Ok(row
            .broadcast((states.nrows(), self.values.len()))
            .expect("row broadcasts to batch")
            .to_owned())
    }

    fn fit(
        &mut self,
        states: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        _epochs: usize,
        _batch_size: usize,
    ) -> Result<f32> {
        self.fit_calls += 1;
        self.last_states = Some(states.to_owned());
        self.last_targets = Some(targets.to_owned());
        self.values += 1.0;
        Ok(0.0)
    }
}
