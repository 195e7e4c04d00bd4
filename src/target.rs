use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::approximator::QFunction;
use crate::error::Result;

/// A frozen copy of the policy network used to compute learning targets.
///
/// The copy is replaced by a fresh clone of the policy once the sync counter
/// reaches `max_counter`; between syncs it does not change.
#[derive(Clone, Debug)]
pub struct TargetNetwork<Q> {
    network: Q,
    counter: usize,
    max_counter: usize,
}

impl<Q: QFunction> TargetNetwork<Q> {
    /// Start from a snapshot of `policy` with the counter at zero
    pub fn new(policy: &Q, max_counter: usize) -> Self {
        TargetNetwork {
            network: policy.clone(),
            counter: 0,
            max_counter,
        }
    }

    pub fn get_target_values(&self, next_states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.network.predict(next_states)
    }

    /// Advance the sync counter, re-cloning `policy` when it is due.
    ///
    /// Returns `true` when the target was replaced.
    pub fn tick(&mut self, policy: &Q) -> bool {
        if self.counter >= self.max_counter {
            self.counter = 0;
            self.network = policy.clone();
            debug!("target network synced with policy network");
            true
        } else {
            self.counter += 1;
            false
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn max_counter(&self) -> usize {
        self.max_counter
    }

    pub fn network(&self) -> &Q {
        &self.network
    }
}
