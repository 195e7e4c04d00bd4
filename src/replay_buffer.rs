use ndarray::{Array1, Array2};
use rand::Rng;
use std::collections::VecDeque;

use crate::error::{DqnError, Result};

/// One recorded interaction with the environment
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f32>,
    /// One-hot encoding of the action taken in `state`
    pub action: Array1<f32>,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub terminal: bool,
}

/// Transitions stacked row-wise for batched prediction
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch {
    /// `(batch, state_size)`
    pub states: Array2<f32>,
    /// `(batch, action_size)`, one-hot rows
    pub actions: Array2<f32>,
    /// `(batch,)`
    pub rewards: Array1<f32>,
    /// `(batch, state_size)`
    pub next_states: Array2<f32>,
    /// `(batch,)`, 1.0 for terminal transitions and 0.0 otherwise
    pub terminals: Array1<f32>,
}

impl TransitionBatch {
    /// Stack `transitions` into batched arrays. All transitions must share
    /// the state and action widths of the first one.
    pub fn stack<'a, I>(transitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Transition>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut iter = transitions.into_iter().peekable();
        let batch_size = iter.len();
        let first = iter
            .peek()
            .ok_or_else(|| DqnError::EmptyBuffer("cannot stack an empty batch".to_string()))?;
        let state_size = first.state.len();
        let action_size = first.action.len();

        let mut batch = TransitionBatch {
            states: Array2::zeros((batch_size, state_size)),
            actions: Array2::zeros((batch_size, action_size)),
            rewards: Array1::zeros(batch_size),
            next_states: Array2::zeros((batch_size, state_size)),
            terminals: Array1::zeros(batch_size),
        };

        for (i, transition) in iter.enumerate() {
            if transition.state.len() != state_size
                || transition.next_state.len() != state_size
                || transition.action.len() != action_size
            {
                return Err(DqnError::dimension_mismatch(
                    format!("state width {} and action width {}", state_size, action_size),
                    format!(
                        "state width {}, next state width {} and action width {}",
                        transition.state.len(),
                        transition.next_state.len(),
                        transition.action.len()
                    ),
                ));
            }
            batch.states.row_mut(i).assign(&transition.state);
            batch.actions.row_mut(i).assign(&transition.action);
            batch.rewards[i] = transition.reward;
            batch.next_states.row_mut(i).assign(&transition.next_state);
            batch.terminals[i] = if transition.terminal { 1.0 } else { 0.0 };
        }

        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// Fixed-capacity FIFO store of past transitions.
///
/// Once full, every insertion evicts the oldest transition.
#[derive(Clone, Debug)]
pub struct ExperienceBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ExperienceBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DqnError::configuration(
                "memory_size",
                "capacity must be greater than 0",
            ));
        }
        Ok(ExperienceBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn remember(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `batch_size` transitions uniformly at random with replacement.
    ///
    /// Duplicates are possible, and a buffer holding fewer than `batch_size`
    /// transitions still yields a full batch.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<TransitionBatch> {
        if self.buffer.is_empty() {
            return Err(DqnError::EmptyBuffer(
                "cannot sample from an empty experience buffer".to_string(),
            ));
        }
        let picks: Vec<&Transition> = (0..batch_size)
            .map(|_| &self.buffer[rng.gen_range(0..self.buffer.len())])
            .collect();
        TransitionBatch::stack(picks)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first iterator over the stored transitions
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
