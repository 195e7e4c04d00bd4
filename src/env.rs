use ndarray::Array1;

use crate::error::Result;

/// Outcome of one environment step
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub terminal: bool,
}

/// An episodic environment driven by named actions.
///
/// States are fixed-width `f32` vectors; the agent hands back one of its
/// configured action names each step.
pub trait Environment {
    /// Width of every state vector this environment produces
    fn state_size(&self) -> usize;

    /// Reset to an initial state
    fn reset(&mut self) -> Array1<f32>;

    /// Apply `action` and report the transition
    fn step(&mut self, action: &str) -> Result<Step>;
}
