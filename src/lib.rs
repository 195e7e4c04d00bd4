//! # snake_dqn - Deep Q-Learning with Experience Replay
//!
//! A single-agent Deep Q-Learning implementation built around the
//! experience-replay training loop: a bounded FIFO buffer of transitions,
//! epsilon-greedy action selection with decaying exploration, a policy
//! network fitted on sampled batches and a target network that is re-synced
//! from the policy on a fixed schedule.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snake_dqn::agent::DqnAgent;
//! use snake_dqn::config::AgentConfig;
//!
//! let config = AgentConfig::from_json_str(
//!     r#"{ "state_size": 11, "actions": ["up", "right", "down", "left"], "seed": 7 }"#,
//! ).unwrap();
//! let mut agent = DqnAgent::new(config).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - The DQN agent and the replay training step
//! - [`approximator`] - The `QFunction` contract any value network must satisfy
//! - [`config`] - Hyperparameters and JSON loading
//! - [`encoder`] - Action name <-> one-hot conversion
//! - [`env`] - Environment trait for episode driving
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Epsilon-greedy action selection
//! - [`replay_buffer`] - Experience buffer and batched sampling
//! - [`target`] - Periodically synced target network
//! - [`network`], [`layers`], [`activations`], [`loss`], [`optimizer`] - The dense Q-network

pub mod activations;
pub mod agent;
pub mod approximator;
pub mod config;
pub mod encoder;
pub mod env;
pub mod error;
pub mod exploration;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod target;

pub use agent::{DqnAgent, ReplayOutcome};
pub use approximator::QFunction;
pub use config::AgentConfig;
pub use error::{DqnError, Result};

#[cfg(test)]
mod tests;
