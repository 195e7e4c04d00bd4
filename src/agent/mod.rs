//! # Deep Q-Learning Agent
//!
//! [`DqnAgent`] ties the pieces of the replay loop together:
//!
//! - an [`ExperienceBuffer`](crate::replay_buffer::ExperienceBuffer) of past transitions
//! - an [`EpsilonGreedy`](crate::exploration::EpsilonGreedy) selector whose epsilon decays per training step
//! - a policy [`QFunction`](crate::approximator::QFunction) that is fitted on sampled batches
//! - a [`TargetNetwork`](crate::target::TargetNetwork) snapshot that supplies stable targets
//!
//! Per time step the caller (or [`DqnAgent::run_episode`]) picks an action with
//! `act`, applies it to the environment, records the outcome with `remember`
//! and calls `replay`, which trains only once the buffer holds more than
//! `batch_size` transitions.
//!
//! ```rust,no_run
//! use ndarray::array;
//! use snake_dqn::agent::DqnAgent;
//! use snake_dqn::config::AgentConfig;
//!
//! let config = AgentConfig::new(4, ["up", "right", "down", "left"]);
//! let mut agent = DqnAgent::new(config).unwrap();
//!
//! let state = array![0.0, 0.0, 1.0, 0.0];
//! let action = agent.act(state.view()).unwrap().to_string();
//! // ... apply `action` to the game ...
//! let next_state = array![0.0, 1.0, 0.0, 0.0];
//! agent.remember(state, &action, 1.0, next_state, false).unwrap();
//! agent.replay().unwrap();
//! ```

mod dqn;

pub use dqn::{td_targets, DqnAgent, EpisodeStats, ReplayOutcome};
