//! Agent hyperparameters.
//!
//! Every field except `state_size` and `actions` has a default, so a JSON
//! file only needs to name what it overrides:
//!
//! ```rust
//! use snake_dqn::config::AgentConfig;
//!
//! let config = AgentConfig::from_json_str(
//!     r#"{ "state_size": 4, "actions": ["up", "right", "down", "left"], "batch_size": 32 }"#,
//! ).unwrap();
//! assert_eq!(config.batch_size, 32);
//! assert_eq!(config.memory_size, 1000);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DqnError, Result};
use crate::layers::WeightInit;
use crate::optimizer::OptimizerKind;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgentConfig {
    /// Length of every state vector
    pub state_size: usize,
    /// Ordered, unique action names
    pub actions: Vec<String>,
    /// Experience buffer capacity
    #[serde(default = "defaults::memory_size")]
    pub memory_size: usize,
    /// Discount factor gamma
    #[serde(default = "defaults::discount_rate")]
    pub discount_rate: f32,
    /// Initial epsilon
    #[serde(default = "defaults::exploration_rate")]
    pub exploration_rate: f32,
    #[serde(default = "defaults::min_exploration_rate")]
    pub min_exploration_rate: f32,
    /// Multiplier applied to epsilon after each training step
    #[serde(default = "defaults::exploration_rate_decay")]
    pub exploration_rate_decay: f32,
    #[serde(default = "defaults::learning_rate")]
    pub learning_rate: f32,
    /// Transitions sampled per training step
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,
    /// Training steps between target network syncs
    #[serde(default = "defaults::max_counter_to_update_target_nn")]
    pub max_counter_to_update_target_nn: usize,
    /// Passes over each sampled batch
    #[serde(default = "defaults::epochs")]
    pub epochs: usize,
    /// Rows per gradient step inside a fit call
    #[serde(default = "defaults::fit_batch_size")]
    pub fit_batch_size: usize,
    #[serde(default = "defaults::hidden_layers")]
    pub hidden_layers: Vec<usize>,
    #[serde(default)]
    pub optimizer: OptimizerKind,
    /// Weight initialization of every layer, e.g. `"he_normal"` or
    /// `{ "uniform": { "min": -0.1, "max": 0.1 } }`
    #[serde(default)]
    pub weight_init: WeightInit,
    /// Seed for weight initialization, exploration and sampling
    #[serde(default)]
    pub seed: Option<u64>,
}

mod defaults {
    pub fn memory_size() -> usize {
        1000
    }
    pub fn discount_rate() -> f32 {
        0.5
    }
    pub fn exploration_rate() -> f32 {
        1.0
    }
    pub fn min_exploration_rate() -> f32 {
        0.1
    }
    pub fn exploration_rate_decay() -> f32 {
        0.9995
    }
    pub fn learning_rate() -> f32 {
        0.01
    }
    pub fn batch_size() -> usize {
        2
    }
    pub fn max_counter_to_update_target_nn() -> usize {
        200
    }
    pub fn epochs() -> usize {
        1
    }
    pub fn fit_batch_size() -> usize {
        32
    }
    pub fn hidden_layers() -> Vec<usize> {
        vec![64, 32]
    }
}

impl AgentConfig {
    /// Default hyperparameters for the given state width and action set
    pub fn new<I, S>(state_size: usize, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AgentConfig {
            state_size,
            actions: actions.into_iter().map(Into::into).collect(),
            memory_size: defaults::memory_size(),
            discount_rate: defaults::discount_rate(),
            exploration_rate: defaults::exploration_rate(),
            min_exploration_rate: defaults::min_exploration_rate(),
            exploration_rate_decay: defaults::exploration_rate_decay(),
            learning_rate: defaults::learning_rate(),
            batch_size: defaults::batch_size(),
            max_counter_to_update_target_nn: defaults::max_counter_to_update_target_nn(),
            epochs: defaults::epochs(),
            fit_batch_size: defaults::fit_batch_size(),
            hidden_layers: defaults::hidden_layers(),
            optimizer: OptimizerKind::default(),
            weight_init: WeightInit::default(),
            seed: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn action_size(&self) -> usize {
        self.actions.len()
    }

    /// Reject hyperparameters the agent cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.state_size == 0 {
            return Err(DqnError::configuration("state_size", "must be greater than 0"));
        }
        if self.actions.is_empty() {
            return Err(DqnError::configuration("actions", "action set must not be empty"));
        }
        if self.memory_size == 0 {
            return Err(DqnError::configuration("memory_size", "must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(DqnError::configuration("batch_size", "must be greater than 0"));
        }
        if self.epochs == 0 {
            return Err(DqnError::configuration("epochs", "must be greater than 0"));
        }
        if self.fit_batch_size == 0 {
            return Err(DqnError::configuration("fit_batch_size", "must be greater than 0"));
        }
        if self.hidden_layers.contains(&0) {
            return Err(DqnError::configuration("hidden_layers", "layers need at least one unit"));
        }
        if let WeightInit::Uniform { min, max } = self.weight_init {
            if !(min < max) {
                return Err(DqnError::configuration(
                    "weight_init",
                    "uniform range must satisfy min < max",
                ));
            }
        }
        check_unit_interval("discount_rate", self.discount_rate)?;
        check_unit_interval("exploration_rate", self.exploration_rate)?;
        check_unit_interval("min_exploration_rate", self.min_exploration_rate)?;
        if !(self.exploration_rate_decay > 0.0 && self.exploration_rate_decay <= 1.0) {
            return Err(DqnError::configuration(
                "exploration_rate_decay",
                "must be in the interval (0, 1]",
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(DqnError::configuration("learning_rate", "must be positive and finite"));
        }

        if self.min_exploration_rate > self.exploration_rate {
            warn!(
                "min_exploration_rate {} exceeds exploration_rate {}; epsilon will never decay",
                self.min_exploration_rate, self.exploration_rate
            );
        }
        if self.memory_size <= self.batch_size {
            warn!(
                "memory_size {} <= batch_size {}; replay will never train",
                self.memory_size, self.batch_size
            );
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DqnError::Configuration {
            name: name.to_string(),
            reason: format!("{} is outside the interval [0, 1]", value),
        })
    }
}
