use log::{debug, info, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use crate::approximator::QFunction;
use crate::config::AgentConfig;
use crate::encoder::ActionEncoder;
use crate::env::Environment;
use crate::error::{DqnError, Result};
use crate::exploration::{argmax, Choice, EpsilonGreedy};
use crate::network::NeuralNetwork;
use crate::replay_buffer::{ExperienceBuffer, Transition, TransitionBatch};
use crate::target::TargetNetwork;

/// What a call to [`DqnAgent::replay`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayOutcome {
    /// Not enough history yet; nothing was touched
    Skipped { buffered: usize, required: usize },
    /// One fit step ran
    Trained {
        loss: f32,
        epsilon: f32,
        target_synced: bool,
    },
}

impl ReplayOutcome {
    pub fn trained(&self) -> bool {
        matches!(self, ReplayOutcome::Trained { .. })
    }
}

/// Totals for one episode driven by [`DqnAgent::run_episode`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStats {
    pub steps: usize,
    pub total_reward: f32,
    pub training_steps: usize,
    pub terminated: bool,
}

/// Build the regression targets for one replay batch.
///
/// `targets = rewards * actions + terminals * (gamma * target_values) + policy_values`
///
/// Rewards land on the taken action's column through the one-hot `actions`,
/// the discounted target-network term is weighted by the terminal flag, and the
/// policy's own prediction is added to every column. This is an additive
/// approximation of the textbook update, which substitutes
/// `r + gamma * max Q'` into the acted column only.
pub fn td_targets(
    batch: &TransitionBatch,
    target_values: ArrayView2<f32>,
    policy_values: ArrayView2<f32>,
    gamma: f32,
) -> Result<Array2<f32>> {
    let expected = batch.actions.dim();
    for (label, dim) in [("target", target_values.dim()), ("policy", policy_values.dim())] {
        if dim != expected {
            return Err(DqnError::DimensionMismatch {
                expected: format!("{} values of shape {:?}", label, expected),
                actual: format!("{:?}", dim),
            });
        }
    }

    let rewards = batch.rewards.view().insert_axis(Axis(1));
    let terminals = batch.terminals.view().insert_axis(Axis(1));

    let reward_term = &batch.actions * &rewards;
    let future_term = &(&target_values * gamma) * &terminals;
    Ok(reward_term + &future_term + &policy_values)
}

/// Deep Q-learning agent with experience replay and a hard-synced target network
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use snake_dqn::agent::DqnAgent;
/// use snake_dqn::config::AgentConfig;
///
/// let mut config = AgentConfig::new(4, ["up", "right", "down", "left"]);
/// config.seed = Some(42);
/// let mut agent = DqnAgent::new(config).unwrap();
///
/// let state = array![0.0, 1.0, 0.0, 0.0];
/// let action = agent.act(state.view()).unwrap().to_string();
/// agent.remember(state.clone(), &action, 1.0, state, false).unwrap();
/// agent.replay().unwrap();
/// ```
pub struct DqnAgent<Q = NeuralNetwork, R = StdRng> {
    config: AgentConfig,
    encoder: ActionEncoder,
    memory: ExperienceBuffer,
    policy: Q,
    target: TargetNetwork<Q>,
    exploration: EpsilonGreedy,
    rng: R,
}

impl DqnAgent<NeuralNetwork, StdRng> {
    /// Create an agent with a freshly initialized dense Q-network.
    ///
    /// The network is `state_size -> hidden_layers (ReLU) -> action_size (linear)`.
    /// `config.seed` makes weights, exploration and sampling reproducible.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let policy = NeuralNetwork::q_network(
            config.state_size,
            &config.hidden_layers,
            config.action_size(),
            config.weight_init,
            config.optimizer,
            config.learning_rate,
            &mut rng,
        )?;
        Self::with_network(config, policy, rng)
    }

    /// Write the policy network to `path`
    pub fn save_policy<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.policy.save(path)
    }

    /// Create an agent whose policy and target start from a saved network.
    ///
    /// The saved layout must match `config`. The optimizer is rebuilt from
    /// `config.optimizer` and `config.learning_rate`, so training resumes with
    /// the configured hyperparameters and fresh moment estimates.
    pub fn load_policy<P: AsRef<Path>>(config: AgentConfig, path: P) -> Result<Self> {
        config.validate()?;
        let mut policy = NeuralNetwork::load(path)?;
        if policy.input_size() != config.state_size || policy.output_size() != config.action_size() {
            return Err(DqnError::DimensionMismatch {
                expected: format!("network {} -> {}", config.state_size, config.action_size()),
                actual: format!("network {} -> {}", policy.input_size(), policy.output_size()),
            });
        }
        let hidden = policy.hidden_sizes();
        if hidden != config.hidden_layers {
            return Err(DqnError::Configuration {
                name: "hidden_layers".to_string(),
                reason: format!(
                    "saved network has hidden layers {:?}, configuration asks for {:?}",
                    hidden, config.hidden_layers
                ),
            });
        }
        policy.reset_optimizer(config.optimizer, config.learning_rate)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_network(config, policy, rng)
    }
}

impl<Q: QFunction, R: Rng> DqnAgent<Q, R> {
    /// Create an agent around any [`QFunction`] and random source.
    pub fn with_network(config: AgentConfig, policy: Q, rng: R) -> Result<Self> {
        config.validate()?;
        let encoder = ActionEncoder::new(config.actions.iter().cloned())?;
        let action_values = policy.predict_one(Array1::zeros(config.state_size).view())?;
        if action_values.len() != encoder.len() {
            return Err(DqnError::dimension_mismatch(
                format!("{} action values per state", encoder.len()),
                format!("{}", action_values.len()),
            ));
        }
        let memory = ExperienceBuffer::new(config.memory_size)?;
        let target = TargetNetwork::new(&policy, config.max_counter_to_update_target_nn);
        let exploration = EpsilonGreedy::new(
            config.exploration_rate,
            config.min_exploration_rate,
            config.exploration_rate_decay,
        );

        info!(
            "dqn agent ready: state_size={} actions={:?} memory={} batch={}",
            config.state_size, config.actions, config.memory_size, config.batch_size
        );

        Ok(DqnAgent {
            config,
            encoder,
            memory,
            policy,
            target,
            exploration,
            rng,
        })
    }

    /// Record a transition in the experience buffer.
    pub fn remember(
        &mut self,
        state: Array1<f32>,
        action: &str,
        reward: f32,
        next_state: Array1<f32>,
        terminal: bool,
    ) -> Result<()> {
        self.check_state(state.view())?;
        self.check_state(next_state.view())?;
        let action = self.encoder.encode(action)?;
        self.memory.remember(Transition {
            state,
            action,
            reward,
            next_state,
            terminal,
        });
        Ok(())
    }

    /// Index of the epsilon-greedy action for `state`
    pub fn act_index(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        self.check_state(state)?;
        match self.exploration.choose(&mut self.rng) {
            Choice::Explore => Ok(self.rng.gen_range(0..self.encoder.len())),
            Choice::Exploit => self.greedy_index(state),
        }
    }

    /// Epsilon-greedy action name for `state`
    pub fn act(&mut self, state: ArrayView1<f32>) -> Result<&str> {
        let index = self.act_index(state)?;
        self.encoder.name(index)
    }

    /// Highest-valued action under the current policy, ignoring epsilon
    pub fn best_action(&self, state: ArrayView1<f32>) -> Result<&str> {
        self.check_state(state)?;
        let index = self.greedy_index(state)?;
        self.encoder.name(index)
    }

    /// Train the policy on one sampled batch.
    ///
    /// Does nothing until the buffer holds more than `batch_size` transitions.
    /// Otherwise fits the policy once, decays epsilon and ticks the target
    /// network's sync counter.
    pub fn replay(&mut self) -> Result<ReplayOutcome> {
        let batch_size = self.config.batch_size;
        if self.memory.len() <= batch_size {
            debug!(
                "replay skipped: {} transitions buffered, need more than {}",
                self.memory.len(),
                batch_size
            );
            return Ok(ReplayOutcome::Skipped {
                buffered: self.memory.len(),
                required: batch_size + 1,
            });
        }

        let batch = self.memory.sample(batch_size, &mut self.rng)?;
        let target_values = self.target.get_target_values(batch.next_states.view())?;
        let policy_values = self.policy.predict(batch.states.view())?;
        let targets = td_targets(
            &batch,
            target_values.view(),
            policy_values.view(),
            self.config.discount_rate,
        )?;

        let loss = self.policy.fit(
            batch.states.view(),
            targets.view(),
            self.config.epochs,
            self.config.fit_batch_size,
        )?;
        let epsilon = self.exploration.decay();
        let target_synced = self.target.tick(&self.policy);
        trace!("replay loss={:.6} epsilon={:.4} synced={}", loss, epsilon, target_synced);

        Ok(ReplayOutcome::Trained {
            loss,
            epsilon,
            target_synced,
        })
    }

    /// Play one episode: act, step, remember and replay until the episode
    /// ends or `max_steps` steps have run.
    pub fn run_episode<E: Environment>(&mut self, env: &mut E, max_steps: usize) -> Result<EpisodeStats> {
        if env.state_size() != self.config.state_size {
            return Err(DqnError::dimension_mismatch(
                format!("environment state size {}", self.config.state_size),
                format!("{}", env.state_size()),
            ));
        }

        let mut stats = EpisodeStats {
            steps: 0,
            total_reward: 0.0,
            training_steps: 0,
            terminated: false,
        };
        let mut state = env.reset();

        while stats.steps < max_steps {
            let action = self.act(state.view())?.to_string();
            let step = env.step(&action)?;
            self.remember(state, &action, step.reward, step.next_state.clone(), step.terminal)?;
            if self.replay()?.trained() {
                stats.training_steps += 1;
            }

            stats.steps += 1;
            stats.total_reward += step.reward;
            state = step.next_state;
            if step.terminal {
                stats.terminated = true;
                break;
            }
        }

        info!(
            "episode finished: steps={} reward={:.3} epsilon={:.4}",
            stats.steps,
            stats.total_reward,
            self.exploration.epsilon()
        );
        Ok(stats)
    }

    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon()
    }

    /// Override epsilon, e.g. set it to 0.0 for a purely greedy evaluation run
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.exploration.set_epsilon(epsilon);
    }

    pub fn sync_counter(&self) -> usize {
        self.target.counter()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn encoder(&self) -> &ActionEncoder {
        &self.encoder
    }

    pub fn memory(&self) -> &ExperienceBuffer {
        &self.memory
    }

    pub fn policy(&self) -> &Q {
        &self.policy
    }

    pub fn target(&self) -> &TargetNetwork<Q> {
        &self.target
    }

    fn greedy_index(&self, state: ArrayView1<f32>) -> Result<usize> {
        let values = self.policy.predict_one(state)?;
        if values.len() != self.encoder.len() {
            return Err(DqnError::dimension_mismatch(
                format!("{} action values", self.encoder.len()),
                format!("{}", values.len()),
            ));
        }
        argmax(values.view())
            .ok_or_else(|| DqnError::NumericalError("policy produced no finite action value".to_string()))
    }

    fn check_state(&self, state: ArrayView1<f32>) -> Result<()> {
        if state.len() != self.config.state_size {
            return Err(DqnError::dimension_mismatch(
                format!("state of length {}", self.config.state_size),
                format!("length {}", state.len()),
            ));
        }
        Ok(())
    }
}
