/***
# Grid Navigation

* The agent learns to walk from the top-left corner to the goal in the bottom-right of a 5x5 grid
* State: 25-dimensional one-hot vector of the agent's position
* Actions: "up", "right", "down", "left"
* Rewards: -1 per step, -5 for walking into a wall, +10 for reaching the goal
* Episodes end at the goal or after 50 steps
***/

use ndarray::Array1;
use snake_dqn::{
    agent::DqnAgent,
    config::AgentConfig,
    env::{Environment, Step},
    error::{DqnError, Result},
};

const GRID_SIZE: usize = 5;
const STATE_SIZE: usize = GRID_SIZE * GRID_SIZE;
const EPISODES: usize = 300;
const MAX_STEPS: usize = 50;

struct GridWorld {
    agent_pos: (usize, usize),
    goal_pos: (usize, usize),
}

impl GridWorld {
    fn new() -> Self {
        Self {
            agent_pos: (0, 0),
            goal_pos: (GRID_SIZE - 1, GRID_SIZE - 1),
        }
    }

    fn observe(&self) -> Array1<f32> {
        let mut state = Array1::zeros(STATE_SIZE);
        state[self.agent_pos.0 * GRID_SIZE + self.agent_pos.1] = 1.0;
        state
    }
}

impl Environment for GridWorld {
    fn state_size(&self) -> usize {
        STATE_SIZE
    }

    fn reset(&mut self) -> Array1<f32> {
        self.agent_pos = (0, 0);
        self.observe()
    }

    fn step(&mut self, action: &str) -> Result<Step> {
        let (row, col) = self.agent_pos;
        let new_pos = match action {
            "up" => (row.saturating_sub(1), col),
            "right" => (row, (col + 1).min(GRID_SIZE - 1)),
            "down" => ((row + 1).min(GRID_SIZE - 1), col),
            "left" => (row, col.saturating_sub(1)),
            other => return Err(DqnError::invalid_action(other)),
        };

        let reward = if new_pos == self.agent_pos {
            -5.0
        } else if new_pos == self.goal_pos {
            10.0
        } else {
            -1.0
        };
        self.agent_pos = new_pos;

        Ok(Step {
            next_state: self.observe(),
            reward,
            terminal: self.agent_pos == self.goal_pos,
        })
    }
}

fn main() -> Result<()> {
    println!("Training Grid Navigation Agent...");
    let start_time = std::time::Instant::now();

    let mut config = AgentConfig::new(STATE_SIZE, ["up", "right", "down", "left"]);
    config.memory_size = 5000;
    config.batch_size = 32;
    config.discount_rate = 0.9;
    config.exploration_rate_decay = 0.999;
    config.learning_rate = 0.001;
    config.hidden_layers = vec![32, 16];
    config.max_counter_to_update_target_nn = 100;
    config.seed = Some(7);

    let mut agent = DqnAgent::new(config)?;
    let mut env = GridWorld::new();
    let mut episode_rewards = Vec::with_capacity(EPISODES);

    for episode in 0..EPISODES {
        let stats = agent.run_episode(&mut env, MAX_STEPS)?;
        episode_rewards.push(stats.total_reward);

        if (episode + 1) % 50 == 0 {
            let recent = &episode_rewards[episode_rewards.len() - 50..];
            let avg_reward = recent.iter().sum::<f32>() / recent.len() as f32;
            println!(
                "Episode {}: Average Reward = {:.2}, Epsilon = {:.3}",
                episode + 1,
                avg_reward,
                agent.epsilon()
            );
        }
    }

    println!("\nTraining completed in {:?}", start_time.elapsed());

    println!("\nTesting trained agent (epsilon = 0)...");
    agent.set_epsilon(0.0);
    let mut state = env.reset();
    let mut path = vec![env.agent_pos];

    for step in 0..MAX_STEPS {
        let action = agent.best_action(state.view())?.to_string();
        let outcome = env.step(&action)?;
        path.push(env.agent_pos);
        state = outcome.next_state;

        if outcome.terminal {
            println!("  Reached goal in {} steps!", step + 1);
            println!("  Path: {:?}", path);
            return Ok(());
        }
    }
    println!("  Failed to reach goal in {} steps", MAX_STEPS);
    Ok(())
}
