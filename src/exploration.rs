use ndarray::ArrayView1;
use rand::Rng;

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon greedy exploration with a multiplicatively decaying epsilon.
///
/// The minimum is a soft floor: decay stops once epsilon is at or below it,
/// but a value set lower by hand is never raised back.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f32,
    min_epsilon: f32,
    decay: f32,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f32, min_epsilon: f32, decay: f32) -> Self {
        Self {
            epsilon,
            min_epsilon,
            decay,
        }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn min_epsilon(&self) -> f32 {
        self.min_epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon;
    }

    /// Draw from `[0, 1)` and explore when the draw is at most epsilon
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f32>() <= self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Apply one decay step and return the new epsilon
    pub fn decay(&mut self) -> f32 {
        if self.epsilon > self.min_epsilon {
            self.epsilon *= self.decay;
        }
        self.epsilon
    }
}

/// Index of the largest value, the first one on ties.
///
/// NaN entries never win; an all-NaN or empty input yields `None`.
pub fn argmax(values: ArrayView1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
