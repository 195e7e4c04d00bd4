//! Gradient-descent update rules for the dense Q-network.
//!
//! Adaptive optimizers keep one moment buffer per layer, so every update is
//! addressed by the index of the layer it belongs to.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::layers::DenseLayer;

pub trait Optimizer {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);

    /// Advance per-update state. Called once before each minibatch update.
    fn step(&mut self) {}
}

/// Optimizer selection as it appears in the agent configuration
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    Sgd,
    Adam,
    #[default]
    RmsProp,
}

impl OptimizerKind {
    /// Build an optimizer with moment buffers shaped after `layers`
    pub fn build(self, layers: &[DenseLayer]) -> OptimizerWrapper {
        match self {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam => OptimizerWrapper::Adam(Adam::default(layers)),
            OptimizerKind::RmsProp => OptimizerWrapper::RMSProp(RMSProp::default(layers)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
    RMSProp(RMSProp),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }

    fn step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.step(),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.step(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    pub t: i32,
}

impl Adam {
    pub fn new(layers: &[DenseLayer], beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: zeros_like_weights(layers),
            v_weights: zeros_like_weights(layers),
            m_biases: zeros_like_biases(layers),
            v_biases: zeros_like_biases(layers),
            t: 0,
        }
    }

    pub fn default(layers: &[DenseLayer]) -> Self {
        Self::new(layers, 0.9, 0.999, 1e-7)
    }

    fn corrected_step(&self, m: f32, v: f32) -> f32 {
        let m_hat = m / (1.0 - self.beta1.powi(self.t));
        let v_hat = v / (1.0 - self.beta2.powi(self.t));
        m_hat / (v_hat.sqrt() + self.epsilon)
    }
}

impl Optimizer for Adam {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (beta1, beta2) = (self.beta1, self.beta2);
        self.m_weights[layer].zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        self.v_weights[layer].zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let mut delta = self.m_weights[layer].clone();
        delta.zip_mut_with(&self.v_weights[layer], |m, &v| *m = self.corrected_step(*m, v));
        weights.zip_mut_with(&delta, |w, &d| *w -= learning_rate * d);
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (beta1, beta2) = (self.beta1, self.beta2);
        self.m_biases[layer].zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        self.v_biases[layer].zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let mut delta = self.m_biases[layer].clone();
        delta.zip_mut_with(&self.v_biases[layer], |m, &v| *m = self.corrected_step(*m, v));
        biases.zip_mut_with(&delta, |b, &d| *b -= learning_rate * d);
    }

    fn step(&mut self) {
        self.t += 1;
    }
}

/// RMSProp optimizer
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RMSProp {
    pub rho: f32,
    pub epsilon: f32,
    v_weights: Vec<Array2<f32>>,
    v_biases: Vec<Array1<f32>>,
}

impl RMSProp {
    pub fn new(layers: &[DenseLayer], rho: f32, epsilon: f32) -> Self {
        RMSProp {
            rho,
            epsilon,
            v_weights: zeros_like_weights(layers),
            v_biases: zeros_like_biases(layers),
        }
    }

    pub fn default(layers: &[DenseLayer]) -> Self {
        Self::new(layers, 0.9, 1e-7)
    }
}

impl Optimizer for RMSProp {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (rho, epsilon) = (self.rho, self.epsilon);
        let v = &mut self.v_weights[layer];
        v.zip_mut_with(gradients, |v, &g| *v = rho * *v + (1.0 - rho) * g * g);
        ndarray::Zip::from(weights)
            .and(gradients)
            .and(&*v)
            .for_each(|w, &g, &v| *w -= learning_rate * g / (v.sqrt() + epsilon));
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (rho, epsilon) = (self.rho, self.epsilon);
        let v = &mut self.v_biases[layer];
        v.zip_mut_with(gradients, |v, &g| *v = rho * *v + (1.0 - rho) * g * g);
        ndarray::Zip::from(biases)
            .and(gradients)
            .and(&*v)
            .for_each(|b, &g, &v| *b -= learning_rate * g / (v.sqrt() + epsilon));
    }
}

fn zeros_like_weights(layers: &[DenseLayer]) -> Vec<Array2<f32>> {
    layers
        .iter()
        .map(|layer| Array2::<f32>::zeros(layer.weights.dim()))
        .collect()
}

fn zeros_like_biases(layers: &[DenseLayer]) -> Vec<Array1<f32>> {
    layers
        .iter()
        .map(|layer| Array1::<f32>::zeros(layer.biases.dim()))
        .collect()
}
