use bincode::{deserialize, serialize};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::loss::{Loss, MSE};
use crate::optimizer::{Optimizer, OptimizerKind, OptimizerWrapper};

/// A feed-forward network of dense layers trained with mean squared error.
///
/// This is the Q-network used by the agent: state vectors go in, one raw
/// action-value per action comes out.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
    pub learning_rate: f32,
}

impl NeuralNetwork {
    /// Create a new neural network with the given layer sizes and activations.
    ///
    /// `layer_sizes` lists the input width followed by every layer's unit count,
    /// so `activations` must be one shorter. Weights are drawn from `rng`
    /// according to `init`.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        init: WeightInit,
        optimizer: OptimizerKind,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DqnError::configuration(
                "layer_sizes",
                "network must have at least input and output layers",
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(DqnError::configuration(
                "activations",
                "number of activations must match number of layers - 1",
            ));
        }
        if learning_rate.is_nan() || learning_rate <= 0.0 {
            return Err(DqnError::configuration(
                "learning_rate",
                "learning rate must be positive",
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| {
                DenseLayer::new(window[0], window[1], activation, init, rng)
            })
            .collect::<Result<Vec<_>>>()?;
        let optimizer = optimizer.build(&layers);

        Ok(NeuralNetwork {
            layers,
            optimizer,
            learning_rate,
        })
    }

    /// Build the Q-network layout: ReLU hidden layers and a linear output.
    pub fn q_network<R: Rng + ?Sized>(
        state_size: usize,
        hidden: &[usize],
        action_size: usize,
        init: WeightInit,
        optimizer: OptimizerKind,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let mut layer_sizes = Vec::with_capacity(hidden.len() + 2);
        layer_sizes.push(state_size);
        layer_sizes.extend_from_slice(hidden);
        layer_sizes.push(action_size);

        let mut activations = vec![Activation::Relu; hidden.len()];
        activations.push(Activation::Linear);

        Self::new(&layer_sizes, &activations, init, optimizer, learning_rate, rng)
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    /// Unit counts of every layer except the output layer
    pub fn hidden_sizes(&self) -> Vec<usize> {
        let hidden = self.layers.len().saturating_sub(1);
        self.layers[..hidden].iter().map(DenseLayer::output_size).collect()
    }

    /// Replace the optimizer with a fresh one of `kind` and set the learning rate.
    ///
    /// Any accumulated moment estimates are discarded.
    pub fn reset_optimizer(&mut self, kind: OptimizerKind, learning_rate: f32) -> Result<()> {
        if learning_rate.is_nan() || learning_rate <= 0.0 {
            return Err(DqnError::configuration(
                "learning_rate",
                "learning rate must be positive",
            ));
        }
        self.optimizer = kind.build(&self.layers);
        self.learning_rate = learning_rate;
        Ok(())
    }

    /// Perform a forward pass for a single input vector.
    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Perform a forward pass for a batch of input vectors.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(inputs)?;
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            current = layer.forward_batch(current.view());
        }
        Ok(current)
    }

    /// Run one gradient step on a minibatch and return its loss before the update.
    pub fn train_minibatch(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<f32> {
        self.check_input(inputs)?;
        if targets.dim() != (inputs.nrows(), self.output_size()) {
            return Err(DqnError::dimension_mismatch(
                format!("targets of shape ({}, {})", inputs.nrows(), self.output_size()),
                format!("{:?}", targets.dim()),
            ));
        }

        let mut caches = Vec::with_capacity(self.layers.len());
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            let (output, cache) = layer.forward_cached(current.view());
            caches.push(cache);
            current = output;
        }

        let loss = MSE.compute_batch(current.view(), targets);
        if !loss.is_finite() {
            return Err(DqnError::NumericalError(format!("loss diverged to {}", loss)));
        }

        let mut error = MSE.gradient_batch(current.view(), targets);
        let mut gradients = Vec::with_capacity(self.layers.len());
        for (layer, cache) in self.layers.iter().zip(caches.iter()).rev() {
            let (input_error, grads) = layer.backward_batch(cache, error.view());
            gradients.push(grads);
            error = input_error;
        }
        gradients.reverse();

        self.optimizer.step();
        let learning_rate = self.learning_rate;
        for (index, (layer, grads)) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(index, &mut layer.weights, &grads.weights, learning_rate);
            self.optimizer.update_biases(index, &mut layer.biases, &grads.biases, learning_rate);
        }

        Ok(loss)
    }

    /// Train for `epochs` passes over the data in order, `batch_size` rows at a time.
    ///
    /// Returns the mean minibatch loss of the last epoch.
    pub fn fit(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        epochs: usize,
        batch_size: usize,
    ) -> Result<f32> {
        if inputs.nrows() != targets.nrows() {
            return Err(DqnError::dimension_mismatch(
                format!("{} target rows", inputs.nrows()),
                format!("{}", targets.nrows()),
            ));
        }
        if inputs.nrows() == 0 {
            return Err(DqnError::EmptyBuffer("no rows to fit".to_string()));
        }
        let batch_size = batch_size.max(1);

        let mut epoch_loss = 0.0;
        for _ in 0..epochs {
            let mut total = 0.0;
            let mut batches = 0;
            for start in (0..inputs.nrows()).step_by(batch_size) {
                let end = (start + batch_size).min(inputs.nrows());
                total += self.train_minibatch(
                    inputs.slice(s![start..end, ..]),
                    targets.slice(s![start..end, ..]),
                )?;
                batches += 1;
            }
            epoch_loss = total / batches as f32;
        }
        Ok(epoch_loss)
    }

    /// Save the network, optimizer state included, to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&serialized)?;
        Ok(())
    }

    /// Load a network previously written by [`NeuralNetwork::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = fs::File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(deserialize(&buffer)?)
    }

    fn check_input(&self, inputs: ArrayView2<f32>) -> Result<()> {
        if inputs.ncols() != self.input_size() {
            return Err(DqnError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{}", inputs.ncols()),
            ));
        }
        Ok(())
    }
}
