use ndarray::{arr1, arr2, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::approximator::QFunction;
use crate::error::DqnError;
use crate::layers::WeightInit;
use crate::network::NeuralNetwork;
use crate::optimizer::{OptimizerKind, OptimizerWrapper};

fn network(optimizer: OptimizerKind) -> NeuralNetwork {
    let mut rng = StdRng::seed_from_u64(8);
    NeuralNetwork::q_network(2, &[8, 8], 2, WeightInit::default(), optimizer, 0.01, &mut rng).unwrap()
}

#[test]
fn test_neural_network_creation() {
    let mut rng = StdRng::seed_from_u64(0);
    let network = NeuralNetwork::new(
        &[3, 4, 2],
        &[Activation::Relu, Activation::Linear],
        WeightInit::default(),
        OptimizerKind::Sgd,
        0.1,
        &mut rng,
    )
    .unwrap();

    assert_eq!(network.layers.len(), 2);
    assert_eq!(network.layers[0].weights.shape(), [3, 4]);
    assert_eq!(network.layers[0].biases.shape(), [4]);
    assert_eq!(network.layers[1].weights.shape(), [4, 2]);
    assert_eq!(network.input_size(), 3);
    assert_eq!(network.output_size(), 2);
}

#[test]
fn test_q_network_layout() {
    let mut rng = StdRng::seed_from_u64(0);
    let network = NeuralNetwork::q_network(
        11,
        &[64, 32],
        4,
        WeightInit::default(),
        OptimizerKind::RmsProp,
        0.01,
        &mut rng,
    )
    .unwrap();

    let activations: Vec<Activation> = network.layers.iter().map(|l| l.activation).collect();
    assert_eq!(activations, vec![Activation::Relu, Activation::Relu, Activation::Linear]);
    assert_eq!(network.layers[1].weights.shape(), [64, 32]);
}

#[test]
fn test_invalid_layouts_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    let init = WeightInit::default();
    assert!(NeuralNetwork::new(&[3], &[], init, OptimizerKind::Sgd, 0.1, &mut rng).is_err());
    assert!(NeuralNetwork::new(&[3, 2], &[], init, OptimizerKind::Sgd, 0.1, &mut rng).is_err());
    assert!(NeuralNetwork::new(&[3, 2], &[Activation::Linear], init, OptimizerKind::Sgd, 0.0, &mut rng).is_err());
}

#[test]
fn test_forward_batch_shapes() {
    let network = network(OptimizerKind::Sgd);
    let outputs = network.forward_batch(arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).view()).unwrap();
    assert_eq!(outputs.shape(), [3, 2]);

    let single = network.forward(arr1(&[1.0, 2.0]).view()).unwrap();
    assert_eq!(single, outputs.row(0));
}

#[test]
fn test_wrong_input_width() {
    let network = network(OptimizerKind::Sgd);
    assert!(matches!(
        network.forward_batch(Array2::zeros((1, 3)).view()),
        Err(DqnError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_predict_does_not_mutate() {
    let network = network(OptimizerKind::Adam);
    let before = network.layers.clone();
    let inputs = arr2(&[[0.3, -0.7]]);
    let a = network.predict(inputs.view()).unwrap();
    let b = network.predict(inputs.view()).unwrap();
    assert_eq!(a, b);
    assert_eq!(network.layers, before);
}

#[test]
fn test_fit_reduces_loss() {
    for optimizer in [OptimizerKind::Sgd, OptimizerKind::Adam, OptimizerKind::RmsProp] {
        let mut network = network(optimizer);
        let inputs = arr2(&[[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [0.5, 0.5]]);
        let targets = arr2(&[[1.0, -1.0], [0.5, 0.0], [1.5, -1.0], [1.0, -0.5]]);

        let first = network.fit(inputs.view(), targets.view(), 1, 4).unwrap();
        let last = network.fit(inputs.view(), targets.view(), 300, 4).unwrap();
        assert!(last < first, "{:?}: {} !< {}", optimizer, last, first);
    }
}

#[test]
fn test_fit_rejects_mismatched_targets() {
    let mut network = network(OptimizerKind::Sgd);
    let inputs = arr2(&[[0.0, 1.0]]);
    assert!(network.fit(inputs.view(), arr2(&[[1.0, 2.0, 3.0]]).view(), 1, 1).is_err());
    assert!(network.fit(inputs.view(), Array2::zeros((2, 2)).view(), 1, 1).is_err());
}

#[test]
fn test_fit_detects_divergence() {
    let mut network = network(OptimizerKind::Sgd);
    let inputs = arr2(&[[0.0, 1.0]]);
    let targets = arr2(&[[f32::INFINITY, 0.0]]);
    assert!(matches!(
        network.fit(inputs.view(), targets.view(), 1, 1),
        Err(DqnError::NumericalError(_))
    ));
}

#[test]
fn test_clone_is_independent() {
    let original = network(OptimizerKind::RmsProp);
    let mut copy = original.clone();
    let inputs = arr2(&[[0.2, 0.4]]);
    let targets = arr2(&[[5.0, 5.0]]);

    copy.fit(inputs.view(), targets.view(), 5, 1).unwrap();

    assert_ne!(copy.layers, original.layers);
    assert_eq!(original.layers, network(OptimizerKind::RmsProp).layers);
}

#[test]
fn test_save_load() {
    let network = network(OptimizerKind::Adam);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("net.bin");

    network.save(&path).unwrap();
    let loaded = NeuralNetwork::load(&path).unwrap();

    let inputs = arr2(&[[0.1, 0.9]]);
    assert_eq!(loaded.layers, network.layers);
    assert_eq!(
        loaded.forward_batch(inputs.view()).unwrap(),
        network.forward_batch(inputs.view()).unwrap()
    );
}

#[test]
fn test_weight_init_is_applied() {
    let mut rng = StdRng::seed_from_u64(4);
    let network =
        NeuralNetwork::q_network(3, &[5], 2, WeightInit::Zeros, OptimizerKind::Sgd, 0.1, &mut rng).unwrap();
    assert!(network.layers.iter().all(|l| l.weights.iter().all(|&w| w == 0.0)));

    let init = WeightInit::Uniform { min: 0.5, max: 0.75 };
    let network = NeuralNetwork::q_network(3, &[5], 2, init, OptimizerKind::Sgd, 0.1, &mut rng).unwrap();
    assert!(network
        .layers
        .iter()
        .all(|l| l.weights.iter().all(|&w| (0.5..0.75).contains(&w))));
}

#[test]
fn test_hidden_sizes() {
    assert_eq!(network(OptimizerKind::Sgd).hidden_sizes(), vec![8, 8]);
}

#[test]
fn test_reset_optimizer() {
    let mut network = network(OptimizerKind::RmsProp);
    network.reset_optimizer(OptimizerKind::Sgd, 0.5).unwrap();
    assert!(matches!(network.optimizer, OptimizerWrapper::SGD(_)));
    assert_eq!(network.learning_rate, 0.5);

    assert!(matches!(
        network.reset_optimizer(OptimizerKind::Adam, 0.0),
        Err(DqnError::Configuration { .. })
    ));
    assert_eq!(network.learning_rate, 0.5);
}
