//! # Activation Functions Module
//!
//! Element-wise non-linearities applied after a dense layer's affine transform.
//!
//! - **ReLU**: `max(0, x)`, used by the hidden layers of the Q-network
//! - **Linear**: identity, used by the output layer so Q-values stay unbounded

pub mod functions;

pub use functions::Activation;
