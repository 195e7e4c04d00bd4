pub mod dense;
pub mod initialization;

pub use dense::{DenseLayer, LayerCache};
pub use initialization::WeightInit;
