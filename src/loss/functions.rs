use ndarray::{Array2, ArrayView2};

/// Trait defining the interface for loss functions
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32;

    /// Compute the gradient of the loss with respect to the predictions
    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32>;
}

/// Mean squared error over every element of the batch
pub struct MSE;

impl Loss for MSE {
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        (&diff * &diff).mean().unwrap_or(0.0)
    }

    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        let n = predictions.len().max(1) as f32;
        (&predictions - &targets) * (2.0 / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn mse_matches_hand_computation() {
        let p = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let t = arr2(&[[1.0, 0.0], [3.0, 6.0]]);
        // squared errors: 0, 4, 0, 4
        assert_eq!(MSE.compute_batch(p.view(), t.view()), 2.0);
        assert_eq!(
            MSE.gradient_batch(p.view(), t.view()),
            arr2(&[[0.0, 1.0], [0.0, -1.0]])
        );
    }

    #[test]
    fn perfect_prediction_has_zero_loss() {
        let p = arr2(&[[0.5, -0.5]]);
        assert_eq!(MSE.compute_batch(p.view(), p.view()), 0.0);
    }
}
