// --- File: src/losses.rs ---

//! Loss functions.
//!
//! A loss computes a scalar from integer labels and per-class scores, then
//! hands out the gradient seed for the most recent `compute` through
//! `backward`.
//!
//! # Available Loss Functions
//!
//! - **Cross-Entropy**: `CrossEntropyLoss` (softmax over raw scores, batch mean)
//! - **MSE**: `MseLoss` (against one-hot targets, mean over all elements)

use crate::error::{Result, TrainError};
use crate::tensor::{one_hot, Labels, Tensor};
use ndarray::Axis;

/// Common interface for loss functions used by the training loop.
pub trait Loss {
    /// Computes the loss for a batch and remembers what `backward` needs.
    fn compute(&mut self, labels: &Labels, predictions: &Tensor) -> Result<f32>;

    /// Gradient of the last computed loss w.r.t. the predictions, shaped like
    /// those predictions.
    fn backward(&mut self) -> Result<Tensor>;

    fn name(&self) -> &str;
}

fn check_labels(labels: &Labels, predictions: &Tensor) -> Result<()> {
    if labels.len() != predictions.nrows() {
        return Err(TrainError::shape(
            "loss labels",
            &[predictions.nrows()],
            &[labels.len()],
        ));
    }
    Ok(())
}

// ============================================================================
// Cross-Entropy Loss
// ============================================================================

/// Softmax cross-entropy over raw class scores.
///
/// Formula: `CE = mean_i(-log(softmax(x_i)[y_i]))`.
#[derive(Debug, Default)]
pub struct CrossEntropyLoss {
    grad: Option<Tensor>,
}

impl CrossEntropyLoss {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Row-wise softmax with max subtraction.
pub fn softmax(scores: &Tensor) -> Tensor {
    let mut probs = scores.clone();
    for mut row in probs.axis_iter_mut(Axis(0)) {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    probs
}

impl Loss for CrossEntropyLoss {
    fn compute(&mut self, labels: &Labels, predictions: &Tensor) -> Result<f32> {
        check_labels(labels, predictions)?;
        let n = predictions.nrows().max(1) as f32;
        let probs = softmax(predictions);
        let target = one_hot(labels, predictions.ncols())?;

        let loss = labels
            .iter()
            .enumerate()
            .map(|(i, &y)| -probs[[i, y]].max(f32::MIN_POSITIVE).ln())
            .sum::<f32>()
            / n;

        self.grad = Some((probs - target) / n);
        Ok(loss)
    }

    fn backward(&mut self) -> Result<Tensor> {
        self.grad.clone().ok_or(TrainError::LossNotComputed)
    }

    fn name(&self) -> &str {
        "CrossEntropy"
    }
}

// ============================================================================
// MSE Loss (Mean Squared Error)
// ============================================================================

/// Mean squared error between the scores and one-hot encoded labels.
///
/// Formula: `MSE = mean((y_pred - onehot(y))^2)`.
#[derive(Debug, Default)]
pub struct MseLoss {
    grad: Option<Tensor>,
}

impl MseLoss {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Loss for MseLoss {
    fn compute(&mut self, labels: &Labels, predictions: &Tensor) -> Result<f32> {
        check_labels(labels, predictions)?;
        let target = one_hot(labels, predictions.ncols())?;
        let error = predictions - &target;
        let count = error.len().max(1) as f32;

        let loss = error.mapv(|e| e * e).sum() / count;
        self.grad = Some(error * (2.0 / count));
        Ok(loss)
    }

    fn backward(&mut self) -> Result<Tensor> {
        self.grad.clone().ok_or(TrainError::LossNotComputed)
    }

    fn name(&self) -> &str {
        "MSE"
    }
}
