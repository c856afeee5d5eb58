//! Crate-wide error type.

use thiserror::Error;

/// Errors produced by the container, the loops and the bundled collaborators.
#[derive(Error, Debug)]
pub enum TrainError {
    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Labels are required by a label-conditioned model in training mode")]
    MissingLabels,

    #[error("Dataset is empty, accuracy is undefined")]
    EmptyDataset,

    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("Label {label} is out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },

    #[error("Loss backward called before compute")]
    LossNotComputed,

    #[error("Layer backward called without a cached training forward pass")]
    NoForwardCache,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrainError {
    /// Builds a [`TrainError::ShapeMismatch`] from two shapes.
    pub fn shape(context: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        TrainError::ShapeMismatch {
            context: context.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrainError>;
