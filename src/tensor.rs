// --- File: src/tensor.rs ---

//! Tensor aliases and the small row-wise helpers shared by layers, losses
//! and metrics.
//!
//! Every tensor that flows through a model is a 2-D `f32` array whose rows
//! are examples. Labels are integer class indices, one per row.

use crate::error::{Result, TrainError};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// A batch of row vectors, `[batch_size, features]`.
pub type Tensor = Array2<f32>;

/// Integer class labels, one per row of the matching [`Tensor`].
pub type Labels = Array1<usize>;

/// Index of the largest value in a row. Ties resolve to the lowest index,
/// NaN compares as equal.
pub fn argmax_row(row: ArrayView1<f32>) -> usize {
    let mut best = 0;
    for (idx, &value) in row.iter().enumerate() {
        if value > row[best] {
            best = idx;
        }
    }
    best
}

/// Arg-max class per row.
pub fn argmax(scores: &Tensor) -> Vec<usize> {
    scores.axis_iter(Axis(0)).map(argmax_row).collect()
}

/// Fails with a shape mismatch when `tensor` does not have `rows` rows.
pub fn ensure_rows(context: &str, tensor: &Tensor, rows: usize) -> Result<()> {
    if tensor.nrows() != rows {
        return Err(TrainError::shape(
            context,
            &[rows, tensor.ncols()],
            tensor.shape(),
        ));
    }
    Ok(())
}

/// Fails with a shape mismatch when two tensors differ in shape.
pub fn ensure_same_shape(context: &str, expected: &Tensor, actual: &Tensor) -> Result<()> {
    if expected.shape() != actual.shape() {
        return Err(TrainError::shape(context, expected.shape(), actual.shape()));
    }
    Ok(())
}

/// One-hot encodes `labels` into `[labels.len(), num_classes]`.
pub fn one_hot(labels: &Labels, num_classes: usize) -> Result<Tensor> {
    let mut encoded = Tensor::zeros((labels.len(), num_classes));
    for (row, &label) in labels.iter().enumerate() {
        if label >= num_classes {
            return Err(TrainError::LabelOutOfRange { label, num_classes });
        }
        encoded[[row, label]] = 1.0;
    }
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_argmax_per_row() {
        let scores = array![[0.1, 0.9, 0.0], [2.0, -1.0, 1.5], [0.0, 0.0, 3.0]];
        assert_eq!(argmax(&scores), vec![1, 0, 2]);
    }

    #[test]
    fn test_argmax_ties_pick_first() {
        let scores = array![[0.5, 0.5], [1.0, 1.0]];
        assert_eq!(argmax(&scores), vec![0, 0]);
    }

    #[test]
    fn test_one_hot() {
        let labels = array![2, 0];
        let encoded = one_hot(&labels, 3).unwrap();
        assert_eq!(encoded, array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_one_hot_rejects_out_of_range() {
        let labels = array![0, 3];
        let err = one_hot(&labels, 3).unwrap_err();
        assert!(matches!(err, TrainError::LabelOutOfRange { label: 3, num_classes: 3 }));
    }

    #[test]
    fn test_ensure_rows() {
        let t = Tensor::zeros((4, 2));
        assert!(ensure_rows("t", &t, 4).is_ok());
        assert!(matches!(
            ensure_rows("t", &t, 3),
            Err(TrainError::ShapeMismatch { .. })
        ));
    }
}
