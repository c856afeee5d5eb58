//! Метрики для задач классификации.

use super::Metric;
use crate::error::{Result, TrainError};
use crate::tensor::{argmax_row, Labels, Tensor};
use ndarray::Axis;

/// Число строк, у которых столбец arg-max совпадает с меткой.
pub fn count_correct(predictions: &Tensor, labels: &Labels) -> Result<usize> {
    if predictions.nrows() != labels.len() {
        return Err(TrainError::shape(
            "predictions vs labels",
            &[labels.len(), predictions.ncols()],
            predictions.shape(),
        ));
    }
    Ok(predictions
        .axis_iter(Axis(0))
        .zip(labels.iter())
        .filter(|(row, &label)| argmax_row(row.view()) == label)
        .count())
}

/// Точность (accuracy) для многоклассовых оценок.
///
/// Accuracy = correct / total, строка верна, если ее класс arg-max
/// совпадает с меткой.
#[derive(Debug, Clone, Default)]
pub struct Accuracy {
    correct: usize,
    total: usize,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Верные строки с момента последнего сброса.
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Все строки с момента последнего сброса.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Metric for Accuracy {
    type Prediction = Tensor;
    type Target = Labels;
    type Output = f64;

    fn update(&mut self, predictions: &Self::Prediction, targets: &Self::Target) -> Result<()> {
        self.correct += count_correct(predictions, targets)?;
        self.total += targets.len();
        Ok(())
    }

    fn compute(&self) -> Self::Output {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    fn reset(&mut self) {
        self.correct = 0;
        self.total = 0;
    }

    fn name(&self) -> &str {
        "Accuracy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_count_correct() {
        let scores = array![[0.9, 0.1], [0.2, 0.8], [0.6, 0.4]];
        assert_eq!(count_correct(&scores, &array![0, 1, 1]).unwrap(), 2);
    }

    #[test]
    fn test_accuracy_accumulates_batches() {
        let mut acc = Accuracy::new();
        acc.update(&array![[1.0, 0.0], [0.0, 1.0]], &array![0, 1]).unwrap();
        acc.update(&array![[1.0, 0.0], [1.0, 0.0]], &array![1, 1]).unwrap();

        assert_eq!(acc.correct(), 2);
        assert_eq!(acc.total(), 4);
        assert!((acc.compute() - 0.5).abs() < 1e-12);

        acc.reset();
        assert_eq!(acc.compute(), 0.0);
    }

    #[test]
    fn test_row_mismatch() {
        let mut acc = Accuracy::new();
        let err = acc.update(&array![[1.0, 0.0]], &array![0, 1]).unwrap_err();
        assert!(matches!(err, TrainError::ShapeMismatch { .. }));
    }
}
