// --- Файл: src/data/dataset.rs ---

//! Заимствованное представление размеченного датасета в памяти.

use crate::error::{Result, TrainError};
use crate::tensor::{Labels, Tensor};
use ndarray::{ArrayView1, ArrayView2, Axis};

/// Признаки и метки одной выборки, заимствованные у вызывающего кода.
///
/// Каждая строка признаков - один пример; `labels[i]` - класс строки `i`.
#[derive(Debug, Clone, Copy)]
pub struct InMemoryDataset<'a> {
    features: ArrayView2<'a, f32>,
    labels: ArrayView1<'a, usize>,
}

impl<'a> InMemoryDataset<'a> {
    /// Оборачивает признаки и метки.
    ///
    /// Возвращает ошибку формы, если число строк различается.
    pub fn new(features: &'a Tensor, labels: &'a Labels) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(TrainError::shape(
                "dataset labels",
                &[features.nrows()],
                &[labels.len()],
            ));
        }
        Ok(Self {
            features: features.view(),
            labels: labels.view(),
        })
    }

    /// Количество примеров.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Ширина строки признаков.
    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    /// Копирует строки по `indices` в новый батч, в том же порядке.
    pub fn select(&self, indices: &[usize]) -> (Tensor, Labels) {
        (
            self.features.select(Axis(0), indices),
            self.labels.select(Axis(0), indices),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_in_memory_dataset() {
        let features = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let labels = array![0, 1, 0];
        let dataset = InMemoryDataset::new(&features, &labels).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.num_features(), 2);

        let (x, y) = dataset.select(&[2, 0]);
        assert_eq!(x, array![[5.0, 6.0], [1.0, 2.0]]);
        assert_eq!(y, array![0, 0]);
    }

    #[test]
    fn test_row_mismatch_rejected() {
        let features = Tensor::zeros((3, 2));
        let labels = array![0, 1];
        assert!(matches!(
            InMemoryDataset::new(&features, &labels),
            Err(TrainError::ShapeMismatch { .. })
        ));
    }
}
