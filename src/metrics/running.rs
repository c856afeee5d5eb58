//! Накопители значений по батчам и история по эпохам.

use super::{Accuracy, Metric};
use crate::error::{Result, TrainError};
use crate::tensor::{Labels, Tensor};
use serde::{Deserialize, Serialize};

/// Простая накопительная сумма значений.
#[derive(Debug, Clone, Default)]
pub struct RunningSum {
    sum: f64,
    count: usize,
}

impl RunningSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn compute(&self) -> f64 {
        self.sum
    }

    /// Количество добавленных значений.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}

/// Накопитель эпохи: число верных предсказаний и сумма потерь.
///
/// Потери по батчам суммируются, а не усредняются, поэтому значение эпохи
/// растет с числом батчей.
#[derive(Debug, Clone, Default)]
pub struct EpochMetrics {
    accuracy: Accuracy,
    loss: RunningSum,
}

impl EpochMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Считает верные строки батча и возвращает их число.
    pub fn record_predictions(&mut self, predictions: &Tensor, labels: &Labels) -> Result<usize> {
        let before = self.accuracy.correct();
        self.accuracy.update(predictions, labels)?;
        Ok(self.accuracy.correct() - before)
    }

    /// Добавляет потерю батча к сумме.
    pub fn record_loss(&mut self, batch_loss: f32) {
        self.loss.update(batch_loss as f64);
    }

    pub fn correct(&self) -> usize {
        self.accuracy.correct()
    }

    pub fn loss_sum(&self) -> f64 {
        self.loss.compute()
    }

    pub fn batches(&self) -> usize {
        self.loss.count()
    }

    /// Завершает эпоху: `(correct / dataset_len, loss_sum)`.
    pub fn finish(&self, dataset_len: usize) -> Result<(f64, f64)> {
        if dataset_len == 0 {
            return Err(TrainError::EmptyDataset);
        }
        Ok((
            self.accuracy.correct() as f64 / dataset_len as f64,
            self.loss.compute(),
        ))
    }

    pub fn reset(&mut self) {
        self.accuracy.reset();
        self.loss.reset();
    }
}

/// Результаты обучения по эпохам, в порядке завершения.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainHistory {
    /// Точность по эпохам
    pub accuracy: Vec<f64>,
    /// Сумма потерь батчей по эпохам
    pub loss: Vec<f64>,
}

impl TrainHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, accuracy: f64, loss: f64) {
        self.accuracy.push(accuracy);
        self.loss.push(loss);
    }

    /// Количество завершенных эпох.
    pub fn epochs(&self) -> usize {
        self.accuracy.len()
    }

    /// Лучшая точность и ее эпоха (с нуля). При равенстве побеждает более ранняя.
    pub fn best_accuracy(&self) -> Option<(usize, f64)> {
        self.accuracy
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (epoch, acc)| match best {
                Some((_, b)) if b >= acc => best,
                _ => Some((epoch, acc)),
            })
    }

    /// Последняя пара `(accuracy, loss)`.
    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.accuracy.last()?, *self.loss.last()?))
    }

    /// Разделяет на последовательности `(accuracy, loss)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.accuracy, self.loss)
    }
}
