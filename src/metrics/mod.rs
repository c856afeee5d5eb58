//! Метрики, накапливаемые циклами обучения и оценки.
//!
//! - **Классификация**: [`Accuracy`] (arg-max против целочисленных меток)
//! - **Накопители**: [`RunningSum`], накопитель эпохи [`EpochMetrics`]
//!   и история [`TrainHistory`], которую возвращает обучение
//!
//! # Пример
//!
//! ```rust,ignore
//! use rustyseq::metrics::{Accuracy, Metric};
//!
//! let mut accuracy = Accuracy::new();
//! accuracy.update(&predictions, &labels)?;
//! println!("Accuracy: {:.4}", accuracy.compute());
//! accuracy.reset();
//! ```

pub mod classification;
pub mod running;

use crate::error::Result;

pub use classification::{count_correct, Accuracy};
pub use running::{EpochMetrics, RunningSum, TrainHistory};

/// Базовый трейт для всех метрик.
pub trait Metric {
    /// Тип предсказаний
    type Prediction;
    /// Тип целевых значений
    type Target;
    /// Тип результата
    type Output;

    /// Добавляет батч в состояние метрики.
    fn update(&mut self, predictions: &Self::Prediction, targets: &Self::Target) -> Result<()>;

    /// Текущее значение метрики.
    fn compute(&self) -> Self::Output;

    fn reset(&mut self);

    fn name(&self) -> &str;
}
