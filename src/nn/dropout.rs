//! Модуль, реализующий слой Dropout для регуляризации.
//!
//! В режиме обучения случайно обнуляет элементы, а оставшиеся масштабирует
//! на `1 / (1 - p)`, чтобы матожидание активации не менялось. В режиме
//! оценки вход проходит без изменений.

use crate::error::{Result, TrainError};
use crate::nn::module::{Layer, Mode};
use crate::tensor::{ensure_same_shape, Labels, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Слой Dropout.
///
/// Режим приходит от контейнера при каждом вызове; собственного флага
/// режима у слоя нет.
///
/// # Example
/// ```ignore
/// let dropout = Dropout::new(0.5); // 50% активаций обнуляется при обучении
/// ```
pub struct Dropout {
    /// Вероятность обнуления, в диапазоне `[0, 1)`.
    pub p: f32,
    rng: StdRng,
    mask: Option<Tensor>,
}

impl Dropout {
    /// Создает слой Dropout.
    ///
    /// # Panics
    /// Паникует если `p` не в диапазоне [0, 1)
    pub fn new(p: f32) -> Self {
        Self::build(p, StdRng::from_entropy())
    }

    /// Dropout с фиксированным seed для воспроизводимых масок.
    ///
    /// # Panics
    /// Паникует если `p` не в диапазоне [0, 1)
    pub fn with_seed(p: f32, seed: u64) -> Self {
        Self::build(p, StdRng::seed_from_u64(seed))
    }

    /// Вариант [`Dropout::new`] без паники, для значений из конфигурации.
    pub fn try_new(p: f32) -> Result<Self> {
        Self::check(p)?;
        Ok(Self {
            p,
            rng: StdRng::from_entropy(),
            mask: None,
        })
    }

    fn check(p: f32) -> Result<()> {
        if (0.0..1.0).contains(&p) {
            Ok(())
        } else {
            Err(TrainError::InvalidConfig(format!(
                "Dropout probability must be in [0, 1), got {}",
                p
            )))
        }
    }

    fn build(p: f32, rng: StdRng) -> Self {
        assert!(
            Self::check(p).is_ok(),
            "Dropout probability must be in [0, 1), got {}",
            p
        );
        Self { p, rng, mask: None }
    }
}

impl Default for Dropout {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Layer for Dropout {
    fn forward(&mut self, input: &Tensor, mode: Mode, _labels: Option<&Labels>) -> Result<Tensor> {
        if !mode.is_training() {
            return Ok(input.clone());
        }

        let keep = 1.0 - self.p;
        let scale = 1.0 / keep;
        let rng = &mut self.rng;
        let mask = input.mapv(|_| if rng.gen::<f32>() < keep { scale } else { 0.0 });
        let output = input * &mask;
        self.mask = Some(mask);
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let mask = self.mask.as_ref().ok_or(TrainError::NoForwardCache)?;
        ensure_same_shape("dropout gradient", mask, grad_output)?;
        Ok(grad_output * mask)
    }

    fn name(&self) -> &str {
        "Dropout"
    }
}
