//! Слои активации: ReLU и Sigmoid.

use crate::error::{Result, TrainError};
use crate::nn::module::{Layer, Mode};
use crate::tensor::{ensure_same_shape, Labels, Tensor};

// --- ReLU ---

/// Поэлементно `max(0, x)`. Обучаемых параметров нет.
#[derive(Debug, Default)]
pub struct ReLU {
    mask: Option<Tensor>,
}

impl ReLU {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for ReLU {
    fn forward(&mut self, input: &Tensor, mode: Mode, _labels: Option<&Labels>) -> Result<Tensor> {
        if mode.is_training() {
            self.mask = Some(input.mapv(|x| if x > 0.0 { 1.0 } else { 0.0 }));
        }
        Ok(input.mapv(|x| x.max(0.0)))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let mask = self.mask.as_ref().ok_or(TrainError::NoForwardCache)?;
        ensure_same_shape("relu gradient", mask, grad_output)?;
        Ok(grad_output * mask)
    }

    fn name(&self) -> &str {
        "ReLU"
    }
}

// --- Sigmoid ---

/// Поэлементная логистическая функция. Сохраняет свой выход для `backward`.
#[derive(Debug, Default)]
pub struct Sigmoid {
    output: Option<Tensor>,
}

impl Sigmoid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Sigmoid {
    fn forward(&mut self, input: &Tensor, mode: Mode, _labels: Option<&Labels>) -> Result<Tensor> {
        let output = input.mapv(|x| 1.0 / (1.0 + (-x).exp()));
        if mode.is_training() {
            self.output = Some(output.clone());
        }
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let y = self.output.as_ref().ok_or(TrainError::NoForwardCache)?;
        ensure_same_shape("sigmoid gradient", y, grad_output)?;
        Ok(grad_output * &y.mapv(|s| s * (1.0 - s)))
    }

    fn name(&self) -> &str {
        "Sigmoid"
    }
}
