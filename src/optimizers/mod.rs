//! Модуль, содержащий реализации оптимизаторов для обновления весов модели.
//!
//! Оптимизатор получает параметры модели, читает градиент, накопленный
//! каждым параметром с прошлого шага, применяет свое правило обновления
//! и очищает накопитель.

use crate::error::Result;
use crate::nn::Parameter;
use crate::tensor::Tensor;

/// Трейт, определяющий общий интерфейс для всех оптимизаторов.
pub trait Optimizer {
    /// Выполняет один шаг оптимизации и обнуляет градиенты `parameters`.
    ///
    /// Порядок параметров должен быть одинаковым при каждом вызове: буферы
    /// оптимизаторов с состоянием привязаны к позиции.
    fn step(&mut self, parameters: Vec<&mut Parameter>) -> Result<()>;

    fn learning_rate(&self) -> f32;

    fn set_learning_rate(&mut self, lr: f32);
}

/// Стохастический градиентный спуск (SGD), опционально с моментом.
pub struct Sgd {
    /// Скорость обучения.
    lr: f32,
    momentum: f32,
    velocity: Vec<Tensor>,
}

impl Sgd {
    /// Обычный SGD: `param -= lr * grad`.
    pub fn new(lr: f32) -> Self {
        Self::with_momentum(lr, 0.0)
    }

    /// SGD с моментом: `v = momentum * v + grad; param -= lr * v`.
    ///
    /// # Panics
    /// Паникует если `momentum` отрицателен или не конечен.
    pub fn with_momentum(lr: f32, momentum: f32) -> Self {
        assert!(
            momentum.is_finite() && momentum >= 0.0,
            "Momentum must be finite and non-negative, got {}",
            momentum
        );
        Self {
            lr,
            momentum,
            velocity: Vec::new(),
        }
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, parameters: Vec<&mut Parameter>) -> Result<()> {
        let lr = self.lr;
        for (idx, param) in parameters.into_iter().enumerate() {
            {
                let (value, grad) = param.value_and_grad();
                if self.momentum > 0.0 {
                    if self.velocity.len() <= idx {
                        self.velocity.resize_with(idx + 1, || Tensor::zeros((0, 0)));
                    }
                    let velocity = &mut self.velocity[idx];
                    if velocity.shape() != grad.shape() {
                        *velocity = Tensor::zeros(grad.raw_dim());
                    }
                    let momentum = self.momentum;
                    velocity.zip_mut_with(grad, |v, &g| *v = momentum * *v + g);
                    value.scaled_add(-lr, velocity);
                } else {
                    value.scaled_add(-lr, grad);
                }
            }
            param.zero_grad();
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sgd_step_and_clear() {
        let mut p = Parameter::new(array![[1.0, 2.0]]);
        p.accumulate(&array![[1.0, -1.0]]).unwrap();

        let mut sgd = Sgd::new(0.5);
        sgd.step(vec![&mut p]).unwrap();

        assert_eq!(p.value(), &array![[0.5, 2.5]]);
        assert_eq!(p.grad(), &array![[0.0, 0.0]]);
    }

    #[test]
    fn test_sgd_momentum_builds_velocity() {
        let mut p = Parameter::new(array![[0.0]]);
        let mut sgd = Sgd::with_momentum(1.0, 0.5);
        assert_eq!(sgd.momentum(), 0.5);

        p.accumulate(&array![[1.0]]).unwrap();
        sgd.step(vec![&mut p]).unwrap();
        assert_eq!(p.value(), &array![[-1.0]]);

        p.accumulate(&array![[1.0]]).unwrap();
        sgd.step(vec![&mut p]).unwrap();
        // v = 0.5 * 1 + 1 = 1.5
        assert_eq!(p.value(), &array![[-2.5]]);
    }

    #[test]
    #[should_panic(expected = "Momentum must be finite and non-negative")]
    fn test_negative_momentum_rejected() {
        Sgd::with_momentum(0.1, -0.9);
    }

    #[test]
    #[should_panic(expected = "Momentum must be finite and non-negative")]
    fn test_nan_momentum_rejected() {
        Sgd::with_momentum(0.1, f32::NAN);
    }

    #[test]
    fn test_learning_rate_setter() {
        let mut sgd = Sgd::new(0.1);
        sgd.set_learning_rate(0.01);
        assert_eq!(sgd.learning_rate(), 0.01);
    }
}
