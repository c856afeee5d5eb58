//! Trainable parameter with its own gradient accumulator.

use crate::error::{Result, TrainError};
use crate::tensor::Tensor;

/// A weight matrix and the gradient accumulated for it since the last
/// optimizer step.
#[derive(Debug, Clone)]
pub struct Parameter {
    value: Tensor,
    grad: Tensor,
}

impl Parameter {
    pub fn new(value: Tensor) -> Self {
        let grad = Tensor::zeros(value.raw_dim());
        Self { value, grad }
    }

    pub fn value(&self) -> &Tensor {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Tensor {
        &mut self.value
    }

    pub fn grad(&self) -> &Tensor {
        &self.grad
    }

    /// Adds `delta` into the accumulator. Called by the owning layer's
    /// `backward`.
    pub fn accumulate(&mut self, delta: &Tensor) -> Result<()> {
        if delta.shape() != self.grad.shape() {
            return Err(TrainError::shape(
                "parameter gradient",
                self.grad.shape(),
                delta.shape(),
            ));
        }
        self.grad += delta;
        Ok(())
    }

    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// Splits into the value (mutable) and the accumulated gradient, so an
    /// optimizer can update one from the other without cloning.
    pub fn value_and_grad(&mut self) -> (&mut Tensor, &Tensor) {
        (&mut self.value, &self.grad)
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accumulate_adds_up() {
        let mut p = Parameter::new(array![[1.0, 2.0]]);
        p.accumulate(&array![[0.5, 0.5]]).unwrap();
        p.accumulate(&array![[0.25, -1.0]]).unwrap();
        assert_eq!(p.grad(), &array![[0.75, -0.5]]);

        p.zero_grad();
        assert_eq!(p.grad(), &array![[0.0, 0.0]]);
        assert_eq!(p.value(), &array![[1.0, 2.0]]);
    }

    #[test]
    fn test_accumulate_rejects_wrong_shape() {
        let mut p = Parameter::new(Tensor::zeros((2, 2)));
        let err = p.accumulate(&Tensor::zeros((1, 2))).unwrap_err();
        assert!(matches!(err, TrainError::ShapeMismatch { .. }));
    }
}
