//! Radial-basis-function layer with one prototype per class.
//!
//! This is the label-conditioned layer that a
//! [`Sequential::label_conditioned`](crate::nn::Sequential::label_conditioned)
//! container exists for: in training mode every batch moves each class
//! prototype towards the running mean of the examples carrying that label.
//! Scores are negative scaled squared distances, so the arg-max class is the
//! nearest prototype.

use crate::error::{Result, TrainError};
use crate::nn::module::{Layer, Mode};
use crate::tensor::{Labels, Tensor};
use ndarray::Axis;

pub struct Rbf {
    prototypes: Tensor,
    counts: Vec<usize>,
    gamma: f32,
    input_cache: Option<Tensor>,
}

impl Rbf {
    /// Creates a layer for `num_classes` prototypes of width `in_features`.
    /// Prototypes start at the origin until labelled data arrives.
    pub fn new(in_features: usize, num_classes: usize, gamma: f32) -> Self {
        Self {
            prototypes: Tensor::zeros((num_classes, in_features)),
            counts: vec![0; num_classes],
            gamma,
            input_cache: None,
        }
    }

    /// Prototypes, one row per class.
    pub fn prototypes(&self) -> &Tensor {
        &self.prototypes
    }

    /// Number of training examples folded into each prototype so far.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn num_classes(&self) -> usize {
        self.prototypes.nrows()
    }

    fn update_prototypes(&mut self, input: &Tensor, labels: &Labels) -> Result<()> {
        if labels.len() != input.nrows() {
            return Err(TrainError::shape(
                "rbf labels",
                &[input.nrows()],
                &[labels.len()],
            ));
        }
        let num_classes = self.num_classes();
        if let Some(&label) = labels.iter().find(|&&l| l >= num_classes) {
            return Err(TrainError::LabelOutOfRange { label, num_classes });
        }

        for (row, &label) in input.axis_iter(Axis(0)).zip(labels.iter()) {
            self.counts[label] += 1;
            let n = self.counts[label] as f32;
            let mut prototype = self.prototypes.row_mut(label);
            prototype.zip_mut_with(&row, |c, &x| *c += (x - *c) / n);
        }
        Ok(())
    }

    fn scores(&self, input: &Tensor) -> Tensor {
        let mut out = Tensor::zeros((input.nrows(), self.num_classes()));
        for (i, x) in input.axis_iter(Axis(0)).enumerate() {
            for (k, c) in self.prototypes.axis_iter(Axis(0)).enumerate() {
                let dist: f32 = x.iter().zip(c.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
                out[[i, k]] = -self.gamma * dist;
            }
        }
        out
    }
}

impl Layer for Rbf {
    fn forward(&mut self, input: &Tensor, mode: Mode, labels: Option<&Labels>) -> Result<Tensor> {
        if input.ncols() != self.prototypes.ncols() {
            return Err(TrainError::shape(
                "rbf input",
                &[input.nrows(), self.prototypes.ncols()],
                input.shape(),
            ));
        }

        if mode.is_training() {
            let labels = labels.ok_or(TrainError::MissingLabels)?;
            self.update_prototypes(input, labels)?;
            self.input_cache = Some(input.clone());
        }
        Ok(self.scores(input))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let input = self.input_cache.as_ref().ok_or(TrainError::NoForwardCache)?;
        if grad_output.shape() != [input.nrows(), self.num_classes()] {
            return Err(TrainError::shape(
                "rbf output gradient",
                &[input.nrows(), self.num_classes()],
                grad_output.shape(),
            ));
        }

        // d/dx of -gamma * |x - c_k|^2 is -2 gamma (x - c_k), summed over k
        // with weights g_ik: -2 gamma (x * sum_k g_ik - g . C)
        let weight = grad_output.sum_axis(Axis(1)).insert_axis(Axis(1));
        let pulled = grad_output.dot(&self.prototypes);
        Ok((input * &weight - pulled) * (-2.0 * self.gamma))
    }

    fn name(&self) -> &str {
        "Rbf"
    }
}
