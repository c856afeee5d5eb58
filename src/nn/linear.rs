//! Модуль, реализующий полносвязный (линейный) слой.

use crate::error::{Result, TrainError};
use crate::nn::module::{Layer, Mode};
use crate::nn::parameter::Parameter;
use crate::tensor::{Labels, Tensor};
use ndarray::Axis;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

/// Полносвязный слой, вычисляющий `y = xW + b`.
///
/// `weights` имеет форму `[in_features, out_features]`, `bias` это одна строка
/// `[1, out_features]`, которая транслируется на весь батч. Вход последнего
/// прохода в режиме обучения сохраняется для `backward`.
pub struct Linear {
    pub weights: Parameter,
    pub bias: Parameter,
    input_cache: Option<Tensor>,
}

impl Linear {
    /// Создает слой с весами Xavier-uniform и нулевым смещением.
    pub fn new(in_features: usize, out_features: usize) -> Self {
        Self::init(in_features, out_features, StdRng::from_entropy())
    }

    /// То же, что [`Linear::new`], но с фиксированным seed.
    pub fn with_seed(in_features: usize, out_features: usize, seed: u64) -> Self {
        Self::init(in_features, out_features, StdRng::seed_from_u64(seed))
    }

    /// Собирает слой из готовых весов `[in, out]` и смещения `[1, out]`.
    pub fn from_weights(weights: Tensor, bias: Tensor) -> Result<Self> {
        if bias.shape() != [1, weights.ncols()] {
            return Err(TrainError::shape(
                "linear bias",
                &[1, weights.ncols()],
                bias.shape(),
            ));
        }
        Ok(Self {
            weights: Parameter::new(weights),
            bias: Parameter::new(bias),
            input_cache: None,
        })
    }

    fn init(in_features: usize, out_features: usize, mut rng: StdRng) -> Self {
        let limit = (6.0 / (in_features + out_features) as f32).sqrt();
        let weights = Tensor::random_using(
            (in_features, out_features),
            Uniform::new_inclusive(-limit, limit),
            &mut rng,
        );
        Self {
            weights: Parameter::new(weights),
            bias: Parameter::new(Tensor::zeros((1, out_features))),
            input_cache: None,
        }
    }

    pub fn in_features(&self) -> usize {
        self.weights.value().nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weights.value().ncols()
    }
}

impl Layer for Linear {
    fn forward(&mut self, input: &Tensor, mode: Mode, _labels: Option<&Labels>) -> Result<Tensor> {
        if input.ncols() != self.in_features() {
            return Err(TrainError::shape(
                "linear input",
                &[input.nrows(), self.in_features()],
                input.shape(),
            ));
        }
        let output = input.dot(self.weights.value()) + self.bias.value();
        self.input_cache = mode.is_training().then(|| input.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let input = self.input_cache.as_ref().ok_or(TrainError::NoForwardCache)?;
        if grad_output.shape() != [input.nrows(), self.out_features()] {
            return Err(TrainError::shape(
                "linear output gradient",
                &[input.nrows(), self.out_features()],
                grad_output.shape(),
            ));
        }

        // dW = x^T g, db = суммы столбцов g, dx = g W^T
        self.weights.accumulate(&input.t().dot(grad_output))?;
        self.bias.accumulate(&grad_output.sum_axis(Axis(0)).insert_axis(Axis(0)))?;
        Ok(grad_output.dot(&self.weights.value().t()))
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.weights, &mut self.bias]
    }

    fn name(&self) -> &str {
        "Linear"
    }
}
