//! Sequential container: ordered layers plus the train/eval mode.

use crate::error::{Result, TrainError};
use crate::nn::module::{Layer, Mode};
use crate::nn::parameter::Parameter;
use crate::tensor::{ensure_rows, Labels, Tensor};

/// An ordered stack of layers run front to back on `forward` and back to
/// front on `backward`.
///
/// Two call contracts share this type. A plain container never hands labels
/// to its layers. A label-conditioned container (see
/// [`Sequential::label_conditioned`]) passes the batch labels to every layer
/// while training and refuses to run without them; in eval mode it behaves
/// exactly like the plain one.
///
/// # Example
///
/// ```ignore
/// let mut model = Sequential::new()
///     .add(Linear::new(784, 128))
///     .add(ReLU::new())
///     .add(Linear::new(128, 10));
///
/// let scores = model.forward(&batch, None)?;
/// ```
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
    mode: Mode,
    labels_in_training: bool,
}

impl Sequential {
    /// Empty plain container, in training mode.
    pub fn new() -> Self {
        Self::from_layers(Vec::new())
    }

    /// Plain container over an existing list of layers.
    pub fn from_layers(layers: Vec<Box<dyn Layer>>) -> Self {
        Self {
            layers,
            mode: Mode::Train,
            labels_in_training: false,
        }
    }

    /// Container whose layers receive the batch labels in training mode.
    pub fn label_conditioned(layers: Vec<Box<dyn Layer>>) -> Self {
        Self {
            layers,
            mode: Mode::Train,
            labels_in_training: true,
        }
    }

    /// Appends a layer; builder style.
    pub fn add<L: Layer + 'static>(mut self, layer: L) -> Self {
        self.push(layer);
        self
    }

    pub fn push<L: Layer + 'static>(&mut self, layer: L) {
        self.layers.push(Box::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names in execution order.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    pub fn train(&mut self) {
        self.mode = Mode::Train;
    }

    pub fn eval(&mut self) {
        self.mode = Mode::Eval;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_training(&self) -> bool {
        self.mode.is_training()
    }

    pub fn requires_labels(&self) -> bool {
        self.labels_in_training
    }

    /// Runs every layer in order with the container's current mode.
    ///
    /// `labels` is only read by a label-conditioned container in training
    /// mode, where it is mandatory.
    pub fn forward(&mut self, input: &Tensor, labels: Option<&Labels>) -> Result<Tensor> {
        self.run_forward(input, self.mode, labels)
    }

    /// Threads `grad` through every layer in reverse order. Parameter
    /// gradients accumulate inside the layers.
    pub fn backward(&mut self, grad: &Tensor) -> Result<()> {
        self.run_backward(grad).map(|_| ())
    }

    /// All trainable parameters, front to back.
    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.parameters_mut())
            .collect()
    }

    pub fn zero_grad(&mut self) {
        for param in self.parameters_mut() {
            param.zero_grad();
        }
    }

    fn run_forward(&mut self, input: &Tensor, mode: Mode, labels: Option<&Labels>) -> Result<Tensor> {
        let labels = if self.labels_in_training && mode.is_training() {
            Some(labels.ok_or(TrainError::MissingLabels)?)
        } else {
            None
        };

        let rows = input.nrows();
        let mut current: Option<Tensor> = None;
        for layer in self.layers.iter_mut() {
            let next = layer.forward(current.as_ref().unwrap_or(input), mode, labels)?;
            ensure_rows(layer.name(), &next, rows)?;
            tracing::trace!(layer = layer.name(), shape = ?next.shape(), "forward");
            current = Some(next);
        }
        Ok(current.unwrap_or_else(|| input.clone()))
    }

    fn run_backward(&mut self, grad: &Tensor) -> Result<Tensor> {
        let rows = grad.nrows();
        let mut current: Option<Tensor> = None;
        for layer in self.layers.iter_mut().rev() {
            let next = layer.backward(current.as_ref().unwrap_or(grad))?;
            ensure_rows(layer.name(), &next, rows)?;
            tracing::trace!(layer = layer.name(), shape = ?next.shape(), "backward");
            current = Some(next);
        }
        Ok(current.unwrap_or_else(|| grad.clone()))
    }
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

/// A container nested inside another container runs with the outer mode.
impl Layer for Sequential {
    fn forward(&mut self, input: &Tensor, mode: Mode, labels: Option<&Labels>) -> Result<Tensor> {
        self.run_forward(input, mode, labels)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        self.run_backward(grad_output)
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        Sequential::parameters_mut(self)
    }

    fn name(&self) -> &str {
        "Sequential"
    }
}
