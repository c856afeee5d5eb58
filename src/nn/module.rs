//! Module defining the core `Layer` trait and the execution `Mode` shared by
//! all neural network layers.

use crate::error::Result;
use crate::nn::parameter::Parameter;
use crate::tensor::{Labels, Tensor};

/// Execution mode threaded into every layer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Layers cache what `backward` needs and apply stochastic behaviour.
    #[default]
    Train,
    /// Inference only. Layers must not depend on labels.
    Eval,
}

impl Mode {
    pub fn is_training(self) -> bool {
        self == Mode::Train
    }
}

/// Trait defining the common interface for all layers.
///
/// A layer maps a batch `[rows, in]` to `[rows, out]` and must keep the row
/// count unchanged in both directions. Layers with trainable weights own
/// their gradient accumulators: `backward` adds into them and an optimizer
/// reads and clears them through [`Layer::parameters_mut`].
pub trait Layer {
    /// Forward pass.
    ///
    /// `labels` is only supplied by a label-conditioned container while in
    /// [`Mode::Train`]; plain layers ignore it.
    fn forward(&mut self, input: &Tensor, mode: Mode, labels: Option<&Labels>) -> Result<Tensor>;

    /// Backward pass. Takes the gradient w.r.t. this layer's output and
    /// returns the gradient w.r.t. its input, accumulating parameter
    /// gradients as a side effect.
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor>;

    /// Trainable parameters together with their gradient accumulators.
    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        Vec::new()
    }

    /// Short name used in log events.
    fn name(&self) -> &str;
}

impl<L: Layer + ?Sized> Layer for Box<L> {
    fn forward(&mut self, input: &Tensor, mode: Mode, labels: Option<&Labels>) -> Result<Tensor> {
        (**self).forward(input, mode, labels)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        (**self).backward(grad_output)
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        (**self).parameters_mut()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
