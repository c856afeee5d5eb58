//! # Neural Network Layers Module
//!
//! Building blocks for models driven by the training loop.
//!
//! Each layer runs eagerly on `ndarray` tensors: `forward` receives the
//! container's [`Mode`] (and, for label-conditioned containers in training,
//! the batch labels), `backward` returns the input gradient and accumulates
//! parameter gradients inside the layer.
//!
//! ## Available Layers
//!
//! - [`Linear`]: Fully connected layer
//! - [`ReLU`], [`Sigmoid`]: Activations
//! - [`Dropout`]: Inverted dropout, active only in training. `new` panics
//!   on a probability outside `[0, 1)`; `try_new` returns an error instead.
//! - [`Rbf`]: Radial-basis layer with label-driven class prototypes
//!
//! ## Containers
//!
//! - [`Sequential`]: plain or label-conditioned ordered stack
//!
//! ## Example
//!
//! ```ignore
//! use rustyseq::nn::{Linear, ReLU, Sequential};
//!
//! let mut model = Sequential::new()
//!     .add(Linear::new(4, 16))
//!     .add(ReLU::new())
//!     .add(Linear::new(16, 3));
//! model.eval();
//! let scores = model.forward(&x, None)?;
//! ```

pub mod activations;
pub mod dropout;
pub mod linear;
pub mod module;
pub mod parameter;
pub mod rbf;
pub mod sequential;

pub use activations::{ReLU, Sigmoid};
pub use dropout::Dropout;
pub use linear::Linear;
pub use module::{Layer, Mode};
pub use parameter::Parameter;
pub use rbf::Rbf;
pub use sequential::Sequential;
