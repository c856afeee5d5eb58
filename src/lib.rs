//! # RustySeq: sequential models with a training harness
//!
//! **RustySeq** runs eager, layer-by-layer neural networks on `ndarray`
//! tensors. A [`Sequential`](nn::Sequential) container owns an ordered list
//! of layers and a train/eval [`Mode`](nn::Mode); [`train`] and [`test`]
//! drive it over batches from a [`DataLoader`](data::DataLoader).
//!
//! ## Usage Example
//!
//! ```no_run
//! use ndarray::array;
//! use rustyseq::losses::CrossEntropyLoss;
//! use rustyseq::nn::{Linear, ReLU, Sequential};
//! use rustyseq::optimizers::Sgd;
//!
//! # fn main() -> rustyseq::Result<()> {
//! let x = array![[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
//! let y = array![1, 1, 0, 0];
//!
//! // 1. Build the model
//! let mut model = Sequential::new()
//!     .add(Linear::new(2, 8))
//!     .add(ReLU::new())
//!     .add(Linear::new(8, 2));
//!
//! // 2. Train: per-epoch accuracy and summed loss
//! let history = rustyseq::train(
//!     &mut model,
//!     &x,
//!     &y,
//!     &mut CrossEntropyLoss::new(),
//!     &mut Sgd::new(0.1),
//!     100,
//!     2,
//! )?;
//!
//! // 3. Evaluate
//! let accuracy = rustyseq::test(&mut model, &x, &y, 2)?;
//! println!("{:?} -> {accuracy}", history.last());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod losses;
pub mod metrics;
pub mod nn;
pub mod optimizers;
pub mod tensor;
pub mod train;

pub use config::TrainConfig;
pub use error::{Result, TrainError};
pub use metrics::TrainHistory;
pub use tensor::{Labels, Tensor};
pub use train::{test, train, train_with_config};
