//! # Data Loading Module
//!
//! The batch source consumed by the training and evaluation loops.
//!
//! ## Example
//!
//! ```ignore
//! use rustyseq::data::DataLoader;
//!
//! let mut loader = DataLoader::new(&features, &labels, 32)?.shuffle(true);
//!
//! for batch in loader.iter() {
//!     // batch.features: [<=32, n_features], batch.labels: [<=32]
//! }
//! ```

pub mod dataloader;
pub mod dataset;

pub use dataloader::{Batch, DataLoader, DataLoaderIterator};
pub use dataset::InMemoryDataset;
