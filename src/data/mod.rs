//! Data module - Time-indexed dataset and the bundled sample

mod dataset;
mod sample;

pub use dataset::{Dataset, DatasetError};
pub use sample::sample_dataset;
