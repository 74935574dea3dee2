//! Sample caching for decoded grid values.

mod dataset_cache;
mod sample_cache;

pub use dataset_cache::{DatasetCache, PreloadPolicy};
pub use sample_cache::SampleCache;
