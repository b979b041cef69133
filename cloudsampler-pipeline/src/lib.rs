//! Cached sampling of loaded point clouds
//!
//! [`PointCloudSource`] owns one immutable cloud and memoizes every sample
//! computed from it in a [`SampleCache`], so repeating a request with the
//! same sampling and parameters never recomputes it.

pub mod cache;
pub mod config;
pub mod source;

pub use cache::{CacheStats, SampleCache};
pub use config::SamplerConfig;
pub use source::PointCloudSource;
