//! Core data structures and error types for cloudsampler
//!
//! This crate provides the fundamental types shared by the subsampling
//! pipeline: points, immutable point clouds, sampling tags and sample sets.

pub mod point;
pub mod point_cloud;
pub mod sample;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use sample::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

/// Common result type for cloudsampler operations
pub type Result<T> = std::result::Result<T, Error>;
