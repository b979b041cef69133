//! # cloudsampler
//!
//! Voxel-grid and stride subsampling for 3D point clouds.
//!
//! This is the umbrella crate that provides convenient access to all cloudsampler
//! functionality. You can use this crate to get everything in one place, or use
//! individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Points, immutable point clouds, sampling tags and sample sets
//! - **Algorithms**: Voxel grid indexing, barycenter and closest-to-centroid reduction, stride sampling
//! - **I/O**: LAS/LAZ and delimited text readers, `.xyz` sample writer
//! - **Pipeline**: Cached sampling of a loaded point cloud
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudsampler::prelude::*;
//!
//! let rows = [[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [1.5, 0.0, 0.0]];
//! let mut source = PointCloudSource::from_rows(&rows)?;
//!
//! let sample = source.grid_sample(1.0, SamplingType::Closest)?;
//! assert_eq!(sample.len(), 2);
//!
//! let every_other = source.factor_sample(2)?;
//! assert_eq!(every_other.len(), 2);
//! # Ok::<(), cloudsampler::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables algorithms, io and pipeline
//! - `algorithms`: Voxel grid and subsampling algorithms
//! - `io`: File format support
//! - `pipeline`: Cached point cloud sources (pulls in `algorithms` and `io`)
//! - `all`: Enables all features

// Re-export core functionality
pub use cloudsampler_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use cloudsampler_algorithms as algorithms;

#[cfg(feature = "io")]
pub use cloudsampler_io as io;

#[cfg(feature = "pipeline")]
pub use cloudsampler_pipeline as pipeline;

/// Convenient imports for common use cases
pub mod prelude {
    pub use cloudsampler_core::*;

    #[cfg(feature = "algorithms")]
    pub use cloudsampler_algorithms::*;

    #[cfg(feature = "io")]
    pub use cloudsampler_io::{
        read_point_cloud, Delimiter, LasReader, PointCloudReader, ReaderRegistry, SampleWriter,
        XyzReader, XyzWriteOptions,
    };

    #[cfg(feature = "pipeline")]
    pub use cloudsampler_pipeline::*;
}
