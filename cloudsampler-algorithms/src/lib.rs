//! # cloudsampler algorithms
//!
//! Voxel grid indexing and the reductions built on it.
//!
//! This crate partitions point clouds into sparse voxel grids and reduces
//! them with the barycenter or closest-to-centroid strategies, plus a plain
//! stride sampler that needs no grid.

pub mod voxel_grid;
pub mod subsampling;
pub mod stride;

// Re-export commonly used items
pub use voxel_grid::*;
pub use subsampling::*;
pub use stride::*;
