//! Error types for cloudsampler

use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause carried by [`Error::FileRead`]
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for cloudsampler operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid voxel size {0}: must be positive, finite and give voxel keys within i64 range")]
    InvalidVoxelSize(f64),

    #[error("Failed to read point cloud from {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: BoxedCause,
    },

    #[error("Invalid sampling type '{0}' (expected one of: factor, barycenter, closest)")]
    InvalidSamplingType(String),

    #[error("Empty point set: {0} requires at least one point")]
    EmptyPointSet(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Build a [`Error::FileRead`] from any error type
    pub fn file_read<P, E>(path: P, source: E) -> Self
    where
        P: Into<PathBuf>,
        E: Into<BoxedCause>,
    {
        Error::FileRead {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Build a [`Error::Write`] for the given output path
    pub fn write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}
