//! Format-level errors raised while decoding point cloud files.
//!
//! These are the underlying causes wrapped by
//! [`cloudsampler_core::Error::FileRead`].

use thiserror::Error;

/// Errors that can occur while decoding a point cloud file
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Unsupported point cloud format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Point {index} differs from earlier points in carrying a color")]
    InconsistentColors { index: usize },

    #[error("LAS error: {message}")]
    Las { message: String },
}
