//! Reader registry for format-agnostic loading
//!
//! Readers are tried in registration order; the first one that claims a path
//! through [`PointCloudReader::can_read`] decodes it.

use crate::error::FormatError;
use crate::las::LasReader;
use crate::xyz::XyzReader;
use cloudsampler_core::{Error, PointCloud, Result};
use std::path::Path;
use tracing::debug;

/// Trait for reading point clouds from files
pub trait PointCloudReader: Send + Sync {
    /// Read a point cloud from the given path
    fn read_point_cloud(&self, path: &Path) -> Result<PointCloud>;

    /// Check if this reader handles the given path
    fn can_read(&self, path: &Path) -> bool;

    /// Get the format name this reader handles
    fn format_name(&self) -> &'static str;
}

/// Ordered collection of point cloud readers
pub struct ReaderRegistry {
    readers: Vec<Box<dyn PointCloudReader>>,
}

impl ReaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { readers: Vec::new() }
    }

    /// Create a registry holding the LAS/LAZ and delimited text readers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LasReader));
        registry.register(Box::new(XyzReader));
        registry
    }

    /// Append a reader; earlier readers take precedence
    pub fn register(&mut self, reader: Box<dyn PointCloudReader>) {
        self.readers.push(reader);
    }

    /// Find the first reader that claims the path
    pub fn reader_for(&self, path: &Path) -> Option<&dyn PointCloudReader> {
        self.readers
            .iter()
            .find(|reader| reader.can_read(path))
            .map(|reader| reader.as_ref())
    }

    /// Read a point cloud with whichever reader claims the path
    pub fn read_point_cloud(&self, path: &Path) -> Result<PointCloud> {
        let reader = self.reader_for(path).ok_or_else(|| {
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default();
            Error::file_read(path, FormatError::UnsupportedFormat { extension })
        })?;

        debug!(path = %path.display(), format = reader.format_name(), "reading point cloud");
        reader.read_point_cloud(path)
    }

    /// Names of the registered formats, in precedence order
    pub fn supported_formats(&self) -> Vec<&'static str> {
        self.readers.iter().map(|reader| reader.format_name()).collect()
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
