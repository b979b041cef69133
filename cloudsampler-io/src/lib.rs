//! I/O operations for point clouds and sample sets
//!
//! This crate reads LAS/LAZ and delimited text point clouds and writes
//! sample sets as `;`-separated `.xyz` files.

pub mod error;
pub mod las;
pub mod registry;
pub mod writer;
pub mod xyz;

pub use error::*;
pub use self::las::LasReader;
pub use registry::{PointCloudReader, ReaderRegistry};
pub use writer::{SampleWriter, XyzWriteOptions};
pub use xyz::{Delimiter, XyzReader};

use cloudsampler_core::{PointCloud, Result};
use std::path::Path;

/// Auto-detect format by extension and read a point cloud
pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    ReaderRegistry::with_defaults().read_point_cloud(path.as_ref())
}

/// Case-insensitive extension check
pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsampler_core::Error;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a/b/scan.XYZ"), &["xyz"]));
        assert!(has_extension(Path::new("tile.laz"), &["las", "laz"]));
        assert!(!has_extension(Path::new("tile.las.bak"), &["las"]));
        assert!(!has_extension(Path::new("README"), &["xyz"]));
    }

    #[test]
    fn test_read_point_cloud_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.csv");
        std::fs::write(&path, "x,y,z\n1,2,3\n4,5,6\n").unwrap();

        let cloud = read_point_cloud(&path).unwrap();
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn test_read_point_cloud_unsupported() {
        let result = read_point_cloud("model.obj");
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
