//! LAS/LAZ point cloud reading via the `las` crate

use crate::error::FormatError;
use crate::registry::PointCloudReader;
use cloudsampler_core::{Error, Point3d, PointCloud, Result, Rgb};
use std::path::Path;
use tracing::debug;

/// Reader for `.las` and `.laz` files.
///
/// Positions are the scaled and offset `f64` coordinates. Colors are kept
/// when the file's point format carries them.
pub struct LasReader;

impl LasReader {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
        let path = path.as_ref();
        let mut reader = las::Reader::from_path(path).map_err(|e| {
            Error::file_read(path, FormatError::Las { message: e.to_string() })
        })?;

        let mut positions = Vec::new();
        let mut colors: Option<Vec<Rgb>> = None;

        for (index, point_result) in reader.points().enumerate() {
            let point = point_result.map_err(|e| {
                Error::file_read(path, FormatError::Las { message: format!("failed to read point {}: {}", index, e) })
            })?;

            positions.push(Point3d::new(point.x, point.y, point.z));

            let color = point.color.map(|c| [c.red, c.green, c.blue]);
            if index == 0 && color.is_some() {
                colors = Some(Vec::new());
            }
            match (color, colors.as_mut()) {
                (Some(rgb), Some(colors)) => colors.push(rgb),
                (None, None) => {}
                _ => return Err(Error::file_read(path, FormatError::InconsistentColors { index })),
            }
        }

        debug!(
            path = %path.display(),
            points = positions.len(),
            colored = colors.is_some(),
            "read LAS file"
        );

        let cloud = match colors {
            Some(colors) => PointCloud::with_colors(positions, colors),
            None => PointCloud::from_points(positions),
        };
        cloud.map_err(|e| Error::file_read(path, e))
    }
}

impl PointCloudReader for LasReader {
    fn read_point_cloud(&self, path: &Path) -> Result<PointCloud> {
        LasReader::read(path)
    }

    fn can_read(&self, path: &Path) -> bool {
        crate::has_extension(path, &["las", "laz"])
    }

    fn format_name(&self) -> &'static str {
        "las"
    }
}
