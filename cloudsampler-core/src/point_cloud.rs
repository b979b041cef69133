//! Point cloud data structures and functionality

use crate::point::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An immutable point cloud with optional per-point colors.
///
/// Positions and colors are stored side by side; when colors are present
/// there is exactly one per position, so every point in a cloud has the same
/// shape. There are no mutating accessors: derived clouds are built with
/// [`PointCloud::select`] or the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    positions: Vec<Point3d>,
    colors: Option<Vec<Rgb>>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            colors: None,
        }
    }

    /// Create a point cloud from positions only.
    ///
    /// Fails with [`Error::InvalidInput`] if any coordinate is NaN or infinite.
    pub fn from_points(positions: Vec<Point3d>) -> Result<Self> {
        validate_positions(&positions)?;
        Ok(Self {
            positions,
            colors: None,
        })
    }

    /// Create a point cloud with one color per position
    pub fn with_colors(positions: Vec<Point3d>, colors: Vec<Rgb>) -> Result<Self> {
        if positions.len() != colors.len() {
            return Err(Error::InvalidInput(format!(
                "{} positions but {} colors; every point needs exactly one color",
                positions.len(),
                colors.len()
            )));
        }
        validate_positions(&positions)?;
        Ok(Self {
            positions,
            colors: Some(colors),
        })
    }

    /// Create a point cloud from an N×3 array of coordinates
    pub fn from_rows(rows: &[[f64; 3]]) -> Result<Self> {
        Self::from_points(rows.iter().map(|r| Point3d::new(r[0], r[1], r[2])).collect())
    }

    /// Create a colored point cloud from an N×3 coordinate array and an N×3 color array
    pub fn from_rows_with_colors(rows: &[[f64; 3]], colors: &[Rgb]) -> Result<Self> {
        Self::with_colors(
            rows.iter().map(|r| Point3d::new(r[0], r[1], r[2])).collect(),
            colors.to_vec(),
        )
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether the cloud carries per-point colors
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// All positions (N×3)
    pub fn positions(&self) -> &[Point3d] {
        &self.positions
    }

    /// All colors (N×3), or `None` for an uncolored cloud
    pub fn colors(&self) -> Option<&[Rgb]> {
        self.colors.as_deref()
    }

    /// Position of the point at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`. Use [`PointCloud::positions`] with
    /// `get` for a checked lookup.
    pub fn point(&self, index: usize) -> Point3d {
        self.positions[index]
    }

    /// Color of the point at `index`, if the cloud is colored
    ///
    /// # Panics
    ///
    /// Panics if the cloud is colored and `index >= self.len()`.
    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors.as_ref().map(|c| c[index])
    }

    /// Get an iterator over the positions
    pub fn iter(&self) -> std::slice::Iter<'_, Point3d> {
        self.positions.iter()
    }

    /// Build a new cloud from the points at `indices`, in that order.
    ///
    /// Colors follow the same indices so the result stays index-aligned.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        let positions = indices.iter().map(|&i| self.positions[i]).collect();
        let colors = self
            .colors
            .as_ref()
            .map(|c| indices.iter().map(|&i| c[i]).collect());
        Self { positions, colors }
    }
}

fn validate_positions(positions: &[Point3d]) -> Result<()> {
    match positions.iter().position(|p| !is_finite_point(p)) {
        Some(idx) => Err(Error::InvalidInput(format!(
            "point {} has a non-finite coordinate ({}, {}, {})",
            idx, positions[idx].x, positions[idx].y, positions[idx].z
        ))),
        None => Ok(()),
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for PointCloud {
    type Output = Point3d;

    fn index(&self, index: usize) -> &Self::Output {
        &self.positions[index]
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3d;
    type IntoIter = std::slice::Iter<'a, Point3d>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let cloud = PointCloud::new();
        assert!(cloud.is_empty());
        assert_eq!(cloud.len(), 0);
        assert!(!cloud.has_colors());
    }

    #[test]
    fn test_from_rows() {
        let cloud = PointCloud::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[1], Point3d::new(4.0, 5.0, 6.0));
        assert!(cloud.colors().is_none());
    }

    #[test]
    fn test_with_colors_length_mismatch() {
        let result = PointCloud::from_rows_with_colors(&[[0.0, 0.0, 0.0]], &[]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        let result = PointCloud::from_rows(&[[0.0, 0.0, 0.0], [f64::NAN, 1.0, 1.0]]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = PointCloud::from_rows(&[[f64::INFINITY, 0.0, 0.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_keeps_colors_aligned() {
        let cloud = PointCloud::from_rows_with_colors(
            &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]],
            &[[10, 10, 10], [20, 20, 20], [30, 30, 30]],
        )
        .unwrap();

        let selected = cloud.select(&[2, 0]);
        assert_eq!(selected.positions(), &[Point3d::new(2.0, 2.0, 2.0), Point3d::origin()]);
        assert_eq!(selected.colors().unwrap(), &[[30, 30, 30], [10, 10, 10]]);
    }

    #[test]
    fn test_point_and_color_accessors() {
        let cloud = PointCloud::from_rows_with_colors(&[[1.0, 2.0, 3.0]], &[[9, 8, 7]]).unwrap();
        assert_eq!(cloud.point(0), Point3d::new(1.0, 2.0, 3.0));
        assert_eq!(cloud.color(0), Some([9, 8, 7]));
        assert_eq!(PointCloud::from_rows(&[[0.0, 0.0, 0.0]]).unwrap().color(5), None);
    }

    #[test]
    #[should_panic]
    fn test_point_out_of_bounds_panics() {
        let cloud = PointCloud::from_rows(&[[0.0, 0.0, 0.0]]).unwrap();
        cloud.point(1);
    }

    #[test]
    #[should_panic]
    fn test_color_out_of_bounds_panics() {
        let cloud = PointCloud::from_rows_with_colors(&[[0.0, 0.0, 0.0]], &[[1, 1, 1]]).unwrap();
        cloud.color(1);
    }
}
