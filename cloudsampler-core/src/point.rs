//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A 3-channel color triple.
///
/// LAS stores 16-bit channels, so that is the widest type we keep. Values are
/// carried through the pipeline as-is and only averaged by the barycenter
/// strategy.
pub type Rgb = [u16; 3];

/// Returns `true` when every coordinate of `point` is finite
pub fn is_finite_point(point: &Point3d) -> bool {
    point.coords.iter().all(|c| c.is_finite())
}
