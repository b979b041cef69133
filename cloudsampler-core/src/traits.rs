//! Core traits for cloudsampler

use crate::{point::*, point_cloud::*};

/// Trait for objects with an axis-aligned extent
pub trait Bounded {
    /// Get the bounding box of the object as `(min, max)`, or `None` if it is empty
    fn bounding_box(&self) -> Option<(Point3d, Point3d)>;

    /// Get the center point of the object
    fn center(&self) -> Option<Point3d> {
        self.bounding_box().map(|(min, max)| nalgebra::center(&min, &max))
    }

    /// Length of the bounding box diagonal (0 for an empty object)
    fn diagonal(&self) -> f64 {
        self.bounding_box()
            .map(|(min, max)| (max - min).norm())
            .unwrap_or(0.0)
    }
}

impl Bounded for [Point3d] {
    fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        let first = *self.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }
}

impl Bounded for PointCloud {
    fn bounding_box(&self) -> Option<(Point3d, Point3d)> {
        self.positions().bounding_box()
    }
}
