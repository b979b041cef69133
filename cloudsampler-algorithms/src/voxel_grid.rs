//! Sparse voxel grid index
//!
//! Points are bucketed by the integer cell they fall into, measured from the
//! minimum corner of the cloud's bounding box. Only occupied cells are stored,
//! sorted by key, and every bucket lists its point indices in original order.
//! Both orders are part of the contract: the subsampling strategies emit one
//! representative per bucket in this order, and the closest-point tie-break
//! relies on the stable index order inside a bucket.

use cloudsampler_core::{Bounded, Error, Point3d, Result};
use std::collections::HashMap;
use tracing::debug;

/// Integer coordinates of a voxel, ordered lexicographically by (x, y, z)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl VoxelKey {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

/// The indices of all points falling into one voxel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelBucket {
    pub key: VoxelKey,
    pub indices: Vec<usize>,
}

impl VoxelBucket {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A sparse mapping from voxel keys to the points they contain
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGridIndex {
    origin: Point3d,
    voxel_size: f64,
    point_count: usize,
    buckets: Vec<VoxelBucket>,
}

impl VoxelGridIndex {
    /// Partition `points` into voxels of edge length `voxel_size`.
    ///
    /// An empty input yields an empty index. Fails with
    /// [`Error::InvalidVoxelSize`] if `voxel_size` is not a positive finite number.
    ///
    /// # Example
    /// ```rust
    /// use cloudsampler_core::Point3d;
    /// use cloudsampler_algorithms::VoxelGridIndex;
    ///
    /// fn main() -> cloudsampler_core::Result<()> {
    ///     let points = vec![
    ///         Point3d::new(0.0, 0.0, 0.0),
    ///         Point3d::new(0.1, 0.0, 0.0),
    ///         Point3d::new(1.5, 0.0, 0.0),
    ///     ];
    ///
    ///     let grid = VoxelGridIndex::build(&points, 1.0)?;
    ///     assert_eq!(grid.len(), 2);
    ///     assert_eq!(grid.buckets()[0].indices, vec![0, 1]);
    ///     Ok(())
    /// }
    /// ```
    pub fn build(points: &[Point3d], voxel_size: f64) -> Result<Self> {
        if !(voxel_size.is_finite() && voxel_size > 0.0) {
            return Err(Error::InvalidVoxelSize(voxel_size));
        }

        let Some((origin, max)) = points.bounding_box() else {
            return Ok(Self {
                origin: Point3d::origin(),
                voxel_size,
                point_count: 0,
                buckets: Vec::new(),
            });
        };

        // The largest key per axis comes from the bounding-box maximum
        let span = (max - origin) / voxel_size;
        if span.amax() >= i64::MAX as f64 {
            return Err(Error::InvalidVoxelSize(voxel_size));
        }

        let mut voxel_map: HashMap<VoxelKey, Vec<usize>> = HashMap::new();
        for (idx, point) in points.iter().enumerate() {
            let key = voxel_key(&origin, voxel_size, point);
            voxel_map.entry(key).or_default().push(idx);
        }

        let mut buckets: Vec<VoxelBucket> = voxel_map
            .into_iter()
            .map(|(key, indices)| VoxelBucket { key, indices })
            .collect();
        buckets.sort_unstable_by_key(|b| b.key);

        debug!(
            points = points.len(),
            voxels = buckets.len(),
            voxel_size,
            "built voxel grid"
        );

        Ok(Self {
            origin,
            voxel_size,
            point_count: points.len(),
            buckets,
        })
    }

    /// Minimum corner of the indexed points' bounding box
    pub fn origin(&self) -> Point3d {
        self.origin
    }

    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Number of occupied voxels
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of points the index was built from
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Occupied voxels in ascending key order
    pub fn buckets(&self) -> &[VoxelBucket] {
        &self.buckets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VoxelBucket> {
        self.buckets.iter()
    }

    /// Look up the bucket for `key`
    pub fn get(&self, key: &VoxelKey) -> Option<&VoxelBucket> {
        self.buckets
            .binary_search_by(|b| b.key.cmp(key))
            .ok()
            .map(|i| &self.buckets[i])
    }

    /// Key of the voxel `point` falls into, relative to this index's origin
    pub fn key_of(&self, point: &Point3d) -> VoxelKey {
        voxel_key(&self.origin, self.voxel_size, point)
    }
}

impl<'a> IntoIterator for &'a VoxelGridIndex {
    type Item = &'a VoxelBucket;
    type IntoIter = std::slice::Iter<'a, VoxelBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

fn voxel_key(origin: &Point3d, voxel_size: f64, point: &Point3d) -> VoxelKey {
    let rel = (point - origin) / voxel_size;
    VoxelKey::new(
        rel.x.floor() as i64,
        rel.y.floor() as i64,
        rel.z.floor() as i64,
    )
}
