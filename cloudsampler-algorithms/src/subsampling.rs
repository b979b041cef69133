//! Grid subsampling strategies
//!
//! Both strategies reduce a [`VoxelGridIndex`] to one representative per
//! occupied voxel, emitted in the grid's key order:
//!
//! - **Barycenter** emits the mean of the voxel's members, a synthetic point.
//!   Colors are averaged per channel and rounded.
//! - **Closest** emits the member nearest to that mean. Ties go to the member
//!   with the smallest original index, and its colors are carried unchanged.

use crate::voxel_grid::{VoxelBucket, VoxelGridIndex};
use cloudsampler_core::{Error, Point3d, PointCloud, Result, Rgb, SamplingType, Vector3d};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How a voxel is reduced to a single point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridStrategy {
    Barycenter,
    Closest,
}

impl GridStrategy {
    pub fn sampling_type(&self) -> SamplingType {
        match self {
            GridStrategy::Barycenter => SamplingType::Barycenter,
            GridStrategy::Closest => SamplingType::Closest,
        }
    }
}

impl TryFrom<SamplingType> for GridStrategy {
    type Error = Error;

    fn try_from(sampling: SamplingType) -> Result<Self> {
        match sampling {
            SamplingType::Barycenter => Ok(GridStrategy::Barycenter),
            SamplingType::Closest => Ok(GridStrategy::Closest),
            SamplingType::Factor => Err(Error::InvalidSamplingType(format!(
                "{} (not a grid sampling)",
                sampling
            ))),
        }
    }
}

impl FromStr for GridStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<SamplingType>() {
            Ok(SamplingType::Factor) => Err(Error::InvalidSamplingType(s.to_string())),
            Ok(sampling) => GridStrategy::try_from(sampling),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for GridStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sampling_type().fmt(f)
    }
}

/// Reduces a voxel grid to one representative point per voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSubsampler {
    strategy: GridStrategy,
    carry_colors: bool,
    parallel: bool,
}

impl GridSubsampler {
    /// Subsampler that carries colors and reduces sequentially
    pub fn new(strategy: GridStrategy) -> Self {
        Self {
            strategy,
            carry_colors: true,
            parallel: false,
        }
    }

    /// Whether colors of the source cloud are carried into the output
    pub fn with_colors(mut self, carry_colors: bool) -> Self {
        self.carry_colors = carry_colors;
        self
    }

    /// Reduce voxels on the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn strategy(&self) -> GridStrategy {
        self.strategy
    }

    /// Build a grid for `voxel_size` and reduce it in one step
    pub fn subsample(&self, cloud: &PointCloud, voxel_size: f64) -> Result<PointCloud> {
        let grid = VoxelGridIndex::build(cloud.positions(), voxel_size)?;
        self.reduce(cloud, &grid)
    }

    /// Reduce an already built grid of `cloud`.
    ///
    /// The grid must have been built from `cloud`'s positions.
    pub fn reduce(&self, cloud: &PointCloud, grid: &VoxelGridIndex) -> Result<PointCloud> {
        if grid.point_count() != cloud.len() {
            return Err(Error::InvalidInput(format!(
                "voxel grid indexes {} points but the cloud has {}",
                grid.point_count(),
                cloud.len()
            )));
        }

        let colors = if self.carry_colors { cloud.colors() } else { None };
        let reduce_bucket = |bucket: &VoxelBucket| self.reduce_bucket(cloud.positions(), colors, bucket);

        let representatives: Vec<(Point3d, Option<Rgb>)> = if self.parallel {
            grid.buckets().par_iter().map(reduce_bucket).collect::<Result<_>>()?
        } else {
            grid.buckets().iter().map(reduce_bucket).collect::<Result<_>>()?
        };

        debug!(
            strategy = %self.strategy,
            input = cloud.len(),
            output = representatives.len(),
            "reduced voxel grid"
        );

        let (positions, sample_colors): (Vec<Point3d>, Vec<Option<Rgb>>) =
            representatives.into_iter().unzip();
        match colors {
            Some(_) => PointCloud::with_colors(positions, sample_colors.into_iter().flatten().collect()),
            None => PointCloud::from_points(positions),
        }
    }

    fn reduce_bucket(
        &self,
        positions: &[Point3d],
        colors: Option<&[Rgb]>,
        bucket: &VoxelBucket,
    ) -> Result<(Point3d, Option<Rgb>)> {
        let mean = centroid(positions, &bucket.indices)?;
        match self.strategy {
            GridStrategy::Barycenter => {
                let color = colors.map(|c| mean_color(c, &bucket.indices));
                Ok((mean, color))
            }
            GridStrategy::Closest => {
                let idx = closest_to(positions, &bucket.indices, &mean);
                Ok((positions[idx], colors.map(|c| c[idx])))
            }
        }
    }
}

/// Arithmetic mean of the points at `indices`.
///
/// Fails with [`Error::EmptyPointSet`] if `indices` is empty.
pub fn centroid(points: &[Point3d], indices: &[usize]) -> Result<Point3d> {
    if indices.is_empty() {
        return Err(Error::EmptyPointSet("centroid".to_string()));
    }
    // Terms are divided before summing so coordinates near f64::MAX stay finite
    let n = indices.len() as f64;
    let mean = indices
        .iter()
        .fold(Vector3d::zeros(), |acc, &i| acc + points[i].coords / n);
    Ok(Point3d::from(mean))
}

/// Index (from `indices`) of the point nearest to `target`; the first one wins ties
fn closest_to(points: &[Point3d], indices: &[usize], target: &Point3d) -> usize {
    // Offsets are rescaled by a power of two so squared distances cannot overflow
    let largest = indices
        .iter()
        .map(|&idx| (points[idx] - target).amax())
        .fold(0.0, f64::max);
    if largest == 0.0 || !largest.is_finite() {
        return indices[0];
    }
    let scale = 2f64.powi(largest.log2().floor() as i32);

    let mut best = indices[0];
    let mut best_dist = f64::INFINITY;
    for &idx in indices {
        let dist = ((points[idx] - target) / scale).norm_squared();
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

fn mean_color(colors: &[Rgb], indices: &[usize]) -> Rgb {
    let mut sum = [0u64; 3];
    for &idx in indices {
        for (channel, value) in sum.iter_mut().zip(colors[idx]) {
            *channel += u64::from(value);
        }
    }
    let n = indices.len() as f64;
    sum.map(|s| (s as f64 / n).round() as u16)
}
