//! A loaded point cloud and the samples computed from it

use crate::cache::{CacheStats, SampleCache};
use crate::config::SamplerConfig;
use cloudsampler_algorithms::{stride_sample, GridStrategy, GridSubsampler, VoxelGridIndex};
use cloudsampler_core::{
    Bounded, Error, Point3d, PointCloud, Result, Rgb, SampleKey, SampleSet, SamplingType,
};
use cloudsampler_io::{PointCloudReader, ReaderRegistry, SampleWriter};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, info_span, Span};

/// Owner of one immutable point cloud and its cached samples.
///
/// Every sample is computed at most once per (sampling, parameters) pair and
/// shared through an [`Arc`]. Voxel grids are cached per voxel size, so the
/// barycenter and closest samplings of one size share a single grid build.
/// [`PointCloudSource::reset`] is the only way to drop cached results.
#[derive(Debug)]
pub struct PointCloudSource {
    cloud: PointCloud,
    path: Option<PathBuf>,
    config: SamplerConfig,
    samples: SampleCache<SampleKey, SampleSet>,
    grids: SampleCache<u64, VoxelGridIndex>,
    latest: HashMap<SamplingType, SampleKey>,
    span: Span,
}

impl PointCloudSource {
    /// Create a source from exactly one of an in-memory cloud or a file path
    pub fn new(points: Option<PointCloud>, file: Option<PathBuf>) -> Result<Self> {
        match (points, file) {
            (Some(cloud), None) => Ok(Self::from_points(cloud)),
            (None, Some(path)) => Self::from_file(path),
            (Some(_), Some(path)) => Err(Error::InvalidInput(format!(
                "both an in-memory cloud and a file ({}) were given; pass exactly one",
                path.display()
            ))),
            (None, None) => Err(Error::InvalidInput(
                "neither an in-memory cloud nor a file was given; pass exactly one".to_string(),
            )),
        }
    }

    pub fn from_points(cloud: PointCloud) -> Self {
        Self::build(cloud, None, info_span!("point_cloud_source"))
    }

    /// Create a source from an N×3 coordinate array
    pub fn from_rows(rows: &[[f64; 3]]) -> Result<Self> {
        Ok(Self::from_points(PointCloud::from_rows(rows)?))
    }

    /// Create a source from an N×3 coordinate array and aligned colors
    pub fn from_rows_with_colors(rows: &[[f64; 3]], colors: &[Rgb]) -> Result<Self> {
        Ok(Self::from_points(PointCloud::from_rows_with_colors(rows, colors)?))
    }

    /// Load a source from any file format the default readers support
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let span = info_span!("point_cloud_source", path = %path.display());
        let cloud = {
            let _enter = span.enter();
            ReaderRegistry::with_defaults().read_point_cloud(path)?
        };
        Ok(Self::build(cloud, Some(path.to_path_buf()), span))
    }

    /// Load a source through a specific reader
    pub fn from_file_with<P: AsRef<Path>>(path: P, reader: &dyn PointCloudReader) -> Result<Self> {
        let path = path.as_ref();
        let span = info_span!("point_cloud_source", path = %path.display());
        let cloud = {
            let _enter = span.enter();
            reader.read_point_cloud(path)?
        };
        Ok(Self::build(cloud, Some(path.to_path_buf()), span))
    }

    fn build(cloud: PointCloud, path: Option<PathBuf>, span: Span) -> Self {
        span.in_scope(|| {
            info!(points = cloud.len(), colored = cloud.has_colors(), "loaded point cloud");
        });
        Self {
            cloud,
            path,
            config: SamplerConfig::default(),
            samples: SampleCache::new(),
            grids: SampleCache::new(),
            latest: HashMap::new(),
            span,
        }
    }

    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    /// Log every operation of this source inside `span`
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// File the cloud was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn positions(&self) -> &[Point3d] {
        self.cloud.positions()
    }

    pub fn colors(&self) -> Option<&[Rgb]> {
        self.cloud.colors()
    }

    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> Result<(Point3d, Point3d)> {
        self.cloud
            .bounding_box()
            .ok_or_else(|| Error::EmptyPointSet("bounds".to_string()))
    }

    /// Keep every `factor`-th point in original order
    pub fn factor_sample(&mut self, factor: usize) -> Result<Arc<SampleSet>> {
        let span = self.span.clone();
        let _enter = span.enter();

        let key = SampleKey::factor(factor);
        let cloud = &self.cloud;
        let sample = self.samples.get_or_compute(key, || {
            debug!(sample = %key, "computing sample");
            Ok(SampleSet::new(key, stride_sample(cloud, factor)?))
        })?;

        self.latest.insert(SamplingType::Factor, key);
        Ok(sample)
    }

    /// One representative per occupied voxel of edge `voxel_size`
    pub fn grid_sample(&mut self, voxel_size: f64, sampling: SamplingType) -> Result<Arc<SampleSet>> {
        let span = self.span.clone();
        let _enter = span.enter();

        let strategy = GridStrategy::try_from(sampling)?;
        let key = SampleKey::grid(sampling, voxel_size);
        let subsampler = GridSubsampler::new(strategy)
            .with_colors(self.config.carry_colors)
            .with_parallel(self.config.parallel);

        let cloud = &self.cloud;
        let grids = &mut self.grids;
        let sample = self.samples.get_or_compute(key, || {
            debug!(sample = %key, "computing sample");
            let grid = cached_grid(grids, cloud, voxel_size)?;
            Ok(SampleSet::new(key, subsampler.reduce(cloud, &grid)?))
        })?;

        self.latest.insert(sampling, key);
        Ok(sample)
    }

    /// Dispatch on the sampling type.
    ///
    /// `param` is the stride for [`SamplingType::Factor`] and must then be a
    /// positive whole number; for grid samplings it is the voxel size.
    pub fn sample(&mut self, sampling: SamplingType, param: f64) -> Result<Arc<SampleSet>> {
        match sampling {
            SamplingType::Factor => {
                if !(param.is_finite() && param >= 1.0 && param.fract() == 0.0) {
                    return Err(Error::InvalidInput(format!(
                        "factor must be a positive integer, got {}",
                        param
                    )));
                }
                self.factor_sample(param as usize)
            }
            SamplingType::Barycenter | SamplingType::Closest => self.grid_sample(param, sampling),
        }
    }

    /// The voxel grid for `voxel_size`, built on first use
    pub fn voxel_grid(&mut self, voxel_size: f64) -> Result<Arc<VoxelGridIndex>> {
        let span = self.span.clone();
        let _enter = span.enter();
        cached_grid(&mut self.grids, &self.cloud, voxel_size)
    }

    /// Most recently computed sample of `sampling`, if still cached
    pub fn latest_sample(&self, sampling: SamplingType) -> Option<Arc<SampleSet>> {
        self.latest.get(&sampling).and_then(|key| self.samples.get(key))
    }

    /// Write the most recent sample of `sampling` to `{base}_{tag}_sampled.xyz`
    pub fn save<P: AsRef<Path>>(&self, sampling: SamplingType, base: P) -> Result<PathBuf> {
        let _enter = self.span.enter();

        let sample = self.latest_sample(sampling).ok_or_else(|| {
            Error::InvalidInput(format!("no {} sample has been computed yet", sampling))
        })?;
        SampleWriter::new(self.config.output.clone()).write_sample(&sample, base)
    }

    /// Drop every cached sample and grid
    pub fn reset(&mut self) {
        let _enter = self.span.enter();
        info!(samples = self.samples.len(), grids = self.grids.len(), "resetting caches");
        self.samples.clear();
        self.grids.clear();
        self.latest.clear();
    }

    /// Hit and miss counters of the sample cache
    pub fn cache_stats(&self) -> CacheStats {
        self.samples.stats()
    }
}

fn cached_grid(
    grids: &mut SampleCache<u64, VoxelGridIndex>,
    cloud: &PointCloud,
    voxel_size: f64,
) -> Result<Arc<VoxelGridIndex>> {
    grids.get_or_compute(voxel_size.to_bits(), || {
        debug!(voxel_size, "building voxel grid");
        VoxelGridIndex::build(cloud.positions(), voxel_size)
    })
}
