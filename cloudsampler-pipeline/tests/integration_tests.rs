//! Integration tests for cloudsampler-pipeline
//!
//! These tests load clouds from disk, sample them through the cached source
//! and write the results back out.

use approx::assert_relative_eq;
use cloudsampler_core::{Bounded, Error, Point3d, PointCloud, SampleKey, SamplingType};
use cloudsampler_io::{XyzReader, XyzWriteOptions};
use cloudsampler_pipeline::*;
use proptest::prelude::*;
use std::sync::Arc;

/// Corners of the unit cube, index 0 at the origin
fn unit_cube() -> Vec<[f64; 3]> {
    let mut rows = Vec::new();
    for x in 0..2 {
        for y in 0..2 {
            for z in 0..2 {
                rows.push([x as f64, y as f64, z as f64]);
            }
        }
    }
    rows
}

/// Two separated clusters with colors
fn colored_clusters() -> PointCloudSource {
    let rows = [
        [0.0, 0.0, 0.0],
        [0.2, 0.0, 0.0],
        [0.0, 0.2, 0.0],
        [5.0, 5.0, 5.0],
        [5.5, 5.5, 5.5],
    ];
    let colors = [[0, 0, 0], [30, 60, 90], [0, 0, 3], [1000, 1000, 1000], [2000, 2000, 2001]];
    PointCloudSource::from_rows_with_colors(&rows, &colors).unwrap()
}

fn arb_rows() -> impl Strategy<Value = Vec<[f64; 3]>> {
    prop::collection::vec(prop::array::uniform3(-50.0f64..50.0), 0..200)
}

#[test]
fn test_unit_cube_single_voxel() {
    let mut source = PointCloudSource::from_rows(&unit_cube()).unwrap();

    let barycenter = source.grid_sample(2.0, SamplingType::Barycenter).unwrap();
    assert_eq!(barycenter.len(), 1);
    let center = barycenter.points()[0];
    assert_relative_eq!(center.x, 0.5);
    assert_relative_eq!(center.y, 0.5);
    assert_relative_eq!(center.z, 0.5);

    let closest = source.grid_sample(2.0, SamplingType::Closest).unwrap();
    assert_eq!(closest.len(), 1);
    assert_eq!(closest.points()[0], Point3d::new(0.0, 0.0, 0.0));
}

#[test]
fn test_stride_of_ten_by_three() {
    let rows: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
    let mut source = PointCloudSource::from_rows(&rows).unwrap();

    let sample = source.factor_sample(3).unwrap();
    let xs: Vec<f64> = sample.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 3.0, 6.0, 9.0]);

    assert!(matches!(source.factor_sample(0), Err(Error::InvalidInput(_))));
}

#[test]
fn test_empty_cloud_grid_samples_are_empty() {
    let mut source = PointCloudSource::from_points(PointCloud::new());
    for sampling in [SamplingType::Barycenter, SamplingType::Closest] {
        let sample = source.grid_sample(1.0, sampling).unwrap();
        assert!(sample.is_empty());
    }
}

#[test]
fn test_repeated_requests_hit_the_cache() {
    let mut source = colored_clusters();

    let first = source.grid_sample(1.0, SamplingType::Closest).unwrap();
    let second = source.grid_sample(1.0, SamplingType::Closest).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.cache_stats(), CacheStats { hits: 1, misses: 1 });

    let other = source.grid_sample(0.5, SamplingType::Closest).unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(other.key(), SampleKey::grid(SamplingType::Closest, 0.5));
    assert_eq!(source.cache_stats().misses, 2);
}

#[test]
fn test_colors_through_strategies() {
    let mut source = colored_clusters();

    let closest = source.grid_sample(1.0, SamplingType::Closest).unwrap();
    assert_eq!(closest.points().colors().unwrap(), &[[0, 0, 0], [1000, 1000, 1000]]);

    let barycenter = source.grid_sample(1.0, SamplingType::Barycenter).unwrap();
    assert_eq!(barycenter.points().colors().unwrap(), &[[10, 20, 31], [1500, 1500, 1501]]);

    let config = SamplerConfig {
        carry_colors: false,
        ..SamplerConfig::default()
    };
    let mut plain = colored_clusters().with_config(config);
    let sample = plain.grid_sample(1.0, SamplingType::Barycenter).unwrap();
    assert!(!sample.points().has_colors());
}

#[test]
fn test_load_sample_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.xyz");
    std::fs::write(&input, "x;y;z;r;g;b\n0;0;0;10;10;10\n0.5;0;0;20;20;20\n3;3;3;30;30;30\n").unwrap();

    let mut source = PointCloudSource::from_file(&input).unwrap();
    assert_eq!(source.len(), 3);
    assert_eq!(source.path(), Some(input.as_path()));

    let sample = source.grid_sample(1.0, SamplingType::Closest).unwrap();
    let base = dir.path().join("scan");
    let path = source.save(SamplingType::Closest, &base).unwrap();
    assert_eq!(path, dir.path().join("scan_closest_sampled.xyz"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "0;0;0;10;10;10\n3;3;3;30;30;30\n");

    let reloaded = XyzReader::read(&path).unwrap();
    assert_eq!(&reloaded, sample.points());
}

#[test]
fn test_save_uses_most_recent_sample() {
    let dir = tempfile::tempdir().unwrap();
    let config = SamplerConfig {
        output: XyzWriteOptions {
            include_colors: false,
            ..XyzWriteOptions::default()
        },
        ..SamplerConfig::default()
    };
    let mut source = colored_clusters().with_config(config);

    source.factor_sample(2).unwrap();
    source.factor_sample(4).unwrap();
    let path = source.save(SamplingType::Factor, dir.path().join("clusters")).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "0;0;0\n5.5;5.5;5.5\n");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = PointCloudSource::from_file(dir.path().join("absent.las"));
    assert!(matches!(result, Err(Error::FileRead { .. })));
}

#[test]
fn test_unknown_sampling_tag() {
    let result = "nearest".parse::<SamplingType>();
    assert!(matches!(result, Err(Error::InvalidSamplingType(_))));
}

proptest! {
    #[test]
    fn prop_closest_representatives_are_input_points(rows in arb_rows(), voxel_size in 0.5f64..20.0) {
        let mut source = PointCloudSource::from_rows(&rows).unwrap();
        let sample = source.grid_sample(voxel_size, SamplingType::Closest).unwrap();
        for p in sample.points().iter() {
            prop_assert!(source.positions().contains(p));
        }
    }

    #[test]
    fn prop_sampling_is_deterministic(rows in arb_rows(), voxel_size in 0.5f64..20.0) {
        for sampling in [SamplingType::Barycenter, SamplingType::Closest] {
            let mut sequential = PointCloudSource::from_rows(&rows).unwrap().with_config(SamplerConfig {
                parallel: false,
                ..SamplerConfig::default()
            });
            let mut parallel = PointCloudSource::from_rows(&rows).unwrap();

            let a = sequential.grid_sample(voxel_size, sampling).unwrap();
            let b = parallel.grid_sample(voxel_size, sampling).unwrap();
            prop_assert_eq!(a.points(), b.points());
        }
    }

    #[test]
    fn prop_voxel_larger_than_diagonal_gives_one_point(rows in arb_rows()) {
        prop_assume!(!rows.is_empty());
        let mut source = PointCloudSource::from_rows(&rows).unwrap();
        let voxel_size = source.cloud().diagonal() + 1.0;
        for sampling in [SamplingType::Barycenter, SamplingType::Closest] {
            let sample = source.grid_sample(voxel_size, sampling).unwrap();
            prop_assert_eq!(sample.len(), 1);
        }
    }

    #[test]
    fn prop_factor_sample_count(rows in arb_rows(), factor in 1usize..20) {
        let mut source = PointCloudSource::from_rows(&rows).unwrap();
        let sample = source.factor_sample(factor).unwrap();
        prop_assert_eq!(sample.len(), rows.len().div_ceil(factor));
    }
}
