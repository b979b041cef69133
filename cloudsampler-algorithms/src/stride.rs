//! Stride ("factor") subsampling

use cloudsampler_core::{Error, PointCloud, Result};

/// Keep the points at indices `0, factor, 2 * factor, ...` in original order.
///
/// Colors follow the same stride. Fails with [`Error::InvalidInput`] if
/// `factor` is zero.
///
/// # Example
/// ```rust
/// use cloudsampler_core::PointCloud;
/// use cloudsampler_algorithms::stride_sample;
///
/// fn main() -> cloudsampler_core::Result<()> {
///     let rows: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
///     let cloud = PointCloud::from_rows(&rows)?;
///
///     let sampled = stride_sample(&cloud, 3)?;
///     assert_eq!(sampled.len(), 4);
///     Ok(())
/// }
/// ```
pub fn stride_sample(cloud: &PointCloud, factor: usize) -> Result<PointCloud> {
    if factor == 0 {
        return Err(Error::InvalidInput(
            "sampling factor must be a positive integer".to_string(),
        ));
    }

    let indices: Vec<usize> = (0..cloud.len()).step_by(factor).collect();
    Ok(cloud.select(&indices))
}
