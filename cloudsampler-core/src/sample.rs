//! Sampling tags, cache keys and sample sets

use crate::{Error, PointCloud, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The reductions a point cloud can be sampled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingType {
    /// Keep every k-th point in original order
    Factor,
    /// One synthetic point per voxel: the mean of its members
    Barycenter,
    /// One input point per voxel: the member nearest to the voxel mean
    Closest,
}

impl SamplingType {
    /// Every available sampling, in tag order
    pub const ALL: [SamplingType; 3] = [SamplingType::Factor, SamplingType::Barycenter, SamplingType::Closest];

    /// Text tag used in file names and on the command line
    pub fn tag(&self) -> &'static str {
        match self {
            SamplingType::Factor => "factor",
            SamplingType::Barycenter => "barycenter",
            SamplingType::Closest => "closest",
        }
    }
}

impl fmt::Display for SamplingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SamplingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "factor" => Ok(SamplingType::Factor),
            "barycenter" | "barycenter_sample" => Ok(SamplingType::Barycenter),
            "closest" => Ok(SamplingType::Closest),
            _ => Err(Error::InvalidSamplingType(s.to_string())),
        }
    }
}

/// Parameters a sample was computed with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SampleParams {
    /// Stride between kept points
    Factor(usize),
    /// Voxel edge length
    VoxelSize(f64),
}

impl fmt::Display for SampleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleParams::Factor(factor) => write!(f, "factor={}", factor),
            SampleParams::VoxelSize(size) => write!(f, "voxel_size={}", size),
        }
    }
}

/// Cache key identifying one reduction of one cloud.
///
/// Voxel sizes compare by bit pattern so the key can be hashed; two requests
/// share an entry only if every parameter is identical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SampleKey {
    pub sampling: SamplingType,
    pub params: SampleParams,
}

impl SampleKey {
    pub fn factor(factor: usize) -> Self {
        Self {
            sampling: SamplingType::Factor,
            params: SampleParams::Factor(factor),
        }
    }

    pub fn grid(sampling: SamplingType, voxel_size: f64) -> Self {
        Self {
            sampling,
            params: SampleParams::VoxelSize(voxel_size),
        }
    }

    fn param_bits(&self) -> (u8, u64) {
        match self.params {
            SampleParams::Factor(factor) => (0, factor as u64),
            SampleParams::VoxelSize(size) => (1, size.to_bits()),
        }
    }
}

impl PartialEq for SampleKey {
    fn eq(&self, other: &Self) -> bool {
        self.sampling == other.sampling && self.param_bits() == other.param_bits()
    }
}

impl Eq for SampleKey {}

impl Hash for SampleKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sampling.hash(state);
        self.param_bits().hash(state);
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.sampling, self.params)
    }
}

/// An ordered set of representative points tagged with how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    key: SampleKey,
    points: PointCloud,
}

impl SampleSet {
    pub fn new(key: SampleKey, points: PointCloud) -> Self {
        Self { key, points }
    }

    pub fn key(&self) -> SampleKey {
        self.key
    }

    pub fn sampling(&self) -> SamplingType {
        self.key.sampling
    }

    pub fn params(&self) -> SampleParams {
        self.key.params
    }

    /// The representatives, with aligned colors when available
    pub fn points(&self) -> &PointCloud {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_tags() {
        assert_eq!("factor".parse::<SamplingType>().unwrap(), SamplingType::Factor);
        assert_eq!("Closest".parse::<SamplingType>().unwrap(), SamplingType::Closest);
        assert_eq!("barycenter".parse::<SamplingType>().unwrap(), SamplingType::Barycenter);
        assert_eq!("barycenter_sample".parse::<SamplingType>().unwrap(), SamplingType::Barycenter);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = "median".parse::<SamplingType>().unwrap_err();
        assert!(matches!(err, Error::InvalidSamplingType(ref tag) if tag == "median"));
    }

    #[test]
    fn test_tags_round_trip() {
        for sampling in SamplingType::ALL {
            assert_eq!(sampling.tag().parse::<SamplingType>().unwrap(), sampling);
        }
    }

    #[test]
    fn test_keys_with_different_params_differ() {
        let mut keys = HashSet::new();
        keys.insert(SampleKey::grid(SamplingType::Closest, 0.5));
        keys.insert(SampleKey::grid(SamplingType::Closest, 0.25));
        keys.insert(SampleKey::grid(SamplingType::Barycenter, 0.5));
        keys.insert(SampleKey::factor(2));
        keys.insert(SampleKey::factor(3));
        assert_eq!(keys.len(), 5);

        assert!(keys.contains(&SampleKey::grid(SamplingType::Closest, 0.5)));
        assert!(!keys.contains(&SampleKey::factor(4)));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(SampleKey::factor(3).to_string(), "factor(factor=3)");
        assert_eq!(
            SampleKey::grid(SamplingType::Closest, 0.5).to_string(),
            "closest(voxel_size=0.5)"
        );
    }
}
