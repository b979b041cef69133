//! Delimited text output for sample sets
//!
//! Sample files are named `{base}_{tag}_sampled.xyz` and hold one
//! representative per line: `x;y;z` or `x;y;z;r;g;b` with the default
//! options.

use crate::xyz::Delimiter;
use cloudsampler_core::{Error, PointCloud, Result, SampleSet};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write options for sample files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XyzWriteOptions {
    pub delimiter: Delimiter,
    /// Fixed number of decimals; `None` writes the shortest exact form
    pub precision: Option<usize>,
    pub include_colors: bool,
    pub include_header: bool,
}

impl Default for XyzWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Semicolon,
            precision: None,
            include_colors: true,
            include_header: false,
        }
    }
}

/// Writes sample sets to delimited text files
#[derive(Debug, Clone, Default)]
pub struct SampleWriter {
    options: XyzWriteOptions,
}

impl SampleWriter {
    pub fn new(options: XyzWriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &XyzWriteOptions {
        &self.options
    }

    /// Path a sample with the given tag is written to
    pub fn output_path<P: AsRef<Path>>(base: P, tag: &str) -> PathBuf {
        let mut name = OsString::from(base.as_ref().as_os_str());
        name.push(format!("_{}_sampled.xyz", tag));
        PathBuf::from(name)
    }

    /// Write a sample set under an explicit tag, returning the file path
    pub fn write<P: AsRef<Path>>(&self, sample: &SampleSet, base: P, tag: &str) -> Result<PathBuf> {
        let path = Self::output_path(base, tag);
        self.write_cloud(sample.points(), &path)?;
        info!(
            path = %path.display(),
            sample = %sample.key(),
            points = sample.len(),
            "wrote sample"
        );
        Ok(path)
    }

    /// Write a sample set tagged with its own sampling type
    pub fn write_sample<P: AsRef<Path>>(&self, sample: &SampleSet, base: P) -> Result<PathBuf> {
        self.write(sample, base, sample.sampling().tag())
    }

    /// Write any point cloud to an explicit path
    pub fn write_cloud<P: AsRef<Path>>(&self, cloud: &PointCloud, path: P) -> Result<()> {
        let path = path.as_ref();
        self.write_rows(cloud, path).map_err(|e| Error::write(path, e))
    }

    fn write_rows(&self, cloud: &PointCloud, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let delimiter = self.options.delimiter.as_char().to_string();
        let colors = cloud.colors().filter(|_| self.options.include_colors);

        if self.options.include_header {
            let columns: &[&str] = if colors.is_some() {
                &["x", "y", "z", "r", "g", "b"]
            } else {
                &["x", "y", "z"]
            };
            writeln!(writer, "{}", columns.join(&delimiter))?;
        }

        for (index, point) in cloud.iter().enumerate() {
            let mut fields: Vec<String> = point.coords.iter().map(|&v| self.format_value(v)).collect();
            if let Some(colors) = colors {
                fields.extend(colors[index].iter().map(|c| c.to_string()));
            }
            writeln!(writer, "{}", fields.join(&delimiter))?;
        }

        writer.flush()
    }

    fn format_value(&self, value: f64) -> String {
        match self.options.precision {
            Some(precision) => format!("{:.*}", precision, value),
            None => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xyz::XyzReader;
    use cloudsampler_core::{Point3d, SampleKey, SamplingType};

    fn colored_sample() -> SampleSet {
        let cloud = PointCloud::with_colors(
            vec![Point3d::new(0.5, 1.0, -2.25), Point3d::new(3.0, 4.0, 5.0)],
            vec![[10, 20, 30], [65535, 0, 7]],
        )
        .unwrap();
        SampleSet::new(SampleKey::grid(SamplingType::Closest, 0.5), cloud)
    }

    #[test]
    fn test_output_path_naming() {
        assert_eq!(
            SampleWriter::output_path("data/tile", "closest"),
            PathBuf::from("data/tile_closest_sampled.xyz")
        );
        assert_eq!(
            SampleWriter::output_path("scan.las", "factor"),
            PathBuf::from("scan.las_factor_sampled.xyz")
        );
    }

    #[test]
    fn test_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SampleWriter::default();
        let path = writer.write_sample(&colored_sample(), dir.path().join("tile")).unwrap();

        assert_eq!(path, dir.path().join("tile_closest_sampled.xyz"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0.5;1;-2.25;10;20;30\n3;4;5;65535;0;7\n");
    }

    #[test]
    fn test_options_precision_header_no_colors() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SampleWriter::new(XyzWriteOptions {
            delimiter: Delimiter::Comma,
            precision: Some(2),
            include_colors: false,
            include_header: true,
        });
        let path = writer.write(&colored_sample(), dir.path().join("tile"), "custom").unwrap();

        assert_eq!(path, dir.path().join("tile_custom_sampled.xyz"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "x,y,z\n0.50,1.00,-2.25\n3.00,4.00,5.00\n");
    }

    #[test]
    fn test_written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let sample = colored_sample();
        let path = SampleWriter::default().write_sample(&sample, dir.path().join("tile")).unwrap();

        let cloud = XyzReader::read(&path).unwrap();
        assert_eq!(&cloud, sample.points());
    }

    #[test]
    fn test_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("missing").join("tile");
        let err = SampleWriter::default().write_sample(&colored_sample(), &base).unwrap_err();
        match err {
            Error::Write { path, .. } => assert_eq!(path, dir.path().join("missing/tile_closest_sampled.xyz")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
