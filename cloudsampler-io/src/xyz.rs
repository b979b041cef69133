//! Delimited text (XYZ/CSV) point cloud reading
//!
//! Supports:
//! - Auto-detection of delimiters (comma, space, tab, semicolon)
//! - An optional header row naming the columns (`x,y,z[,r,g,b]`)
//! - Headerless rows of `x y z` or `x y z r g b`
//!
//! Every row of a file must have the same shape: either all points carry a
//! color or none do.

use crate::error::FormatError;
use crate::registry::PointCloudReader;
use cloudsampler_core::{BoxedCause, Error, Point3d, PointCloud, Result, Rgb};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Supported delimiters for XYZ/CSV files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Space,
    Tab,
    #[default]
    Semicolon,
}

impl Delimiter {
    /// Get the character representation of the delimiter
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Space => ' ',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
        }
    }

    /// Map a single character back to a delimiter
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Delimiter::Comma),
            ' ' => Some(Delimiter::Space),
            '\t' => Some(Delimiter::Tab),
            ';' => Some(Delimiter::Semicolon),
            _ => None,
        }
    }

    /// Detect delimiter from a line of text
    pub fn detect_from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        let counts = [
            (line.matches(',').count(), Delimiter::Comma),
            (line.matches(';').count(), Delimiter::Semicolon),
            (line.matches('\t').count(), Delimiter::Tab),
            (line.matches(' ').count(), Delimiter::Space),
        ];

        // Earlier entries win ties so "1, 2, 3" is read as comma separated
        counts
            .iter()
            .filter(|(count, _)| *count > 0)
            .fold(None, |best: Option<(usize, Delimiter)>, &(count, d)| match best {
                Some((best_count, _)) if best_count >= count => best,
                _ => Some((count, d)),
            })
            .map(|(_, d)| d)
    }

    /// Split a line into trimmed fields
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Space => line.split_whitespace().collect(),
            d => line.split(d.as_char()).map(|s| s.trim()).collect(),
        }
    }
}

/// Column positions resolved from a header or from the first row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    position: [usize; 3],
    color: Option<[usize; 3]>,
}

impl Layout {
    fn width(&self) -> usize {
        let max_pos = self.position.iter().copied().max().unwrap_or(0);
        let max_color = self.color.map(|c| c.iter().copied().max().unwrap_or(0)).unwrap_or(0);
        max_pos.max(max_color) + 1
    }

    fn from_header(fields: &[&str]) -> std::result::Result<Self, String> {
        let find = |names: &[&str]| {
            fields
                .iter()
                .position(|f| names.contains(&f.to_lowercase().as_str()))
        };

        let x = find(&["x", "px", "pos_x", "position_x"]);
        let y = find(&["y", "py", "pos_y", "position_y"]);
        let z = find(&["z", "pz", "pos_z", "position_z"]);
        let position = match (x, y, z) {
            (Some(x), Some(y), Some(z)) => [x, y, z],
            _ => return Err("header must name x, y and z columns".to_string()),
        };

        let r = find(&["r", "red", "color_r"]);
        let g = find(&["g", "green", "color_g"]);
        let b = find(&["b", "blue", "color_b"]);
        let color = match (r, g, b) {
            (Some(r), Some(g), Some(b)) => Some([r, g, b]),
            _ => None,
        };

        Ok(Self { position, color })
    }

    fn from_row_width(width: usize) -> std::result::Result<Self, String> {
        match width {
            0..=2 => Err(format!("expected at least 3 columns (x, y, z), found {}", width)),
            3..=5 => Ok(Self { position: [0, 1, 2], color: None }),
            _ => Ok(Self { position: [0, 1, 2], color: Some([3, 4, 5]) }),
        }
    }
}

/// Reader for delimited text point clouds (`.xyz`, `.txt`, `.csv`)
pub struct XyzReader;

impl XyzReader {
    /// Read a point cloud with auto-detected delimiter and layout
    pub fn read<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
        Self::read_from(BufReader::new(file)).map_err(|e| Error::file_read(path, e))
    }

    fn read_from<R: BufRead>(reader: R) -> std::result::Result<PointCloud, BoxedCause> {
        let mut delimiter = None;
        let mut layout = None;
        let mut positions = Vec::new();
        let mut colors: Vec<Rgb> = Vec::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = line_idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let delimiter = *delimiter.get_or_insert_with(|| {
                Delimiter::detect_from_line(trimmed).unwrap_or(Delimiter::Space)
            });
            let fields = delimiter.split(trimmed);

            let layout = match layout {
                Some(layout) => layout,
                None => {
                    let is_header = fields.iter().take(3).any(|f| f.parse::<f64>().is_err());
                    let resolved = if is_header {
                        Layout::from_header(&fields)
                    } else {
                        Layout::from_row_width(fields.len())
                    }
                    .map_err(|message| FormatError::Parse { line: line_num, message })?;
                    debug!(?delimiter, ?resolved, header = is_header, "detected text layout");
                    layout = Some(resolved);
                    if is_header {
                        continue;
                    }
                    resolved
                }
            };

            if fields.len() < layout.width() {
                return Err(FormatError::Parse {
                    line: line_num,
                    message: format!("expected {} columns, found {}", layout.width(), fields.len()),
                }
                .into());
            }

            let coord = |i: usize| parse_field(fields[layout.position[i]], line_num);
            positions.push(Point3d::new(coord(0)?, coord(1)?, coord(2)?));

            if let Some(color_cols) = layout.color {
                let mut rgb = [0u16; 3];
                for (channel, &col) in rgb.iter_mut().zip(&color_cols) {
                    *channel = parse_field(fields[col], line_num)?.round().clamp(0.0, u16::MAX as f64) as u16;
                }
                colors.push(rgb);
            }
        }

        let cloud = match layout.and_then(|l| l.color) {
            Some(_) => PointCloud::with_colors(positions, colors)?,
            None => PointCloud::from_points(positions)?,
        };
        Ok(cloud)
    }
}

fn parse_field(field: &str, line: usize) -> std::result::Result<f64, FormatError> {
    field.parse::<f64>().map_err(|_| FormatError::Parse {
        line,
        message: format!("'{}' is not a number", field),
    })
}

impl PointCloudReader for XyzReader {
    fn read_point_cloud(&self, path: &Path) -> Result<PointCloud> {
        XyzReader::read(path)
    }

    fn can_read(&self, path: &Path) -> bool {
        crate::has_extension(path, &["xyz", "txt", "csv"])
    }

    fn format_name(&self) -> &'static str {
        "xyz"
    }
}
