//! Grid descriptors: where each grid lives in a pile and how its nodes map
//! to coordinates.
//!
//! A descriptor is written as a single line of `Key=Value` pairs after a
//! grid name, as consumed by grid-based datum shift operators:
//!
//! ```text
//! geoid Whence=0 Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11
//! datum Whence=924 Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11 Bands=2
//! ```
//!
//! `Whence` is the byte offset of the grid inside the pile. `Left`/`Top`
//! are the coordinates of the first node, `Right`/`Bottom` those of the
//! last. Nodes are stored row-major with the band innermost.

use std::fmt;
use std::path::Path;

use bytes::Buf;
use tracing::{debug, info};

use crate::error::{PileError, Result};
use crate::grid::{COLUMNS, DATUM_BANDS, ROWS, TOP_LATITUDE};
use crate::layout::{DATUM_OFFSET, GEOID_OFFSET, VALUE_SIZE};

/// Location and georeferencing of one grid inside a pile.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDescriptor {
    /// Grid name (first token of the definition).
    pub name: String,
    /// Byte offset from the start of the pile.
    pub whence: usize,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub bands: usize,
    pub columns: usize,
    pub rows: usize,
}

const KNOWN_KEYS: [&str; 8] = [
    "Whence", "Left", "Right", "Top", "Bottom", "Bands", "Columns", "Rows",
];

impl GridDescriptor {
    /// Descriptor of the geoid grid in `pile.bin`.
    pub fn geoid() -> Self {
        Self {
            name: "geoid".to_string(),
            whence: GEOID_OFFSET,
            left: 0.0,
            right: (COLUMNS - 1) as f64,
            top: TOP_LATITUDE,
            bottom: TOP_LATITUDE - (ROWS - 1) as f64,
            bands: 1,
            columns: COLUMNS,
            rows: ROWS,
        }
    }

    /// Descriptor of the datum grid in `pile.bin`.
    pub fn datum() -> Self {
        Self {
            name: "datum".to_string(),
            whence: DATUM_OFFSET,
            bands: DATUM_BANDS,
            ..Self::geoid()
        }
    }

    /// Parse a `name Key=Value ...` definition.
    ///
    /// `Columns` and `Rows` are required and must be at least 2. `Left`,
    /// `Right`, `Top` and `Bottom` are required. `Whence` defaults to 0
    /// and `Bands` to 1.
    pub fn parse(definition: &str) -> Result<Self> {
        let mut tokens = definition.split_whitespace();
        let name = match tokens.next() {
            Some(name) if !name.contains('=') => name.to_string(),
            _ => return Err(PileError::invalid_descriptor("missing grid name")),
        };

        let mut values: [Option<f64>; 8] = [None; 8];
        for token in tokens {
            let (key, raw) = token.split_once('=').ok_or_else(|| {
                PileError::invalid_descriptor(format!("expected Key=Value, got '{}'", token))
            })?;
            let slot = KNOWN_KEYS
                .iter()
                .position(|k| *k == key)
                .ok_or_else(|| PileError::invalid_descriptor(format!("unknown key '{}'", key)))?;
            let value: f64 = raw.parse().map_err(|_| {
                PileError::invalid_descriptor(format!("{} is not a number: '{}'", key, raw))
            })?;
            if !value.is_finite() {
                return Err(PileError::invalid_descriptor(format!(
                    "{} must be finite",
                    key
                )));
            }
            values[slot] = Some(value);
        }

        let real = |idx: usize| -> Result<f64> {
            values[idx].ok_or_else(|| {
                PileError::invalid_descriptor(format!("missing required key {}", KNOWN_KEYS[idx]))
            })
        };
        let natural = |idx: usize, default: Option<usize>| -> Result<usize> {
            match values[idx] {
                // usize::MAX as f64 rounds up, so `<` keeps the cast exact
                Some(v) if v >= 0.0 && v.fract() == 0.0 && v < usize::MAX as f64 => {
                    Ok(v as usize)
                }
                Some(v) => Err(PileError::invalid_descriptor(format!(
                    "{} must be a non-negative integer, got {}",
                    KNOWN_KEYS[idx], v
                ))),
                None => default.ok_or_else(|| {
                    PileError::invalid_descriptor(format!(
                        "missing required key {}",
                        KNOWN_KEYS[idx]
                    ))
                }),
            }
        };

        let descriptor = Self {
            name,
            whence: natural(0, Some(0))?,
            left: real(1)?,
            right: real(2)?,
            top: real(3)?,
            bottom: real(4)?,
            bands: natural(5, Some(1))?,
            columns: natural(6, None)?,
            rows: natural(7, None)?,
        };

        if descriptor.columns < 2 || descriptor.rows < 2 {
            return Err(PileError::invalid_descriptor(format!(
                "grid must have at least 2 columns and 2 rows, got {}x{}",
                descriptor.columns, descriptor.rows
            )));
        }
        if descriptor.bands < 1 {
            return Err(PileError::invalid_descriptor("Bands must be at least 1"));
        }
        if descriptor.left == descriptor.right || descriptor.top == descriptor.bottom {
            return Err(PileError::invalid_descriptor(format!(
                "grid extent must be non-degenerate, got Left={} Right={} Top={} Bottom={}",
                descriptor.left, descriptor.right, descriptor.top, descriptor.bottom
            )));
        }
        if descriptor.end_offset().is_none() {
            return Err(PileError::invalid_descriptor(format!(
                "grid of {}x{}x{} values at Whence={} does not fit in memory",
                descriptor.bands, descriptor.columns, descriptor.rows, descriptor.whence
            )));
        }

        Ok(descriptor)
    }

    /// Render the definition line.
    pub fn to_definition(&self) -> String {
        let mut line = format!(
            "{} Whence={} Left={} Right={} Top={} Bottom={} Columns={} Rows={}",
            self.name,
            self.whence,
            self.left,
            self.right,
            self.top,
            self.bottom,
            self.columns,
            self.rows
        );
        if self.bands != 1 {
            line.push_str(&format!(" Bands={}", self.bands));
        }
        line
    }

    /// Number of stored values, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    fn checked_len(&self) -> Option<usize> {
        self.bands.checked_mul(self.columns)?.checked_mul(self.rows)
    }

    /// True if the grid stores no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes the grid occupies in the pile, saturating at `usize::MAX`.
    pub fn byte_len(&self) -> usize {
        self.checked_byte_len().unwrap_or(usize::MAX)
    }

    fn checked_byte_len(&self) -> Option<usize> {
        self.checked_len()?.checked_mul(VALUE_SIZE)
    }

    /// Byte offset just past the grid, or None if it overflows.
    pub fn end_offset(&self) -> Option<usize> {
        self.whence.checked_add(self.checked_byte_len()?)
    }

    /// Distance between adjacent nodes: (longitude step, latitude step).
    ///
    /// The latitude step is negative when rows run north to south.
    pub fn delta(&self) -> (f64, f64) {
        (
            (self.right - self.left) / (self.columns - 1) as f64,
            (self.bottom - self.top) / (self.rows - 1) as f64,
        )
    }

    /// Offsets between successive band, column and row entries.
    pub fn stride(&self) -> [usize; 3] {
        [1, self.bands, self.bands * self.columns]
    }
}

impl fmt::Display for GridDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_definition())
    }
}

/// Descriptors for both grids, in file order.
pub fn pile_descriptors() -> [GridDescriptor; 2] {
    [GridDescriptor::geoid(), GridDescriptor::datum()]
}

/// Write the descriptor sidecar: one definition per line, geoid first.
pub fn write_descriptor_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut text = String::new();
    for descriptor in pile_descriptors() {
        text.push_str(&descriptor.to_definition());
        text.push('\n');
    }
    std::fs::write(path, text)?;
    info!(path = %path.display(), "Wrote grid descriptors");
    Ok(())
}

/// Read every definition from a descriptor sidecar.
///
/// Blank lines and `#` comments are skipped.
pub fn read_descriptor_file(path: impl AsRef<Path>) -> Result<Vec<GridDescriptor>> {
    let text = std::fs::read_to_string(path)?;
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(GridDescriptor::parse)
        .collect()
}

/// A grid decoded from a pile, addressable by node or by coordinate.
#[derive(Debug, Clone)]
pub struct Grid {
    pub descriptor: GridDescriptor,
    pub data: Vec<f32>,
}

impl Grid {
    /// Decode the grid a descriptor points at from the raw pile bytes.
    pub fn from_pile_bytes(descriptor: GridDescriptor, bytes: &[u8]) -> Result<Self> {
        let end = descriptor.end_offset().ok_or_else(|| {
            PileError::invalid_descriptor(format!(
                "grid '{}' extends past the addressable range",
                descriptor.name
            ))
        })?;
        if bytes.len() < end {
            return Err(PileError::InvalidSize {
                expected: end,
                actual: bytes.len(),
            });
        }

        let mut buf = &bytes[descriptor.whence..end];
        let mut data = Vec::with_capacity(descriptor.len());
        while buf.has_remaining() {
            data.push(buf.get_f32_le());
        }
        debug!(grid = %descriptor.name, values = data.len(), "Decoded grid");

        Ok(Self { descriptor, data })
    }

    /// All bands at an integer node, or None outside the grid.
    pub fn value(&self, column: usize, row: usize) -> Option<&[f32]> {
        let d = &self.descriptor;
        if column >= d.columns || row >= d.rows {
            return None;
        }
        let [_, col_stride, row_stride] = d.stride();
        let start = row * row_stride + column * col_stride;
        self.data.get(start..start + d.bands)
    }

    /// Position of a coordinate in units of the node spacing,
    /// measured from the first node.
    pub fn fractional_index(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (dlon, dlat) = self.descriptor.delta();
        (
            (lon - self.descriptor.left) / dlon,
            (lat - self.descriptor.top) / dlat,
        )
    }

    /// Bilinear interpolation of every band at a coordinate.
    ///
    /// Returns None if the coordinate lies outside the grid extent.
    pub fn bilinear_value(&self, lon: f64, lat: f64) -> Option<Vec<f64>> {
        const EPS: f64 = 1e-9;

        let d = &self.descriptor;
        let (x, y) = self.fractional_index(lon, lat);
        let max_x = (d.columns - 1) as f64;
        let max_y = (d.rows - 1) as f64;
        if !(x >= -EPS && x <= max_x + EPS && y >= -EPS && y <= max_y + EPS) {
            return None;
        }

        // Cell whose upper left node is (x0, y0), clamped so the last
        // row and column still have a cell to the right and below.
        let x0 = (x.floor().max(0.0) as usize).min(d.columns - 2);
        let y0 = (y.floor().max(0.0) as usize).min(d.rows - 2);
        let xf = x - x0 as f64;
        let yf = y - y0 as f64;

        let ul = self.value(x0, y0)?;
        let ur = self.value(x0 + 1, y0)?;
        let ll = self.value(x0, y0 + 1)?;
        let lr = self.value(x0 + 1, y0 + 1)?;

        let result = (0..d.bands)
            .map(|band| {
                let top = ul[band] as f64 * (1.0 - xf) + ur[band] as f64 * xf;
                let bottom = ll[band] as f64 * (1.0 - xf) + lr[band] as f64 * xf;
                top * (1.0 - yf) + bottom * yf
            })
            .collect();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pile::Pile;

    fn pile_grid(descriptor: GridDescriptor) -> Grid {
        let bytes = Pile::generate().to_bytes();
        Grid::from_pile_bytes(descriptor, &bytes).expect("decode grid")
    }

    #[test]
    fn test_canonical_definitions() {
        assert_eq!(
            GridDescriptor::geoid().to_definition(),
            "geoid Whence=0 Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11"
        );
        assert_eq!(
            GridDescriptor::datum().to_string(),
            "datum Whence=924 Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11 Bands=2"
        );
    }

    #[test]
    fn test_parse_canonical() {
        for descriptor in pile_descriptors() {
            let parsed = GridDescriptor::parse(&descriptor.to_definition()).expect("parse");
            assert_eq!(parsed, descriptor);
        }
    }

    #[test]
    fn test_parse_defaults_and_derived() {
        let d = GridDescriptor::parse("test_geoid Left=8 Right=16 Top=58 Bottom=54 Columns=9 Rows=5")
            .expect("parse");
        assert_eq!(d.whence, 0);
        assert_eq!(d.bands, 1);
        assert_eq!(d.delta(), (1.0, -1.0));
        assert_eq!(d.stride(), [1, 1, 9]);
        assert_eq!(d.len(), 45);
        assert_eq!(d.byte_len(), 180);

        let d = GridDescriptor::datum();
        assert_eq!(d.stride(), [1, 2, 42]);
        assert_eq!(d.byte_len(), 3696);
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            "",
            "Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11",
            "g Left=0 Right=20 Top=60 Bottom=50 Rows=11",
            "g Left=0 Right=20 Top=60 Columns=21 Rows=11",
            "g Left=x Right=20 Top=60 Bottom=50 Columns=21 Rows=11",
            "g Left=0 Right=20 Top=60 Bottom=50 Columns=1 Rows=11",
            "g Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11 Bands=0",
            "g Left=0 Right=20 Top=60 Bottom=50 Columns=21.5 Rows=11",
            "g Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11 Colour=red",
            "g Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11 stray",
            "g Left=inf Right=20 Top=60 Bottom=50 Columns=21 Rows=11",
            "g Left=0 Right=20 Top=60 Bottom=50 Columns=1e19 Rows=1e19",
            "g Whence=1e300 Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11",
            "g Left=0 Right=20 Top=60 Bottom=50 Columns=21 Rows=11 Bands=1e20",
            "g Left=5 Right=5 Top=60 Bottom=50 Columns=21 Rows=11",
            "g Left=0 Right=20 Top=55 Bottom=55 Columns=21 Rows=11",
        ];
        for case in cases {
            assert!(
                matches!(GridDescriptor::parse(case), Err(PileError::InvalidDescriptor(_))),
                "expected error for '{}'",
                case
            );
        }
    }

    #[test]
    fn test_node_values() {
        let geoid = pile_grid(GridDescriptor::geoid());
        assert_eq!(geoid.value(0, 0), Some(&[60.0f32][..]));
        assert_eq!(geoid.value(20, 10), Some(&[50.2_f64 as f32][..]));
        assert_eq!(geoid.value(21, 0), None);

        let datum = pile_grid(GridDescriptor::datum());
        assert_eq!(datum.value(0, 0), Some(&[0.0f32, 60.0][..]));
        assert_eq!(datum.value(20, 10), Some(&[20.0f32, 50.0][..]));
        assert_eq!(datum.value(0, 11), None);
    }

    #[test]
    fn test_fractional_index() {
        let geoid = pile_grid(GridDescriptor::geoid());
        assert_eq!(geoid.fractional_index(2.0, 59.0), (2.0, 1.0));
        assert_eq!(geoid.fractional_index(9.5, 57.5), (9.5, 2.5));
    }

    #[test]
    fn test_bilinear_geoid() {
        let geoid = pile_grid(GridDescriptor::geoid());
        let v = geoid.bilinear_value(9.5, 57.5).expect("inside");
        assert!((v[0] - 57.595).abs() < 1e-5, "got {}", v[0]);

        // Nodes interpolate to themselves, including the far corner
        let v = geoid.bilinear_value(20.0, 50.0).expect("inside");
        assert!((v[0] - 50.2).abs() < 1e-5);
    }

    #[test]
    fn test_bilinear_datum() {
        let datum = pile_grid(GridDescriptor::datum());
        let v = datum.bilinear_value(9.4, 57.6).expect("inside");
        assert!((v[0] - 9.4).abs() < 1e-5, "lon {}", v[0]);
        assert!((v[1] - 57.6).abs() < 1e-5, "lat {}", v[1]);
    }

    #[test]
    fn test_bilinear_outside() {
        let geoid = pile_grid(GridDescriptor::geoid());
        assert!(geoid.bilinear_value(-0.5, 55.0).is_none());
        assert!(geoid.bilinear_value(20.5, 55.0).is_none());
        assert!(geoid.bilinear_value(10.0, 60.5).is_none());
        assert!(geoid.bilinear_value(10.0, 49.0).is_none());
        assert!(geoid.bilinear_value(f64::NAN, 55.0).is_none());
    }

    #[test]
    fn test_from_pile_bytes_too_short() {
        let bytes = Pile::generate().to_bytes();
        let err = Grid::from_pile_bytes(GridDescriptor::datum(), &bytes[..4000]).unwrap_err();
        assert!(matches!(
            err,
            PileError::InvalidSize { expected: 4620, actual: 4000 }
        ));
    }

    #[test]
    fn test_from_pile_bytes_overflowing_offset() {
        let bytes = Pile::generate().to_bytes();
        let descriptor = GridDescriptor {
            whence: usize::MAX,
            ..GridDescriptor::geoid()
        };
        assert_eq!(descriptor.end_offset(), None);

        let err = Grid::from_pile_bytes(descriptor, &bytes).unwrap_err();
        assert!(matches!(err, PileError::InvalidDescriptor(_)));
    }

    #[test]
    fn test_oversized_lengths_saturate() {
        let descriptor = GridDescriptor {
            columns: usize::MAX / 2,
            rows: 4,
            ..GridDescriptor::geoid()
        };
        assert_eq!(descriptor.len(), usize::MAX);
        assert_eq!(descriptor.byte_len(), usize::MAX);
        assert_eq!(descriptor.end_offset(), None);
        assert_eq!(GridDescriptor::datum().end_offset(), Some(4620));
    }
}
