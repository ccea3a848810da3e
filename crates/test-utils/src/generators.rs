//! Expected grid values, computed independently of the `pile` crate.
//!
//! Tests compare the generator's output against these so a bug in the
//! generator's formulas cannot hide behind the same bug in the check.

/// Rows in each pile grid.
pub const PILE_ROWS: usize = 11;

/// Columns in each pile grid.
pub const PILE_COLUMNS: usize = 21;

/// Expected geoid value at `(row, column)`.
pub fn expected_geoid(row: usize, column: usize) -> f32 {
    (60.0 - row as f64 + column as f64 / 100.0) as f32
}

/// Expected datum pair `(lon, lat)` at `(row, column)`.
pub fn expected_datum(row: usize, column: usize) -> (f32, f32) {
    (column as f32, (60 - row as i32) as f32)
}

/// All expected values in file order: geoid grid, then datum grid.
///
/// # Example
///
/// ```
/// use test_utils::expected_pile_values;
///
/// let values = expected_pile_values();
/// assert_eq!(values.len(), 231 + 462);
/// assert_eq!(values[0], 60.0);
/// assert_eq!(values[231], 0.0);  // datum[0][0] lon
/// assert_eq!(values[232], 60.0); // datum[0][0] lat
/// ```
pub fn expected_pile_values() -> Vec<f32> {
    let mut values = Vec::with_capacity(PILE_ROWS * PILE_COLUMNS * 3);
    for row in 0..PILE_ROWS {
        for column in 0..PILE_COLUMNS {
            values.push(expected_geoid(row, column));
        }
    }
    for row in 0..PILE_ROWS {
        for column in 0..PILE_COLUMNS {
            let (lon, lat) = expected_datum(row, column);
            values.push(lon);
            values.push(lat);
        }
    }
    values
}

/// Decode a buffer of little-endian `f32` values.
///
/// Trailing bytes that do not make up a whole value are ignored.
pub fn decode_f32_le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Read one little-endian `f32` at a byte offset.
pub fn f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
