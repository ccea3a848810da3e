//! The two synthetic grids stored in a pile.
//!
//! Both grids cover the same 11x21 lattice: row `i` sits at latitude
//! `60 - i` and column `j` at longitude `j`. Values are computed in `f64`
//! and stored as `f32`.

/// Number of latitude rows in each grid.
pub const ROWS: usize = 11;

/// Number of longitude columns in each grid.
pub const COLUMNS: usize = 21;

/// Number of components per datum node (longitude, latitude).
pub const DATUM_BANDS: usize = 2;

/// Latitude of row 0.
pub const TOP_LATITUDE: f64 = 60.0;

/// Geoid value at row `i`, column `j`: `60 - i + j/100`.
#[inline]
pub fn geoid_value(row: usize, column: usize) -> f32 {
    (TOP_LATITUDE - row as f64 + column as f64 / 100.0) as f32
}

/// Datum pair at row `i`, column `j`: `(j, 60 - i)`.
#[inline]
pub fn datum_value(row: usize, column: usize) -> [f32; DATUM_BANDS] {
    [column as f64 as f32, (TOP_LATITUDE - row as f64) as f32]
}

/// Elevation-like scalar field, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoidGrid {
    pub values: [[f32; COLUMNS]; ROWS],
}

impl GeoidGrid {
    /// Number of values in the grid.
    pub const LEN: usize = ROWS * COLUMNS;

    /// Compute the grid from its formula.
    pub fn generate() -> Self {
        let mut values = [[0.0f32; COLUMNS]; ROWS];
        for (row, line) in values.iter_mut().enumerate() {
            for (column, value) in line.iter_mut().enumerate() {
                *value = geoid_value(row, column);
            }
        }
        Self { values }
    }

    /// Get the value at a node, or None outside the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<f32> {
        self.values.get(row)?.get(column).copied()
    }

    /// Iterate over all values in file order (row outer, column inner).
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().flat_map(|line| line.iter().copied())
    }
}

impl Default for GeoidGrid {
    fn default() -> Self {
        Self::generate()
    }
}

/// Coordinate pair field, row-major with the component innermost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatumGrid {
    pub values: [[[f32; DATUM_BANDS]; COLUMNS]; ROWS],
}

impl DatumGrid {
    /// Number of values in the grid.
    pub const LEN: usize = ROWS * COLUMNS * DATUM_BANDS;

    /// Compute the grid from its formula.
    pub fn generate() -> Self {
        let mut values = [[[0.0f32; DATUM_BANDS]; COLUMNS]; ROWS];
        for (row, line) in values.iter_mut().enumerate() {
            for (column, pair) in line.iter_mut().enumerate() {
                *pair = datum_value(row, column);
            }
        }
        Self { values }
    }

    /// Get the (longitude, latitude) pair at a node, or None outside the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<(f32, f32)> {
        let [lon, lat] = *self.values.get(row)?.get(column)?;
        Some((lon, lat))
    }

    /// Iterate over all values in file order (row, column, component).
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values
            .iter()
            .flat_map(|line| line.iter().flat_map(|pair| pair.iter().copied()))
    }
}

impl Default for DatumGrid {
    fn default() -> Self {
        Self::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geoid_corners() {
        let geoid = GeoidGrid::generate();
        assert_eq!(geoid.get(0, 0), Some(60.0));
        assert_eq!(geoid.get(0, 1), Some(60.01_f64 as f32));
        assert_eq!(geoid.get(10, 20), Some(50.2_f64 as f32));
        assert_eq!(geoid.get(11, 0), None);
        assert_eq!(geoid.get(0, 21), None);
    }

    #[test]
    fn test_geoid_formula_everywhere() {
        let geoid = GeoidGrid::generate();
        for i in 0..ROWS {
            for j in 0..COLUMNS {
                let expected = 60.0 - i as f64 + j as f64 / 100.0;
                let actual = geoid.values[i][j] as f64;
                assert!(
                    (actual - expected).abs() < 1e-5,
                    "geoid[{}][{}]: expected {}, got {}",
                    i, j, expected, actual
                );
            }
        }
    }

    #[test]
    fn test_datum_corners() {
        let datum = DatumGrid::generate();
        assert_eq!(datum.get(0, 0), Some((0.0, 60.0)));
        assert_eq!(datum.get(10, 20), Some((20.0, 50.0)));
        assert_eq!(datum.get(3, 7), Some((7.0, 57.0)));
        assert_eq!(datum.get(ROWS, 0), None);
    }

    #[test]
    fn test_iteration_order() {
        let geoid = GeoidGrid::generate();
        let flat: Vec<f32> = geoid.iter().collect();
        assert_eq!(flat.len(), GeoidGrid::LEN);
        // Column varies fastest
        assert_eq!(flat[1], geoid.values[0][1]);
        assert_eq!(flat[COLUMNS], geoid.values[1][0]);

        let datum = DatumGrid::generate();
        let flat: Vec<f32> = datum.iter().collect();
        assert_eq!(flat.len(), DatumGrid::LEN);
        // Component varies fastest, then column
        assert_eq!(&flat[0..4], &[0.0, 60.0, 1.0, 60.0]);
        assert_eq!(&flat[2 * COLUMNS..2 * COLUMNS + 2], &[0.0, 59.0]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(GeoidGrid::generate(), GeoidGrid::generate());
        assert_eq!(DatumGrid::generate(), DatumGrid::default());
    }
}
