//! Checks that a decoded pile matches the generating formulas.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{PileError, Result};
use crate::grid::{datum_value, geoid_value, GeoidGrid, COLUMNS, DATUM_BANDS};
use crate::layout::PILE_SIZE;
use crate::pile::Pile;

/// Allowed difference between a stored value and its formula.
pub const VALUE_TOLERANCE: f32 = 1e-4;

/// Check every value of a pile against its formula.
///
/// Returns the first mismatch found, scanning in file order.
pub fn verify_pile(pile: &Pile) -> Result<()> {
    for (row, line) in pile.geoid.values.iter().enumerate() {
        for (column, &actual) in line.iter().enumerate() {
            check("geoid", row, column, 0, geoid_value(row, column), actual)?;
        }
    }

    for (row, line) in pile.datum.values.iter().enumerate() {
        for (column, pair) in line.iter().enumerate() {
            let expected = datum_value(row, column);
            for (band, &actual) in pair.iter().enumerate() {
                check("datum", row, column, band, expected[band], actual)?;
            }
        }
    }

    Ok(())
}

fn check(
    grid: &'static str,
    row: usize,
    column: usize,
    band: usize,
    expected: f32,
    actual: f32,
) -> Result<()> {
    // NaN fails the comparison as well
    if (actual - expected).abs() <= VALUE_TOLERANCE {
        Ok(())
    } else {
        Err(PileError::ValueMismatch {
            grid,
            row,
            column,
            band,
            expected,
            actual,
        })
    }
}

/// Load a pile file and check it against a freshly generated pile.
///
/// The file must have the exact pile size, every value must match its
/// formula, and the bytes must be identical to a new encoding.
pub fn verify_pile_file(path: impl AsRef<Path>) -> Result<Pile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), size = bytes.len(), "Verifying pile file");

    let pile = Pile::from_bytes(&bytes)?;
    verify_pile(&pile)?;

    let expected = Pile::generate().to_bytes();
    if let Some(offset) = bytes.iter().zip(expected.iter()).position(|(a, b)| a != b) {
        // Within tolerance but not bit-identical: report the value that differs
        let index = offset / 4;
        let (grid, row, column, band, expected_value) = locate(index);
        let start = index * 4;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[start..start + 4]);
        return Err(PileError::ValueMismatch {
            grid,
            row,
            column,
            band,
            expected: expected_value,
            actual: f32::from_le_bytes(raw),
        });
    }

    info!(path = %path.display(), size = PILE_SIZE, "Pile file verified");
    Ok(pile)
}

/// Map a flat value index back to its grid position and expected value.
fn locate(index: usize) -> (&'static str, usize, usize, usize, f32) {
    if index < GeoidGrid::LEN {
        let (row, column) = (index / COLUMNS, index % COLUMNS);
        ("geoid", row, column, 0, geoid_value(row, column))
    } else {
        let index = index - GeoidGrid::LEN;
        let band = index % DATUM_BANDS;
        let node = index / DATUM_BANDS;
        let (row, column) = (node / COLUMNS, node % COLUMNS);
        ("datum", row, column, band, datum_value(row, column)[band])
    }
}
