//! Byte layout of `pile.bin`.
//!
//! | Offset | Content | Count | Type |
//! |--------|---------|-------|------|
//! | 0 | geoid grid | 231 | f32 LE |
//! | 924 | datum grid | 462 | f32 LE |
//!
//! There is no header; readers must know this layout up front.

use crate::grid::{DatumGrid, GeoidGrid};

/// Default output file name.
pub const PILE_FILE_NAME: &str = "pile.bin";

/// Size of one stored value.
pub const VALUE_SIZE: usize = std::mem::size_of::<f32>();

/// Byte offset of the geoid grid.
pub const GEOID_OFFSET: usize = 0;

/// Byte length of the geoid grid.
pub const GEOID_BYTES: usize = GeoidGrid::LEN * VALUE_SIZE;

/// Byte offset of the datum grid.
pub const DATUM_OFFSET: usize = GEOID_OFFSET + GEOID_BYTES;

/// Byte length of the datum grid.
pub const DATUM_BYTES: usize = DatumGrid::LEN * VALUE_SIZE;

/// Total size of a pile file.
pub const PILE_SIZE: usize = DATUM_OFFSET + DATUM_BYTES;
