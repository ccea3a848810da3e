//! Encoding and decoding of the combined grid blob.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{PileError, Result};
use crate::grid::{DatumGrid, GeoidGrid, COLUMNS, DATUM_BANDS, ROWS};
use crate::layout::PILE_SIZE;

/// Both grids, in the order they are stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pile {
    pub geoid: GeoidGrid,
    pub datum: DatumGrid,
}

impl Pile {
    /// Compute both grids from their formulas.
    pub fn generate() -> Self {
        Self {
            geoid: GeoidGrid::generate(),
            datum: DatumGrid::generate(),
        }
    }

    /// Serialize to bytes: geoid first, then datum, little-endian `f32`.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(PILE_SIZE);
        for value in self.geoid.iter() {
            buf.put_f32_le(value);
        }
        for value in self.datum.iter() {
            buf.put_f32_le(value);
        }
        debug_assert_eq!(buf.len(), PILE_SIZE);
        buf.freeze()
    }

    /// Deserialize from exactly [`PILE_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PILE_SIZE {
            return Err(PileError::InvalidSize {
                expected: PILE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut buf = bytes;

        let mut geoid = [[0.0f32; COLUMNS]; ROWS];
        for line in geoid.iter_mut() {
            for value in line.iter_mut() {
                *value = buf.get_f32_le();
            }
        }

        let mut datum = [[[0.0f32; DATUM_BANDS]; COLUMNS]; ROWS];
        for line in datum.iter_mut() {
            for pair in line.iter_mut() {
                for value in pair.iter_mut() {
                    *value = buf.get_f32_le();
                }
            }
        }

        Ok(Self {
            geoid: GeoidGrid { values: geoid },
            datum: DatumGrid { values: datum },
        })
    }

    /// Write the encoded pile to a writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read a pile from a reader, which must yield exactly [`PILE_SIZE`] bytes.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::with_capacity(PILE_SIZE);
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}
