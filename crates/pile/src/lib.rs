//! Synthetic geoid and datum grids for the `pile.bin` test fixture.
//!
//! The pile is a headerless blob of little-endian `f32` values holding two
//! grids over the same 11x21 lattice (latitude 60..50, longitude 0..20):
//!
//! - **geoid**: `60 - i + j/100` at row `i`, column `j`
//! - **datum**: the pair `(j, 60 - i)`, i.e. the node's own (lon, lat)
//!
//! ```text
//! offset 0     geoid  11 x 21      f32   (924 bytes)
//! offset 924   datum  11 x 21 x 2  f32   (3696 bytes)
//!                                        4620 bytes total
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pile::{write_pile_file, verify_pile_file};
//!
//! let result = write_pile_file("pile.bin")?;
//! assert_eq!(result.bytes_written, 4620);
//! verify_pile_file("pile.bin")?;
//! # Ok::<(), pile::PileError>(())
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod grid;
pub mod layout;
pub mod pile;
pub mod verify;
pub mod writer;

// Re-export commonly used types at crate root
pub use config::GeneratorConfig;
pub use descriptor::{
    pile_descriptors, read_descriptor_file, write_descriptor_file, Grid, GridDescriptor,
};
pub use error::{PileError, Result};
pub use grid::{DatumGrid, GeoidGrid, COLUMNS, DATUM_BANDS, ROWS};
pub use layout::{DATUM_OFFSET, GEOID_OFFSET, PILE_FILE_NAME, PILE_SIZE};
pub use pile::Pile;
pub use verify::{verify_pile, verify_pile_file};
pub use writer::{write_pile_file, write_pile_to_file, PileWriteResult};

/// Load and decode a pile file without checking its values.
pub fn load_pile_file(path: impl AsRef<std::path::Path>) -> Result<Pile> {
    let bytes = std::fs::read(path)?;
    Pile::from_bytes(&bytes)
}
