pub mod data;
pub mod errors;
pub mod header;
pub mod io;

pub use errors::{FitsError, Result};

/// Size of a FITS logical record in bytes.
pub const BLOCK_SIZE: usize = 2880;

/// Size of a header card in bytes.
pub const CARD_SIZE: usize = 80;

/// Bytes needed to pad `len` up to a whole number of blocks.
pub(crate) fn padding_for(len: usize) -> usize {
    (BLOCK_SIZE - len % BLOCK_SIZE) % BLOCK_SIZE
}
