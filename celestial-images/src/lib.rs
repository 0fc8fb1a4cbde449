//! Minimal FITS container support: header cards and a single primary image
//! HDU, written big-endian and read back into `f64` samples from any
//! standard `BITPIX`.

pub mod core;
pub mod fits;

pub use crate::core::{BitPix, ByteOrder};
pub use fits::header::{Header, Keyword, KeywordValue};
pub use fits::io::{FitsReader, FitsWriter, PrimaryImage};
pub use fits::{FitsError, Result};
