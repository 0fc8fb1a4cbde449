pub mod types;

pub use types::{BitPix, ByteOrder};
