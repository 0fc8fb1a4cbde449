pub mod array;

pub use array::{decode_as_f64, DataArray};
