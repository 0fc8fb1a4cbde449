pub mod reader;
pub mod writer;

pub use reader::{FitsReader, PrimaryImage};
pub use writer::FitsWriter;
