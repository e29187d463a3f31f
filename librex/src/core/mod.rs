pub mod bits;
pub mod types;

pub use bits::{BitReader, BitWriter};
pub use types::*;
