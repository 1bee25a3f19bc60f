//! Recursive Length Prefix (RLP) codec
//!
//! Encodes nested byte-string/list structures and decodes them back,
//! rejecting truncated, over-long and non-canonical input.
//! Reference: https://ethereum.org/en/developers/docs/data-structures-and-encoding/rlp/

pub mod types;
pub mod encoder;
pub mod decoder;

#[cfg(test)]
mod tests;

pub use types::*;
pub use encoder::*;
pub use decoder::*;
