//! Codecs for sequences of positive integers.
//!
//! This module provides three independent, swappable codecs:
//! - Fibonacci (Zeckendorf) coding, a self-delimiting universal code
//! - Huffman coding, a frequency-driven prefix code
//! - LZW coding, an adaptive dictionary code over the text form of the integers
//!
//! # Examples
//!
//! ```rust
//! use intcodecs::compression::{Fibonacci, IntegerCodec};
//!
//! let numbers = [1, 2, 3];
//! let encoded = Fibonacci.compress(&numbers).unwrap();
//! assert_eq!(encoded, "110110011");
//! assert_eq!(Fibonacci.decompress(&encoded, numbers.len()).unwrap(), numbers);
//! ```

use std::fmt;

pub use crate::error::{Error, Result};

pub mod bits;
pub mod code_packing;
pub mod fibonacci;
pub mod huffman;
pub mod lzw;

pub use code_packing::{pack_codes, unpack_codes, CodeWidth};
pub use fibonacci::Fibonacci;
pub use huffman::{Codebook, Huffman, HuffmanEncoding, HuffmanNode, InverseCodebook};
pub use lzw::{Lzw, LzwEncoding, LzwSizing};

/// Identifies one of the codecs.
///
/// The declaration order is the tie-break priority used when two codecs
/// produce outputs of the same size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Method {
    Fibonacci,
    Huffman,
    Lzw,
}

impl Method {
    /// All methods, in tie-break priority order.
    pub const ALL: [Method; 3] = [Method::Fibonacci, Method::Huffman, Method::Lzw];
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Fibonacci => "Fibonacci",
            Method::Huffman => "Huffman",
            Method::Lzw => "LZW",
        };
        f.write_str(name)
    }
}

/// Trait for codecs over a dataset of positive integers.
pub trait IntegerCodec {
    /// The compressed representation, including any side data needed to decode it.
    type Output;

    /// Which codec this is.
    fn method(&self) -> Method;

    /// Compress the dataset.
    fn compress(&self, numbers: &[u64]) -> Result<Self::Output>;

    /// Decompress `output`, which must hold exactly `expected_count` elements.
    fn decompress(&self, output: &Self::Output, expected_count: usize) -> Result<Vec<u64>>;

    /// Size of the compressed payload in bits.
    fn compressed_bits(&self, output: &Self::Output) -> usize;

    /// The compressed payload rendered as a '0'/'1' string.
    fn wire_text(&self, output: &Self::Output) -> String;
}

/// Checks that `numbers` is non-empty and holds only positive integers.
pub fn validate_dataset(numbers: &[u64]) -> Result<()> {
    if numbers.is_empty() {
        return Err(Error::InvalidInput("dataset must not be empty".to_string()));
    }
    if let Some(index) = numbers.iter().position(|&n| n == 0) {
        return Err(Error::InvalidInput(format!(
            "only positive integers are supported, got 0 at index {}",
            index
        )));
    }
    Ok(())
}
