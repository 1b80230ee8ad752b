//! Error types shared by every codec and by the comparative analysis.

use thiserror::Error;

/// Errors raised by the codecs.
///
/// Every codec validates eagerly and returns one of these instead of a
/// partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A dataset element (or a parameter) is outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A codeword or bit string is malformed.
    #[error("invalid code: {0}")]
    InvalidCode(String),

    /// The stream ended without the terminator of the codeword starting at `position`.
    #[error("corrupt stream: no terminator found for the codeword starting at bit {position}")]
    StreamCorrupt { position: usize },

    /// The number of decoded elements differs from the expected count.
    #[error("expected {expected} elements but decoded {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// Huffman decoding ran out of bits, or hit an unmatched prefix, before
    /// producing the expected number of symbols.
    #[error("ambiguous stream: decoded {decoded} of {expected} symbols before the bits stopped matching")]
    AmbiguousStream { decoded: usize, expected: usize },

    /// LZW decoding met a code that is neither known nor the next code to be assigned.
    #[error("unknown LZW code {code} (next code to be assigned is {next_code})")]
    UnknownCode { code: u32, next_code: u32 },

    /// Decompressed LZW text could not be parsed back into integers.
    #[error("parse error: {0}")]
    ParseError(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
