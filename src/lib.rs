//! Lossless codecs for sequences of positive integers.
//!
//! - [`compression::fibonacci`]: Zeckendorf-based universal code with
//!   self-delimiting `11` terminators
//! - [`compression::huffman`]: frequency-driven prefix code; the codebook
//!   travels beside the stream
//! - [`compression::lzw`]: adaptive dictionary code over the decimal text of
//!   the dataset, with optional variable-width packing
//! - [`analysis`]: runs all three on one dataset and ranks them
//!
//! All operations are synchronous and keep their state local to the call,
//! so independent datasets can be processed from several threads at once.

pub mod analysis;
pub mod compression;
pub mod error;

pub use analysis::{compare, AnalysisConfig, Comparison};
pub use compression::{IntegerCodec, Method};
pub use error::{Error, Result};
