//! Settings for a comparison run.

use crate::compression::lzw::{Lzw, LzwSizing, DEFAULT_DELIMITER};
use crate::error::{Error, Result};

/// Bits charged per integer on the uncompressed side.
pub const DEFAULT_BASELINE_BITS: u32 = 32;

/// Settings for [`compare`](crate::analysis::compare).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    baseline_bits_per_integer: u32,
    lzw: Lzw,
    verify_round_trip: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            baseline_bits_per_integer: DEFAULT_BASELINE_BITS,
            lzw: Lzw::default(),
            verify_round_trip: true,
        }
    }
}

impl AnalysisConfig {
    /// Starts a builder with the default settings.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Fixed width of one uncompressed integer.
    pub fn baseline_bits_per_integer(&self) -> u32 {
        self.baseline_bits_per_integer
    }

    /// The LZW codec, with its size accounting and delimiter.
    pub fn lzw(&self) -> Lzw {
        self.lzw
    }

    /// Whether every output is decoded again and checked against the input.
    pub fn verify_round_trip(&self) -> bool {
        self.verify_round_trip
    }
}

/// A builder for [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct AnalysisConfigBuilder {
    baseline_bits_per_integer: u32,
    lzw_sizing: LzwSizing,
    delimiter: u8,
    verify_round_trip: bool,
}

impl Default for AnalysisConfigBuilder {
    fn default() -> Self {
        Self {
            baseline_bits_per_integer: DEFAULT_BASELINE_BITS,
            lzw_sizing: LzwSizing::VariableWidth,
            delimiter: DEFAULT_DELIMITER,
            verify_round_trip: true,
        }
    }
}

impl AnalysisConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bits charged per uncompressed integer (1 to 64).
    pub fn baseline_bits_per_integer(mut self, bits: u32) -> Self {
        self.baseline_bits_per_integer = bits;
        self
    }

    /// Sets how LZW output is measured.
    pub fn lzw_sizing(mut self, sizing: LzwSizing) -> Self {
        self.lzw_sizing = sizing;
        self
    }

    /// Sets the delimiter of the LZW text adaptor.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables decoding every output after compression.
    pub fn verify_round_trip(mut self, verify: bool) -> Self {
        self.verify_round_trip = verify;
        self
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a baseline outside 1..=64, a zero
    /// fixed LZW width, or a digit delimiter.
    pub fn build(self) -> Result<AnalysisConfig> {
        if !(1..=64).contains(&self.baseline_bits_per_integer) {
            return Err(Error::InvalidInput(format!(
                "baseline bits per integer must be in 1..=64, got {}",
                self.baseline_bits_per_integer
            )));
        }
        Ok(AnalysisConfig {
            baseline_bits_per_integer: self.baseline_bits_per_integer,
            lzw: Lzw::new(self.lzw_sizing, self.delimiter)?,
            verify_round_trip: self.verify_round_trip,
        })
    }
}
