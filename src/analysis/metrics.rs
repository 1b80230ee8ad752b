//! Size, ratio and integrity figures for one compression run.

use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::compression::fibonacci::largest_fibonacci_used;
use crate::compression::{validate_dataset, Method};
use crate::error::Result;

/// Hex-encoded SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Comma-joined decimal form of a dataset, the text its digest is taken over.
pub fn canonical_text(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Converts a bit count to (fractional) bytes.
pub fn bits_to_bytes(bits: usize) -> f64 {
    bits as f64 / 8.0
}

/// `original / compressed`, or 0 when nothing was produced.
pub fn compression_ratio(original_bytes: f64, compressed_bytes: f64) -> f64 {
    if compressed_bytes > 0.0 {
        original_bytes / compressed_bytes
    } else {
        0.0
    }
}

/// Share of the original size saved, in percent.
pub fn savings_percentage(original_bytes: f64, compressed_bytes: f64) -> f64 {
    if original_bytes > 0.0 {
        (original_bytes - compressed_bytes) / original_bytes * 100.0
    } else {
        0.0
    }
}

/// Outcome of running one codec over one dataset.
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompressionResult {
    method: Method,
    original_bits: usize,
    compressed_bits: usize,
    elapsed: Duration,
    original_digest: String,
    compressed_digest: String,
    lossless: Option<bool>,
}

impl CompressionResult {
    /// Records a run. `compressed_wire` is the payload the digest is taken over.
    pub fn new(
        method: Method,
        original_bits: usize,
        compressed_bits: usize,
        elapsed: Duration,
        original_digest: String,
        compressed_wire: &[u8],
        lossless: Option<bool>,
    ) -> Self {
        CompressionResult {
            method,
            original_bits,
            compressed_bits,
            elapsed,
            original_digest,
            compressed_digest: sha256_hex(compressed_wire),
            lossless,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn original_bits(&self) -> usize {
        self.original_bits
    }

    pub fn compressed_bits(&self) -> usize {
        self.compressed_bits
    }

    pub fn original_bytes(&self) -> f64 {
        bits_to_bytes(self.original_bits)
    }

    pub fn compressed_bytes(&self) -> f64 {
        bits_to_bytes(self.compressed_bits)
    }

    pub fn bytes_saved(&self) -> f64 {
        self.original_bytes() - self.compressed_bytes()
    }

    pub fn ratio(&self) -> f64 {
        compression_ratio(self.original_bytes(), self.compressed_bytes())
    }

    pub fn savings_percentage(&self) -> f64 {
        savings_percentage(self.original_bytes(), self.compressed_bytes())
    }

    /// Wall-clock time spent compressing.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// SHA-256 (hex) of the canonical text of the input.
    pub fn original_digest(&self) -> &str {
        &self.original_digest
    }

    /// SHA-256 (hex) of the compressed '0'/'1' payload.
    pub fn compressed_digest(&self) -> &str {
        &self.compressed_digest
    }

    /// Whether decoding reproduced the input; `None` if not checked.
    pub fn lossless(&self) -> Option<bool> {
        self.lossless
    }
}

/// Summary statistics of a dataset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DatasetStats {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    /// Arithmetic mean, rounded to two decimals.
    pub mean: f64,
    /// Largest term of 1, 2, 3, 5, ... not exceeding `max`.
    pub largest_fibonacci: u64,
}

impl DatasetStats {
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) for an
    /// empty dataset or one holding a zero.
    pub fn from_numbers(numbers: &[u64]) -> Result<Self> {
        validate_dataset(numbers)?;
        let min = numbers.iter().copied().min().unwrap_or(1);
        let max = numbers.iter().copied().max().unwrap_or(1);
        let sum: u128 = numbers.iter().map(|&n| u128::from(n)).sum();
        let mean = sum as f64 / numbers.len() as f64;
        Ok(DatasetStats {
            count: numbers.len(),
            min,
            max,
            mean: (mean * 100.0).round() / 100.0,
            largest_fibonacci: largest_fibonacci_used(max).unwrap_or(1),
        })
    }
}
