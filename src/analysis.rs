//! Comparative analysis of the three codecs.
//!
//! [`compare`] runs Fibonacci, Huffman and LZW over one dataset, measures
//! every output against the same fixed-width baseline, and picks the method
//! with the smallest output. A codec that fails, or whose output does not
//! decode back to the input, is reported as unavailable and left out of the
//! ranking; the others still run.
//!
//! # Examples
//!
//! ```rust
//! use intcodecs::analysis::{compare, AnalysisConfig};
//! use intcodecs::compression::Method;
//!
//! let comparison = compare(&[1, 2, 2, 3, 3, 3, 4, 4, 4, 4], &AnalysisConfig::default()).unwrap();
//! assert_eq!(comparison.best_method, Some(Method::Huffman));
//! ```

use std::time::Instant;

use crate::compression::{validate_dataset, Fibonacci, Huffman, IntegerCodec, Method};
use crate::error::Result;

pub mod config;
pub mod metrics;

pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use metrics::{canonical_text, sha256_hex, CompressionResult, DatasetStats};

/// What happened when one codec ran.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CodecReport {
    Available(CompressionResult),
    Unavailable { method: Method, reason: String },
}

impl CodecReport {
    pub fn method(&self) -> Method {
        match self {
            CodecReport::Available(result) => result.method(),
            CodecReport::Unavailable { method, .. } => *method,
        }
    }

    pub fn result(&self) -> Option<&CompressionResult> {
        match self {
            CodecReport::Available(result) => Some(result),
            CodecReport::Unavailable { .. } => None,
        }
    }

    /// Compressed size in bytes; 0 when unavailable.
    pub fn compressed_bytes(&self) -> f64 {
        self.result().map_or(0.0, CompressionResult::compressed_bytes)
    }
}

/// Aggregated metrics for one dataset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Comparison {
    pub stats: DatasetStats,
    pub original_bits: usize,
    /// SHA-256 (hex) of the canonical text of the dataset.
    pub original_digest: String,
    /// One report per codec, in [`Method::ALL`] order.
    pub reports: Vec<CodecReport>,
    /// Smallest output; `None` only when every codec failed.
    pub best_method: Option<Method>,
    /// Fibonacci size relative to Huffman, in percent (negative is smaller).
    pub fibonacci_vs_huffman: Option<f64>,
    /// Fibonacci size relative to LZW, in percent (negative is smaller).
    pub fibonacci_vs_lzw: Option<f64>,
}

impl Comparison {
    /// The report of `method`.
    pub fn report(&self, method: Method) -> Option<&CodecReport> {
        self.reports.iter().find(|report| report.method() == method)
    }
}

/// Runs one codec and records its figures, or why it could not run.
pub fn run_codec<C: IntegerCodec>(
    codec: &C,
    numbers: &[u64],
    config: &AnalysisConfig,
    original_digest: &str,
) -> CodecReport {
    let method = codec.method();
    let start = Instant::now();
    let output = match codec.compress(numbers) {
        Ok(output) => output,
        Err(err) => {
            log::warn!("{} excluded from comparison: {}", method, err);
            return CodecReport::Unavailable {
                method,
                reason: err.to_string(),
            };
        }
    };
    let elapsed = start.elapsed();

    let compressed_bits = codec.compressed_bits(&output);
    if compressed_bits == 0 {
        log::warn!("{} excluded from comparison: empty output", method);
        return CodecReport::Unavailable {
            method,
            reason: "empty output".to_string(),
        };
    }

    let lossless = if config.verify_round_trip() {
        let failure = match codec.decompress(&output, numbers.len()) {
            Ok(decoded) if decoded == numbers => None,
            Ok(_) => Some("round trip changed the data".to_string()),
            Err(err) => Some(format!("round trip failed: {}", err)),
        };
        if let Some(reason) = failure {
            log::warn!("{} excluded from comparison: {}", method, reason);
            return CodecReport::Unavailable { method, reason };
        }
        Some(true)
    } else {
        None
    };

    let original_bits = numbers.len() * config.baseline_bits_per_integer() as usize;
    CodecReport::Available(CompressionResult::new(
        method,
        original_bits,
        compressed_bits,
        elapsed,
        original_digest.to_string(),
        codec.wire_text(&output).as_bytes(),
        lossless,
    ))
}

/// Picks the available report with the fewest compressed bits.
///
/// Ties go to the method listed first in [`Method::ALL`].
pub fn select_best(reports: &[CodecReport]) -> Option<Method> {
    let mut best: Option<&CompressionResult> = None;
    for method in Method::ALL {
        let candidate = reports
            .iter()
            .filter(|report| report.method() == method)
            .find_map(CodecReport::result);
        if let Some(candidate) = candidate {
            if best.map_or(true, |b| candidate.compressed_bits() < b.compressed_bits()) {
                best = Some(candidate);
            }
        }
    }
    best.map(CompressionResult::method)
}

/// `(size - other) / other` in percent; `None` if either side is missing.
pub fn relative_size(size: &CodecReport, other: &CodecReport) -> Option<f64> {
    let (size, other) = (size.result()?, other.result()?);
    let other_bytes = other.compressed_bytes();
    if other_bytes == 0.0 {
        return None;
    }
    Some((size.compressed_bytes() - other_bytes) / other_bytes * 100.0)
}

/// Runs every codec over `numbers` and aggregates the results.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if the
/// dataset is empty or holds a zero. Failures inside a single codec do not
/// fail the comparison.
pub fn compare(numbers: &[u64], config: &AnalysisConfig) -> Result<Comparison> {
    validate_dataset(numbers)?;
    let stats = DatasetStats::from_numbers(numbers)?;
    let original_digest = sha256_hex(canonical_text(numbers).as_bytes());

    let reports = vec![
        run_codec(&Fibonacci, numbers, config, &original_digest),
        run_codec(&Huffman, numbers, config, &original_digest),
        run_codec(&config.lzw(), numbers, config, &original_digest),
    ];
    let best_method = select_best(&reports);
    let fibonacci_vs_huffman = relative_size(&reports[0], &reports[1]);
    let fibonacci_vs_lzw = relative_size(&reports[0], &reports[2]);

    log::debug!(
        "compared {} integers, best method: {:?}",
        numbers.len(),
        best_method
    );
    Ok(Comparison {
        stats,
        original_bits: numbers.len() * config.baseline_bits_per_integer() as usize,
        original_digest,
        reports,
        best_method,
        fibonacci_vs_huffman,
        fibonacci_vs_lzw,
    })
}

/// Compares several independent datasets.
///
/// With the `parallel` feature the datasets are processed on the rayon
/// thread pool; codec state is local to each call.
pub fn compare_batch(datasets: &[Vec<u64>], config: &AnalysisConfig) -> Vec<Result<Comparison>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        datasets
            .par_iter()
            .map(|numbers| compare(numbers, config))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        datasets
            .iter()
            .map(|numbers| compare(numbers, config))
            .collect()
    }
}

#[cfg(test)]
mod tests;
