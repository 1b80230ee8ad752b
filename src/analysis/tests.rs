use std::time::Duration;

use rand::Rng;

use super::*;
use crate::compression::lzw::LzwSizing;
use crate::compression::{fibonacci, huffman, lzw};
use crate::error::Error;

/// A codec that always fails to compress.
struct Broken;

impl IntegerCodec for Broken {
    type Output = String;

    fn method(&self) -> Method {
        Method::Lzw
    }

    fn compress(&self, _numbers: &[u64]) -> Result<String> {
        Err(Error::InvalidInput("broken codec".to_string()))
    }

    fn decompress(&self, _output: &String, _expected_count: usize) -> Result<Vec<u64>> {
        Err(Error::InvalidInput("broken codec".to_string()))
    }

    fn compressed_bits(&self, output: &String) -> usize {
        output.len()
    }

    fn wire_text(&self, output: &String) -> String {
        output.clone()
    }
}

/// Compresses to one bit per element but decodes every element as 1.
struct Lossy;

impl IntegerCodec for Lossy {
    type Output = String;

    fn method(&self) -> Method {
        Method::Huffman
    }

    fn compress(&self, numbers: &[u64]) -> Result<String> {
        Ok("0".repeat(numbers.len()))
    }

    fn decompress(&self, output: &String, _expected_count: usize) -> Result<Vec<u64>> {
        Ok(vec![1; output.len()])
    }

    fn compressed_bits(&self, output: &String) -> usize {
        output.len()
    }

    fn wire_text(&self, output: &String) -> String {
        output.clone()
    }
}

fn available(method: Method, compressed_bits: usize) -> CodecReport {
    CodecReport::Available(CompressionResult::new(
        method,
        320,
        compressed_bits,
        Duration::ZERO,
        String::new(),
        b"",
        None,
    ))
}

fn bits_of(comparison: &Comparison, method: Method) -> usize {
    comparison
        .report(method)
        .and_then(CodecReport::result)
        .map(CompressionResult::compressed_bits)
        .unwrap()
}

#[test]
fn test_literal_scenarios() {
    assert_eq!(fibonacci::encode(1).unwrap(), "11");
    assert_eq!(fibonacci::encode(4).unwrap(), "1011");
    assert_eq!(fibonacci::compress(&[1, 2, 3]).unwrap(), "110110011");
    assert_eq!(fibonacci::decompress("110110011", 3).unwrap(), vec![1, 2, 3]);
    assert_eq!(lzw::decompress(&lzw::compress(b"ABABABA").unwrap()).unwrap(), b"ABABABA");

    let book = huffman::compress(&[1, 2, 2, 3, 3, 3, 4, 4, 4, 4])
        .unwrap()
        .codebook;
    assert!(book.values().all(|code| code.len() >= book[&4].len()));
    assert!(book[&1].len() >= book[&4].len());
}

#[test]
fn test_compare_reports_every_codec() {
    let data = [1, 2, 2, 3, 3, 3, 4, 4, 4, 4];
    let comparison = compare(&data, &AnalysisConfig::default()).unwrap();

    assert_eq!(comparison.original_bits, 320);
    assert_eq!(
        comparison.original_digest,
        sha256_hex(b"1,2,2,3,3,3,4,4,4,4")
    );
    let methods: Vec<Method> = comparison.reports.iter().map(CodecReport::method).collect();
    assert_eq!(methods, Method::ALL.to_vec());

    assert_eq!(bits_of(&comparison, Method::Fibonacci), 36);
    assert_eq!(bits_of(&comparison, Method::Huffman), 19);
    assert_eq!(bits_of(&comparison, Method::Lzw), 107);
    assert_eq!(comparison.best_method, Some(Method::Huffman));

    for report in &comparison.reports {
        let result = report.result().unwrap();
        assert_eq!(result.lossless(), Some(true));
        assert_eq!(result.original_digest(), comparison.original_digest);
    }

    let fib = comparison.report(Method::Fibonacci).unwrap().result().unwrap();
    assert_eq!(fib.compressed_digest(), sha256_hex(fibonacci::compress(&data).unwrap().as_bytes()));
    let vs_huffman = comparison.fibonacci_vs_huffman.unwrap();
    assert!((vs_huffman - (36.0 - 19.0) / 19.0 * 100.0).abs() < 1e-9);
    assert!(comparison.fibonacci_vs_lzw.unwrap() < 0.0);
}

#[test]
fn test_compare_varied_dataset() {
    let data = [1, 2, 3, 4, 5, 10, 20, 50, 100];
    let comparison = compare(&data, &AnalysisConfig::default()).unwrap();
    assert_eq!(bits_of(&comparison, Method::Fibonacci), 51);
    assert_eq!(bits_of(&comparison, Method::Huffman), 29);
    assert_eq!(bits_of(&comparison, Method::Lzw), 161);
    assert_eq!(comparison.stats.largest_fibonacci, 89);
}

#[test]
fn test_single_symbol_dataset() {
    let data = [7; 10];
    let comparison = compare(&data, &AnalysisConfig::default()).unwrap();
    assert_eq!(bits_of(&comparison, Method::Huffman), 10);
    assert_eq!(bits_of(&comparison, Method::Fibonacci), 50);
    assert_eq!(comparison.best_method, Some(Method::Huffman));
    let huffman = comparison.report(Method::Huffman).unwrap().result().unwrap();
    assert_eq!(huffman.lossless(), Some(true));
}

#[test]
fn test_fixed_width_lzw_sizing() {
    let config = AnalysisConfig::builder()
        .lzw_sizing(LzwSizing::FixedWidth(12))
        .verify_round_trip(false)
        .build()
        .unwrap();
    let comparison = compare(&[1, 2, 2, 3, 3, 3, 4, 4, 4, 4], &config).unwrap();
    assert_eq!(bits_of(&comparison, Method::Lzw), 12 * 12);
    let lzw = comparison.report(Method::Lzw).unwrap().result().unwrap();
    assert_eq!(lzw.lossless(), None);
}

#[test]
fn test_baseline_changes_ratio() {
    let config = AnalysisConfig::builder()
        .baseline_bits_per_integer(8)
        .build()
        .unwrap();
    let comparison = compare(&[1, 2, 3], &config).unwrap();
    assert_eq!(comparison.original_bits, 24);
    let fib = comparison.report(Method::Fibonacci).unwrap().result().unwrap();
    assert!((fib.ratio() - 24.0 / 9.0).abs() < 1e-9);
}

#[test]
fn test_tie_break_priority() {
    let reports = vec![
        available(Method::Fibonacci, 40),
        available(Method::Huffman, 40),
        available(Method::Lzw, 40),
    ];
    assert_eq!(select_best(&reports), Some(Method::Fibonacci));

    let reports = vec![
        available(Method::Lzw, 30),
        available(Method::Huffman, 30),
        available(Method::Fibonacci, 31),
    ];
    assert_eq!(select_best(&reports), Some(Method::Huffman));
}

#[test]
fn test_failing_codec_is_excluded() {
    let data = [1, 2, 3];
    let config = AnalysisConfig::default();
    let digest = sha256_hex(canonical_text(&data).as_bytes());

    let broken = run_codec(&Broken, &data, &config, &digest);
    assert!(matches!(
        &broken,
        CodecReport::Unavailable { method: Method::Lzw, reason } if reason.contains("broken")
    ));
    assert_eq!(broken.compressed_bytes(), 0.0);

    let fib = run_codec(&Fibonacci, &data, &config, &digest);
    let reports = vec![fib.clone(), available(Method::Huffman, 100), broken.clone()];
    assert_eq!(select_best(&reports), Some(Method::Fibonacci));
    assert_eq!(relative_size(&fib, &broken), None);

    let none = vec![broken.clone()];
    assert_eq!(select_best(&none), None);
}

#[test]
fn test_codec_that_loses_data_is_excluded() {
    let data = [4, 5, 6];
    let config = AnalysisConfig::default();
    let digest = sha256_hex(canonical_text(&data).as_bytes());

    let lossy = run_codec(&Lossy, &data, &config, &digest);
    assert!(matches!(
        &lossy,
        CodecReport::Unavailable { method: Method::Huffman, reason } if reason.contains("round trip")
    ));

    let fib = run_codec(&Fibonacci, &data, &config, &digest);
    assert_eq!(select_best(&[fib, lossy]), Some(Method::Fibonacci));

    let unchecked = AnalysisConfig::builder()
        .verify_round_trip(false)
        .build()
        .unwrap();
    let trusted = run_codec(&Lossy, &data, &unchecked, &digest);
    assert_eq!(trusted.result().unwrap().lossless(), None);
    assert_eq!(trusted.result().unwrap().compressed_bits(), 3);
}

#[test]
fn test_compare_rejects_invalid_dataset() {
    let config = AnalysisConfig::default();
    assert!(matches!(compare(&[], &config), Err(Error::InvalidInput(_))));
    assert!(matches!(compare(&[3, 0], &config), Err(Error::InvalidInput(_))));
}

#[test]
fn test_compare_batch() {
    let datasets = vec![vec![1, 2, 3], vec![], vec![5; 20]];
    let results = compare_batch(&datasets, &AnalysisConfig::default());
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().stats.count, 20);
}

#[test]
fn test_random_datasets_are_lossless_everywhere() {
    let mut rng = rand::thread_rng();
    let config = AnalysisConfig::default();
    for _ in 0..25 {
        let len = rng.gen_range(1..150);
        let max = rng.gen_range(1..5000);
        let data: Vec<u64> = (0..len).map(|_| rng.gen_range(1..=max)).collect();
        let comparison = compare(&data, &config).unwrap();
        assert!(comparison.best_method.is_some());
        for report in &comparison.reports {
            assert_eq!(report.result().unwrap().lossless(), Some(true));
        }
    }
}
