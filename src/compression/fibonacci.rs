//! Fibonacci coding based on Zeckendorf's theorem.
//!
//! Every positive integer has a unique representation as a sum of
//! non-consecutive Fibonacci numbers. Writing one bit per Fibonacci number
//! (smallest first) and appending a final `1` gives a codeword whose only
//! `11` bigram is its last two bits. Concatenated codewords can therefore be
//! split again without any length metadata.
//!
//! The Fibonacci numbers used here start at 1, 2 (not 0, 1):
//!
//! | n   | codeword      |
//! |-----|---------------|
//! | 1   | `11`          |
//! | 2   | `011`         |
//! | 3   | `0011`        |
//! | 4   | `1011`        |
//! | 100 | `00101000011` |

use crate::compression::bits::check_binary;
use crate::compression::{validate_dataset, IntegerCodec, Method};
use crate::error::{Error, Result};

/// Generates the ascending sequence 1, 2, 3, 5, 8, ... of every term `<= limit`.
///
/// # Example
///
/// ```
/// use intcodecs::compression::fibonacci::generate_fibs;
///
/// assert_eq!(generate_fibs(10), vec![1, 2, 3, 5, 8]);
/// assert!(generate_fibs(0).is_empty());
/// ```
pub fn generate_fibs(limit: u64) -> Vec<u64> {
    let mut fibs = Vec::new();
    let (mut a, mut b) = (1u64, 2u64);
    while a <= limit {
        fibs.push(a);
        match a.checked_add(b) {
            Some(next) => {
                a = b;
                b = next;
            }
            None => {
                // `b` is the last term that fits in a u64.
                if b <= limit {
                    fibs.push(b);
                }
                break;
            }
        }
    }
    fibs
}

/// Largest Fibonacci term (1, 2, 3, 5, ...) that does not exceed `max`.
pub fn largest_fibonacci_used(max: u64) -> Option<u64> {
    generate_fibs(max).last().copied()
}

/// Encodes a positive integer as a Fibonacci codeword.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for `n == 0`.
///
/// # Example
///
/// ```
/// use intcodecs::compression::fibonacci::encode;
///
/// assert_eq!(encode(1).unwrap(), "11");
/// assert_eq!(encode(4).unwrap(), "1011");
/// ```
pub fn encode(n: u64) -> Result<String> {
    if n == 0 {
        return Err(Error::InvalidInput(
            "only positive integers can be encoded, got 0".to_string(),
        ));
    }

    let fibs = generate_fibs(n);
    let mut code = vec![b'0'; fibs.len()];

    // Greedy from the largest term down. Zeckendorf guarantees the selected
    // terms are never adjacent, so `code` never holds two consecutive 1s.
    let mut remainder = n;
    for (i, &fib) in fibs.iter().enumerate().rev() {
        if remainder == 0 {
            break;
        }
        if fib <= remainder {
            code[i] = b'1';
            remainder -= fib;
        }
    }
    debug_assert_eq!(remainder, 0);

    code.push(b'1');
    Ok(code.into_iter().map(char::from).collect())
}

/// Decodes a single Fibonacci codeword.
///
/// # Errors
///
/// - [`Error::InvalidCode`] if the codeword is shorter than two bits, is not
///   terminated by `11`, contains characters other than '0'/'1', or denotes a
///   value that does not fit in a `u64`.
pub fn decode(code: &str) -> Result<u64> {
    if code.len() < 2 {
        return Err(Error::InvalidCode(format!(
            "Fibonacci codeword too short: {:?}",
            code
        )));
    }
    check_binary(code)?;
    if !code.ends_with("11") {
        return Err(Error::InvalidCode(format!(
            "Fibonacci codeword must end with \"11\": {:?}",
            code
        )));
    }

    let overflow =
        || Error::InvalidCode(format!("Fibonacci codeword overflows u64: {:?}", code));

    // Strip the terminator; the remaining bits select terms 1, 2, 3, 5, ...
    let body = &code.as_bytes()[..code.len() - 1];
    let mut total = 0u64;
    let (mut term, mut next) = (Some(1u64), Some(2u64));
    for &bit in body {
        if bit == b'1' {
            let value = term.ok_or_else(overflow)?;
            total = total.checked_add(value).ok_or_else(overflow)?;
        }
        let following = match (term, next) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        term = next;
        next = following;
    }
    Ok(total)
}

/// Compresses a dataset by concatenating the codeword of every element.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the dataset is empty or holds a zero.
///
/// # Example
///
/// ```
/// use intcodecs::compression::fibonacci::compress;
///
/// assert_eq!(compress(&[1, 2, 3]).unwrap(), "110110011");
/// ```
pub fn compress(numbers: &[u64]) -> Result<String> {
    validate_dataset(numbers)?;
    let mut stream = String::new();
    for &n in numbers {
        stream.push_str(&encode(n)?);
    }
    log::trace!(
        "fibonacci: {} integers -> {} bits",
        numbers.len(),
        stream.len()
    );
    Ok(stream)
}

/// One dataset element next to its codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Codeword {
    pub number: u64,
    pub code: String,
}

impl Codeword {
    /// Length of the codeword in bits.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Per-element breakdown of [`compress`]: the codeword of every element, in
/// input order. Their lengths sum to the length of the compressed stream.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the dataset is empty or holds a zero.
///
/// # Example
///
/// ```
/// use intcodecs::compression::fibonacci::codewords;
///
/// let breakdown = codewords(&[4, 100]).unwrap();
/// assert_eq!(breakdown[0].code, "1011");
/// assert_eq!(breakdown[1].len(), 11);
/// ```
pub fn codewords(numbers: &[u64]) -> Result<Vec<Codeword>> {
    validate_dataset(numbers)?;
    numbers
        .iter()
        .map(|&number| {
            Ok(Codeword {
                number,
                code: encode(number)?,
            })
        })
        .collect()
}

/// Splits `stream` at each `11` terminator and decodes every codeword.
///
/// The whole stream is consumed; the number of codewords found must equal
/// `expected_count`.
///
/// # Errors
///
/// - [`Error::InvalidCode`] for characters other than '0'/'1'.
/// - [`Error::StreamCorrupt`] if trailing bits are not terminated.
/// - [`Error::CountMismatch`] if the stream holds a different number of codewords.
///
/// # Example
///
/// ```
/// use intcodecs::compression::fibonacci::decompress;
///
/// assert_eq!(decompress("110110011", 3).unwrap(), vec![1, 2, 3]);
/// ```
pub fn decompress(stream: &str, expected_count: usize) -> Result<Vec<u64>> {
    check_binary(stream)?;
    let bytes = stream.as_bytes();
    let mut numbers = Vec::with_capacity(expected_count);

    let mut start = 0;
    while start < bytes.len() {
        let terminator =
            (start + 1..bytes.len()).find(|&j| bytes[j - 1] == b'1' && bytes[j] == b'1');
        match terminator {
            Some(end) => {
                numbers.push(decode(&stream[start..=end])?);
                start = end + 1;
            }
            None => return Err(Error::StreamCorrupt { position: start }),
        }
    }

    if numbers.len() != expected_count {
        return Err(Error::CountMismatch {
            expected: expected_count,
            actual: numbers.len(),
        });
    }
    Ok(numbers)
}

/// Fibonacci coding as an [`IntegerCodec`]. The output is self-describing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fibonacci;

impl IntegerCodec for Fibonacci {
    type Output = String;

    fn method(&self) -> Method {
        Method::Fibonacci
    }

    fn compress(&self, numbers: &[u64]) -> Result<String> {
        compress(numbers)
    }

    fn decompress(&self, output: &String, expected_count: usize) -> Result<Vec<u64>> {
        decompress(output, expected_count)
    }

    fn compressed_bits(&self, output: &String) -> usize {
        output.len()
    }

    fn wire_text(&self, output: &String) -> String {
        output.clone()
    }
}
