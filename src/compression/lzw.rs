//! LZW (Lempel-Ziv-Welch) adaptive dictionary coding.
//!
//! Both sides start from the same dictionary of the 256 single-byte
//! patterns and add exactly one entry per code, so the encoder and decoder
//! tables agree at every step without the dictionary ever being sent.
//!
//! Dictionary entries are stored as `(prefix code, appended byte)` pairs in
//! an append-only table instead of materialized byte strings.
//!
//! Integer datasets go through a text adaptor first: `[1, 20, 3]` becomes
//! the bytes `1,20,3`.

use std::collections::HashMap;

use bitvec::prelude::*;

use crate::compression::code_packing::{pack_codes, unpack_codes};
use crate::compression::{validate_dataset, IntegerCodec, Method};
use crate::error::{Error, Result};

/// Size of the base alphabet: one entry per byte value.
pub const ALPHABET_SIZE: u32 = 256;

/// First code assigned to a multi-byte pattern.
pub const FIRST_CODE: u32 = ALPHABET_SIZE;

/// Separator used by the numeric adaptor.
pub const DEFAULT_DELIMITER: u8 = b',';

/// The code after `code`. Codes are `u32`, so the dictionary holds at most
/// `u32::MAX + 1` entries.
fn following_code(code: u32) -> Result<u32> {
    code.checked_add(1).ok_or_else(|| {
        Error::InvalidInput(format!(
            "LZW dictionary exhausted the code space at {} entries",
            u64::from(code) + 1
        ))
    })
}

/// Compresses the input data using the LZW algorithm.
///
/// # Parameters
///
/// - `input`: a slice of bytes to compress.
///
/// # Returns
///
/// The sequence of emitted codes. Empty input yields no codes.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the dictionary runs out of `u32` codes.
///
/// # Details
///
/// The longest dictionary pattern `w` that prefixes the remaining input is
/// tracked by its code. When `w` extended by the next byte `c` is unknown,
/// the code of `w` is emitted, `w + c` is assigned the next free code, and
/// matching restarts from `c`.
///
/// # Example
///
/// ```
/// use intcodecs::compression::lzw::compress;
///
/// assert_eq!(compress(b"ABABABA").unwrap(), vec![65, 66, 256, 258]);
/// ```
pub fn compress(input: &[u8]) -> Result<Vec<u32>> {
    let mut dict: HashMap<(u32, u8), u32> = HashMap::new();
    let mut next_code = FIRST_CODE;
    let mut codes = Vec::new();
    let mut current: Option<u32> = None;

    for &byte in input {
        current = match current {
            None => Some(u32::from(byte)),
            Some(prefix) => match dict.get(&(prefix, byte)) {
                Some(&code) => Some(code),
                None => {
                    codes.push(prefix);
                    dict.insert((prefix, byte), next_code);
                    next_code = following_code(next_code)?;
                    Some(u32::from(byte))
                }
            },
        };
    }
    if let Some(code) = current {
        codes.push(code);
    }

    log::trace!(
        "lzw: {} bytes -> {} codes, dictionary grew to {} entries",
        input.len(),
        codes.len(),
        next_code
    );
    Ok(codes)
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    prefix: Option<u32>,
    byte: u8,
    first: u8,
    len: usize,
}

/// Decoder-side dictionary: an arena indexed by code.
struct Dictionary {
    entries: Vec<Entry>,
}

impl Dictionary {
    fn new() -> Self {
        let entries = (0..=u8::MAX)
            .map(|byte| Entry {
                prefix: None,
                byte,
                first: byte,
                len: 1,
            })
            .collect();
        Dictionary { entries }
    }

    fn next_code(&self) -> Result<u32> {
        u32::try_from(self.entries.len()).map_err(|_| {
            Error::InvalidInput("LZW dictionary exhausted the code space".to_string())
        })
    }

    fn get(&self, code: u32) -> Option<&Entry> {
        self.entries.get(code as usize)
    }

    /// Adds the pattern `dictionary[prefix] + byte`; `prefix` must be known.
    fn push(&mut self, prefix: u32, byte: u8) {
        let parent = self.entries[prefix as usize];
        self.entries.push(Entry {
            prefix: Some(prefix),
            byte,
            first: parent.first,
            len: parent.len + 1,
        });
    }

    /// Appends the pattern of a known `code` to `out`.
    fn write(&self, code: u32, out: &mut Vec<u8>) {
        let len = self.entries[code as usize].len;
        let start = out.len();
        out.resize(start + len, 0);
        let mut index = start + len;
        let mut cursor = Some(code);
        while let Some(code) = cursor {
            let entry = &self.entries[code as usize];
            index -= 1;
            out[index] = entry.byte;
            cursor = entry.prefix;
        }
    }
}

/// Decompresses a sequence of LZW codes back into the original byte data.
///
/// # Parameters
///
/// - `codes`: codes produced by [`compress`].
///
/// # Returns
///
/// The decompressed bytes.
///
/// # Details
///
/// Each code is looked up and its pattern appended to the output, then
/// `previous + first byte of current` is added to the dictionary. A code
/// equal to the next code to be assigned refers to the entry the encoder
/// created one step ahead of the decoder; its pattern is
/// `previous + first byte of previous`.
///
/// # Errors
///
/// Returns [`Error::UnknownCode`] for a code that is neither in the
/// dictionary nor the next code to be assigned.
///
/// # Example
///
/// ```
/// use intcodecs::compression::lzw::{compress, decompress};
///
/// let input = b"TOBEORNOTTOBE";
/// let compressed = compress(input).unwrap();
/// let decompressed = decompress(&compressed).unwrap();
/// assert_eq!(decompressed, input);
/// ```
pub fn decompress(codes: &[u32]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let Some((&first, rest)) = codes.split_first() else {
        return Ok(out);
    };

    let mut dict = Dictionary::new();
    if first >= FIRST_CODE {
        return Err(Error::UnknownCode {
            code: first,
            next_code: FIRST_CODE,
        });
    }
    dict.write(first, &mut out);
    let mut previous = first;

    for &code in rest {
        let next_code = dict.next_code()?;
        let first_byte = match dict.get(code) {
            Some(entry) => entry.first,
            None if code == next_code => dict.entries[previous as usize].first,
            None => return Err(Error::UnknownCode { code, next_code }),
        };
        // Inserting before writing lets the self-referencing code resolve to
        // the entry just added.
        dict.push(previous, first_byte);
        dict.write(code, &mut out);
        previous = code;
    }

    log::trace!(
        "lzw: {} codes -> {} bytes, dictionary grew to {} entries",
        codes.len(),
        out.len(),
        dict.entries.len()
    );
    Ok(out)
}

fn check_delimiter(delimiter: u8) -> Result<()> {
    if delimiter.is_ascii_digit() {
        return Err(Error::InvalidInput(format!(
            "delimiter {:?} collides with digit characters",
            char::from(delimiter)
        )));
    }
    Ok(())
}

/// Serializes a dataset as delimiter-joined decimal text.
pub fn numbers_to_text(numbers: &[u64], delimiter: u8) -> Result<Vec<u8>> {
    check_delimiter(delimiter)?;
    let mut text = Vec::new();
    for (i, n) in numbers.iter().enumerate() {
        if i > 0 {
            text.push(delimiter);
        }
        text.extend_from_slice(n.to_string().as_bytes());
    }
    Ok(text)
}

/// Parses delimiter-joined decimal text back into a dataset.
///
/// # Errors
///
/// - [`Error::ParseError`] for any token that is not a decimal `u64`.
/// - [`Error::InvalidInput`] for a zero element or a digit delimiter.
pub fn text_to_numbers(text: &[u8], delimiter: u8) -> Result<Vec<u64>> {
    check_delimiter(delimiter)?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(|&b| b == delimiter)
        .map(|token| {
            if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
                return Err(Error::ParseError(format!(
                    "not a decimal integer: {:?}",
                    String::from_utf8_lossy(token)
                )));
            }
            let digits =
                std::str::from_utf8(token).map_err(|e| Error::ParseError(e.to_string()))?;
            let value = digits
                .parse::<u64>()
                .map_err(|e| Error::ParseError(format!("{:?}: {}", digits, e)))?;
            if value == 0 {
                return Err(Error::InvalidInput(
                    "decoded dataset holds a zero".to_string(),
                ));
            }
            Ok(value)
        })
        .collect()
}

/// Compresses a dataset through the text adaptor with the default delimiter.
///
/// # Example
///
/// ```
/// use intcodecs::compression::lzw::{compress_numbers, decompress_numbers};
///
/// let data = [1, 2, 3, 4, 5, 10, 20, 50, 100];
/// let codes = compress_numbers(&data).unwrap();
/// assert_eq!(decompress_numbers(&codes).unwrap(), data);
/// ```
pub fn compress_numbers(numbers: &[u64]) -> Result<Vec<u32>> {
    compress_numbers_with(numbers, DEFAULT_DELIMITER)
}

/// Compresses a dataset through the text adaptor with a custom delimiter.
pub fn compress_numbers_with(numbers: &[u64], delimiter: u8) -> Result<Vec<u32>> {
    validate_dataset(numbers)?;
    let text = numbers_to_text(numbers, delimiter)?;
    compress(&text)
}

/// Inverse of [`compress_numbers`].
pub fn decompress_numbers(codes: &[u32]) -> Result<Vec<u64>> {
    decompress_numbers_with(codes, DEFAULT_DELIMITER)
}

/// Inverse of [`compress_numbers_with`].
pub fn decompress_numbers_with(codes: &[u32], delimiter: u8) -> Result<Vec<u64>> {
    let text = decompress(codes)?;
    text_to_numbers(&text, delimiter)
}

/// How the size of an LZW code sequence is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LzwSizing {
    /// The exact length of the variable-width packed stream.
    #[default]
    VariableWidth,
    /// A flat number of bits per code.
    FixedWidth(u32),
}

/// LZW codes together with their variable-width packed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LzwEncoding {
    /// Emitted codes.
    pub codes: Vec<u32>,
    /// `codes` packed with the growing width schedule.
    pub packed: BitVec<u8, Msb0>,
}

impl LzwEncoding {
    /// Packs `codes` for the byte alphabet.
    pub fn from_codes(codes: Vec<u32>) -> Result<Self> {
        let packed = pack_codes(&codes, ALPHABET_SIZE)?;
        Ok(LzwEncoding { codes, packed })
    }

    /// Unpacks a stream produced for the byte alphabet.
    ///
    /// Byte padding is dropped: `packed` is rebuilt from the codes, so it
    /// has the same length as the stream [`LzwEncoding::from_codes`] makes.
    pub fn from_packed(packed: &BitSlice<u8, Msb0>) -> Result<Self> {
        LzwEncoding::from_codes(unpack_codes(packed, ALPHABET_SIZE)?)
    }

    /// Number of emitted codes.
    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    /// Entries in the encoder dictionary once the last code was emitted:
    /// the byte alphabet plus one per code except the last.
    pub fn dictionary_size(&self) -> u64 {
        u64::from(ALPHABET_SIZE) + self.codes.len().saturating_sub(1) as u64
    }

    /// Packed stream as bytes, zero padded to a byte boundary.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut packed = self.packed.clone();
        packed.set_uninitialized(false);
        packed.into_vec()
    }
}

/// LZW coding of the text form of a dataset, as an [`IntegerCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lzw {
    sizing: LzwSizing,
    delimiter: u8,
}

impl Default for Lzw {
    fn default() -> Self {
        Lzw {
            sizing: LzwSizing::VariableWidth,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Lzw {
    /// Creates a codec with the given size accounting and delimiter.
    pub fn new(sizing: LzwSizing, delimiter: u8) -> Result<Self> {
        check_delimiter(delimiter)?;
        if sizing == LzwSizing::FixedWidth(0) {
            return Err(Error::InvalidInput(
                "fixed code width must be positive".to_string(),
            ));
        }
        Ok(Lzw { sizing, delimiter })
    }

    /// How compressed sizes are measured.
    pub fn sizing(&self) -> LzwSizing {
        self.sizing
    }
}

impl IntegerCodec for Lzw {
    type Output = LzwEncoding;

    fn method(&self) -> Method {
        Method::Lzw
    }

    fn compress(&self, numbers: &[u64]) -> Result<LzwEncoding> {
        LzwEncoding::from_codes(compress_numbers_with(numbers, self.delimiter)?)
    }

    fn decompress(&self, output: &LzwEncoding, expected_count: usize) -> Result<Vec<u64>> {
        let numbers = decompress_numbers_with(&output.codes, self.delimiter)?;
        if numbers.len() != expected_count {
            return Err(Error::CountMismatch {
                expected: expected_count,
                actual: numbers.len(),
            });
        }
        Ok(numbers)
    }

    fn compressed_bits(&self, output: &LzwEncoding) -> usize {
        match self.sizing {
            LzwSizing::VariableWidth => output.packed.len(),
            LzwSizing::FixedWidth(bits) => output.codes.len() * bits as usize,
        }
    }

    fn wire_text(&self, output: &LzwEncoding) -> String {
        crate::compression::bits::to_bit_string(&output.packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_empty_input() {
        let compressed = compress(b"").unwrap();
        assert!(compressed.is_empty());
        assert!(decompress(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_single_character() {
        let input = b"AAAAAA";
        let compressed = compress(input).unwrap();
        // A, AA, AAA: the second and third codes hit the self-reference rule.
        assert_eq!(compressed, vec![65, 256, 257]);
        assert_eq!(decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_self_reference_pattern() {
        let compressed = compress(b"ABABABA").unwrap();
        assert_eq!(compressed, vec![65, 66, 256, 258]);
        assert_eq!(decompress(&compressed).unwrap(), b"ABABABA");
    }

    #[test]
    fn test_known_code_sequence() {
        let compressed = compress(b"TOBEORNOTTOBEORTOBEORNOT").unwrap();
        assert_eq!(
            compressed,
            vec![84, 79, 66, 69, 79, 82, 78, 79, 84, 256, 258, 260, 265, 259, 261, 263]
        );
    }

    #[test]
    fn test_longer_input() {
        let input = b"abracadabra abracadabra abracadabra";
        let compressed = compress(input).unwrap();
        assert!(compressed.len() < input.len());
        assert_eq!(decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_non_ascii() {
        let input = "这是一段测试".as_bytes();
        let compressed = compress(input).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_random_bytes_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let len = rng.gen_range(0..2000);
            // A small alphabet forces long matches and self references.
            let input: Vec<u8> = (0..len).map(|_| rng.gen_range(b'a'..=b'c')).collect();
            assert_eq!(decompress(&compress(&input).unwrap()).unwrap(), input);
        }
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(
            decompress(&[300]),
            Err(Error::UnknownCode {
                code: 300,
                next_code: 256
            })
        );
        assert_eq!(
            decompress(&[256]),
            Err(Error::UnknownCode {
                code: 256,
                next_code: 256
            })
        );
        assert_eq!(
            decompress(&[65, 66, 259]),
            Err(Error::UnknownCode {
                code: 259,
                next_code: 257
            })
        );
    }

    #[test]
    fn test_numeric_adaptor() {
        assert_eq!(numbers_to_text(&[1, 20, 3], b',').unwrap(), b"1,20,3");
        assert_eq!(text_to_numbers(b"1;20;3", b';').unwrap(), vec![1, 20, 3]);
        assert!(matches!(
            numbers_to_text(&[1], b'7'),
            Err(Error::InvalidInput(_))
        ));

        let data = [1, 2, 3, 4, 5, 10, 20, 50, 100];
        let codes = compress_numbers(&data).unwrap();
        assert_eq!(decompress_numbers(&codes).unwrap(), data);
    }

    #[test]
    fn test_numeric_adaptor_parse_errors() {
        assert!(matches!(
            text_to_numbers(b"1,x,3", b','),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            text_to_numbers(b"1,,3", b','),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            text_to_numbers(b"99999999999999999999999", b','),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            text_to_numbers(b"4,0", b','),
            Err(Error::InvalidInput(_))
        ));
        let codes = compress(b"12,ab").unwrap();
        assert!(matches!(
            decompress_numbers(&codes),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_codec_sizes_and_round_trip() {
        let data: Vec<u64> = (0..300).map(|i| (i % 7) + 1).collect();
        let variable = Lzw::default();
        let encoded = variable.compress(&data).unwrap();
        assert_eq!(variable.compressed_bits(&encoded), encoded.packed.len());
        assert_eq!(variable.decompress(&encoded, data.len()).unwrap(), data);
        assert_eq!(
            variable.decompress(&encoded, data.len() + 1),
            Err(Error::CountMismatch {
                expected: data.len() + 1,
                actual: data.len()
            })
        );

        let fixed = Lzw::new(LzwSizing::FixedWidth(12), b',').unwrap();
        assert_eq!(fixed.compressed_bits(&encoded), encoded.codes.len() * 12);
        assert!(Lzw::new(LzwSizing::FixedWidth(0), b',').is_err());
        assert!(Lzw::new(LzwSizing::VariableWidth, b'0').is_err());
    }

    #[test]
    fn test_packed_bytes_round_trip() {
        let codec = Lzw::default();
        let encoded = codec.compress(&[5, 5, 5, 5, 12, 5]).unwrap();
        assert_eq!(encoded.packed.len(), 71);
        let padded = BitVec::<u8, Msb0>::from_vec(encoded.to_bytes());
        assert_eq!(padded.len(), 72);

        let restored = LzwEncoding::from_packed(&padded).unwrap();
        assert_eq!(restored, encoded);
        assert_eq!(codec.compressed_bits(&restored), codec.compressed_bits(&encoded));
        assert_eq!(codec.wire_text(&restored), codec.wire_text(&encoded));
    }

    #[test]
    fn test_code_count_and_dictionary_size() {
        let encoded = LzwEncoding::from_codes(compress(b"ABABABA").unwrap()).unwrap();
        assert_eq!(encoded.code_count(), 4);
        // AB, BA, ABA were added; the last code adds nothing.
        assert_eq!(encoded.dictionary_size(), 259);

        let empty = LzwEncoding::from_codes(Vec::new()).unwrap();
        assert_eq!((empty.code_count(), empty.dictionary_size()), (0, 256));
    }

    #[test]
    fn test_code_space_is_bounded() {
        assert_eq!(following_code(FIRST_CODE), Ok(FIRST_CODE + 1));
        assert!(matches!(
            following_code(u32::MAX),
            Err(Error::InvalidInput(msg)) if msg.contains("exhausted")
        ));
    }
}
