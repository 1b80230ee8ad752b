//! Variable-width bit packing for LZW code sequences.
//!
//! Each code is written MSB first using the smallest width that covers the
//! dictionary size at the moment the code is emitted. The dictionary starts
//! at `alphabet_size` entries and gains one entry per code, so the `i`-th
//! code (zero based) is written with `ceil(log2(alphabet_size + i))` bits.
//! Packer and unpacker advance the same [`CodeWidth`] after every code; any
//! other timing desynchronizes the stream.
//!
//! For the byte alphabet the first code takes 8 bits, the next 256 take 9,
//! the next 512 take 10, and so on.

use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Tracks the dictionary size and the code width it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeWidth {
    dictionary_size: u64,
    width: u32,
}

impl CodeWidth {
    /// Starts tracking a dictionary seeded with `alphabet_size` entries.
    pub fn new(alphabet_size: u32) -> Result<Self> {
        if alphabet_size == 0 {
            return Err(Error::InvalidInput(
                "alphabet size must be positive".to_string(),
            ));
        }
        let dictionary_size = u64::from(alphabet_size);
        Ok(CodeWidth {
            dictionary_size,
            width: bits_to_cover(dictionary_size),
        })
    }

    /// Width in bits of the next code.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current number of dictionary entries.
    pub fn dictionary_size(&self) -> u64 {
        self.dictionary_size
    }

    /// Accounts for the entry added alongside the code just written or read.
    pub fn advance(&mut self) {
        self.dictionary_size += 1;
        if self.dictionary_size > 1u64 << self.width {
            self.width += 1;
        }
    }
}

/// Bits needed to distinguish `size` values (at least one).
fn bits_to_cover(size: u64) -> u32 {
    (u64::BITS - (size - 1).leading_zeros()).max(1)
}

/// Packs `codes` using the growing width schedule.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for a zero alphabet size.
/// - [`Error::UnknownCode`] if a code does not exist in the dictionary at
///   the point it is written.
///
/// # Example
///
/// ```
/// use intcodecs::compression::code_packing::{pack_codes, unpack_codes};
///
/// let codes = [65, 66, 256, 258];
/// let bits = pack_codes(&codes, 256).unwrap();
/// assert_eq!(bits.len(), 8 + 9 + 9 + 9);
/// assert_eq!(unpack_codes(&bits, 256).unwrap(), codes);
/// ```
pub fn pack_codes(codes: &[u32], alphabet_size: u32) -> Result<BitVec<u8, Msb0>> {
    let mut width = CodeWidth::new(alphabet_size)?;
    let mut bits = BitVec::<u8, Msb0>::new();
    for &code in codes {
        if u64::from(code) >= width.dictionary_size() {
            return Err(Error::UnknownCode {
                code,
                next_code: u32::try_from(width.dictionary_size()).unwrap_or(u32::MAX),
            });
        }
        let w = width.width() as usize;
        if w > u32::BITS as usize {
            return Err(Error::InvalidInput(format!(
                "code width {} exceeds 32 bits",
                w
            )));
        }
        bits.extend_from_bitslice(&code.view_bits::<Msb0>()[u32::BITS as usize - w..]);
        width.advance();
    }
    log::trace!(
        "packed {} codes into {} bits (final width {})",
        codes.len(),
        bits.len(),
        width.width()
    );
    Ok(bits)
}

/// Reads codes back using the same width schedule as [`pack_codes`].
///
/// Up to seven trailing zero bits (byte padding) are ignored. Padding is
/// only unambiguous when every code is at least eight bits wide, which
/// holds for alphabets of more than 128 symbols.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for a zero alphabet size.
/// - [`Error::StreamCorrupt`] if the trailing bits are not valid padding.
pub fn unpack_codes(bits: &BitSlice<u8, Msb0>, alphabet_size: u32) -> Result<Vec<u32>> {
    let mut width = CodeWidth::new(alphabet_size)?;
    let mut codes = Vec::new();
    let mut position = 0;
    loop {
        let w = width.width() as usize;
        if w > u32::BITS as usize {
            return Err(Error::InvalidInput(format!(
                "code width {} exceeds 32 bits",
                w
            )));
        }
        if bits.len() - position < w {
            break;
        }
        codes.push(bits[position..position + w].load_be::<u32>());
        position += w;
        width.advance();
    }

    let tail = &bits[position..];
    if tail.len() >= 8 || tail.any() {
        return Err(Error::StreamCorrupt { position });
    }
    Ok(codes)
}
