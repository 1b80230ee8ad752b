//! Conversions between binary-digit text and packed bits.
//!
//! The Fibonacci and Huffman codecs use '0'/'1' strings as their wire
//! format; the LZW packer works on `bitvec` buffers (MSB first).

use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Checks that `text` consists only of '0' and '1' characters.
pub fn check_binary(text: &str) -> Result<()> {
    match text.bytes().position(|b| b != b'0' && b != b'1') {
        Some(index) => Err(Error::InvalidCode(format!(
            "unexpected character {:?} at position {}",
            text[index..].chars().next().unwrap_or('?'),
            index
        ))),
        None => Ok(()),
    }
}

/// Parses a '0'/'1' string into a bit vector.
pub fn parse_bit_string(text: &str) -> Result<BitVec<u8, Msb0>> {
    check_binary(text)?;
    Ok(text.bytes().map(|b| b == b'1').collect())
}

/// Renders bits as a '0'/'1' string.
pub fn to_bit_string(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter()
        .map(|bit| if *bit { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render() {
        let bits = parse_bit_string("1011").unwrap();
        assert_eq!(bits.len(), 4);
        assert!(bits[0] && !bits[1] && bits[2] && bits[3]);
        assert_eq!(to_bit_string(&bits), "1011");
    }

    #[test]
    fn test_rejects_non_binary() {
        assert!(matches!(
            parse_bit_string("10a1"),
            Err(Error::InvalidCode(msg)) if msg.contains("position 2")
        ));
        assert!(check_binary("").is_ok());
    }
}
