//! Huffman coding over integer symbols.
//!
//! The codebook is not embedded in the compressed stream; it travels
//! alongside it in [`HuffmanEncoding`] and decoding is driven by its inverse.
//!
//! # Tie-breaking
//!
//! Tree construction is deterministic. Leaves enter the queue in ascending
//! symbol order and every queue entry carries an insertion sequence number;
//! merged nodes take the next number. Among nodes of equal frequency the one
//! inserted first is extracted first. Of the two nodes extracted per merge,
//! the first becomes the left (`0`) child.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use crate::compression::bits::check_binary;
use crate::compression::{validate_dataset, IntegerCodec, Method};
use crate::error::{Error, Result};

/// Maps each symbol to its code.
pub type Codebook = BTreeMap<u64, String>;

/// Maps each code back to its symbol.
pub type InverseCodebook = HashMap<String, u64>;

/// Represents a node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf node contains a symbol and its frequency.
    Leaf { symbol: u64, freq: usize },
    /// An internal node with left and right children and combined frequency.
    Internal {
        freq: usize,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Returns the frequency of the node.
    pub fn freq(&self) -> usize {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }
}

/// Queue entry: lowest frequency first, then lowest insertion sequence.
#[derive(Debug)]
struct QueueEntry {
    order: usize,
    node: HuffmanNode,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .node
            .freq()
            .cmp(&self.node.freq())
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Build a frequency table mapping each symbol in `numbers` to its count.
pub fn build_frequency_table(numbers: &[u64]) -> BTreeMap<u64, usize> {
    let mut freq = BTreeMap::new();
    for &n in numbers {
        *freq.entry(n).or_insert(0) += 1;
    }
    freq
}

/// Build the Huffman tree given a frequency table.
/// Returns `None` if the frequency table is empty.
///
/// A table with a single symbol yields a lone leaf.
pub fn build_tree(frequencies: &BTreeMap<u64, usize>) -> Option<HuffmanNode> {
    let mut heap: BinaryHeap<QueueEntry> = frequencies
        .iter()
        .enumerate()
        .map(|(order, (&symbol, &freq))| QueueEntry {
            order,
            node: HuffmanNode::Leaf { symbol, freq },
        })
        .collect();
    let mut next_order = heap.len();

    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };
        let freq = left.node.freq() + right.node.freq();
        heap.push(QueueEntry {
            order: next_order,
            node: HuffmanNode::Internal {
                freq,
                left: Box::new(left.node),
                right: Box::new(right.node),
            },
        });
        next_order += 1;
    }
    heap.pop().map(|entry| entry.node)
}

/// Derive the codebook: `0` for every left edge, `1` for every right edge.
///
/// Traversal uses an explicit stack. A tree that is a single leaf maps its
/// symbol to `"0"`.
pub fn build_codebook(root: &HuffmanNode) -> Codebook {
    let mut codebook = Codebook::new();
    let mut stack = vec![(root, String::new())];
    while let Some((node, prefix)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                let code = if prefix.is_empty() {
                    "0".to_string()
                } else {
                    prefix
                };
                codebook.insert(*symbol, code);
            }
            HuffmanNode::Internal { left, right, .. } => {
                let mut right_prefix = prefix.clone();
                right_prefix.push('1');
                stack.push((right, right_prefix));
                let mut left_prefix = prefix;
                left_prefix.push('0');
                stack.push((left, left_prefix));
            }
        }
    }
    codebook
}

/// Swap keys and values of a codebook for decoding.
pub fn invert_codebook(codebook: &Codebook) -> InverseCodebook {
    codebook
        .iter()
        .map(|(&symbol, code)| (code.clone(), symbol))
        .collect()
}

/// A Huffman bit stream together with the codebook needed to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HuffmanEncoding {
    /// Concatenated codes, as a '0'/'1' string.
    pub bits: String,
    /// Code of every distinct symbol.
    pub codebook: Codebook,
}

impl HuffmanEncoding {
    /// The decode table for `bits`.
    pub fn inverse_codebook(&self) -> InverseCodebook {
        invert_codebook(&self.codebook)
    }

    /// Number of distinct symbols in the encoded dataset.
    pub fn unique_symbols(&self) -> usize {
        self.codebook.len()
    }
}

/// Compress a dataset: count frequencies, build tree and codebook, then
/// concatenate the code of every element in input order.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the dataset is empty or holds a zero.
///
/// # Example
///
/// ```
/// use intcodecs::compression::huffman::{compress, decompress};
///
/// let data = [7, 7, 7, 9];
/// let encoded = compress(&data).unwrap();
/// let decoded = decompress(&encoded.bits, &encoded.inverse_codebook(), data.len()).unwrap();
/// assert_eq!(decoded, data);
/// ```
pub fn compress(numbers: &[u64]) -> Result<HuffmanEncoding> {
    validate_dataset(numbers)?;
    let frequencies = build_frequency_table(numbers);
    let tree = build_tree(&frequencies)
        .ok_or_else(|| Error::InvalidInput("dataset must not be empty".to_string()))?;
    let codebook = build_codebook(&tree);

    let mut bits = String::new();
    for n in numbers {
        let code = codebook
            .get(n)
            .ok_or_else(|| Error::InvalidInput(format!("no code assigned to {}", n)))?;
        bits.push_str(code);
    }
    log::trace!(
        "huffman: {} integers, {} distinct -> {} bits",
        numbers.len(),
        codebook.len(),
        bits.len()
    );
    Ok(HuffmanEncoding { bits, codebook })
}

/// Decode `bits` with an inverse codebook, stopping after `expected_count` symbols.
///
/// Bits are accumulated until the buffer equals a known code. Bits left over
/// once `expected_count` symbols are decoded are ignored. Single-symbol
/// codebooks (`{"0": s}`) need no special handling: every `0` matches.
///
/// # Errors
///
/// - [`Error::InvalidCode`] for characters other than '0'/'1'.
/// - [`Error::AmbiguousStream`] if the bits run out, or the buffer outgrows
///   the longest code, before `expected_count` symbols are decoded.
pub fn decompress(
    bits: &str,
    inverse_codebook: &InverseCodebook,
    expected_count: usize,
) -> Result<Vec<u64>> {
    check_binary(bits)?;
    let mut symbols = Vec::with_capacity(expected_count);
    if expected_count == 0 {
        return Ok(symbols);
    }

    let longest = inverse_codebook.keys().map(String::len).max().unwrap_or(0);
    let mut buffer = String::new();
    for bit in bits.chars() {
        buffer.push(bit);
        if let Some(&symbol) = inverse_codebook.get(&buffer) {
            symbols.push(symbol);
            buffer.clear();
            if symbols.len() == expected_count {
                return Ok(symbols);
            }
        } else if buffer.len() >= longest {
            break;
        }
    }

    Err(Error::AmbiguousStream {
        decoded: symbols.len(),
        expected: expected_count,
    })
}

/// Huffman coding as an [`IntegerCodec`]. The output carries its codebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Huffman;

impl IntegerCodec for Huffman {
    type Output = HuffmanEncoding;

    fn method(&self) -> Method {
        Method::Huffman
    }

    fn compress(&self, numbers: &[u64]) -> Result<HuffmanEncoding> {
        compress(numbers)
    }

    fn decompress(&self, output: &HuffmanEncoding, expected_count: usize) -> Result<Vec<u64>> {
        decompress(&output.bits, &output.inverse_codebook(), expected_count)
    }

    fn compressed_bits(&self, output: &HuffmanEncoding) -> usize {
        output.bits.len()
    }

    fn wire_text(&self, output: &HuffmanEncoding) -> String {
        output.bits.clone()
    }
}
