//! Bit packing: grouping GF(2) elements into fixed-width words and back.
//!
//! A packed word stores element `j` of its group at bit `j` (little-endian
//! bit order). Only the low `factor` bits of a word are meaningful.

use super::errors::{ProofError, ProofResult};
use super::field::BinaryFieldElement;

/// Fold consecutive groups of `factor` elements into single words.
///
/// The input length must be an exact multiple of `factor`; callers with a
/// short trailing group zero-pad first via [`pad_to_multiple`].
pub fn pack_vector(vector: &[BinaryFieldElement], factor: usize) -> ProofResult<Vec<u64>> {
    if factor == 0 || factor > 64 {
        return Err(ProofError::validation(
            "packing factor",
            format!("must be in 1..=64, got {factor}"),
        ));
    }
    if vector.len() % factor != 0 {
        return Err(ProofError::shape_mismatch(
            "pack_vector",
            format!(
                "vector length {} is not a multiple of packing factor {factor}",
                vector.len()
            ),
        ));
    }
    Ok(vector
        .chunks(factor)
        .map(|group| {
            group
                .iter()
                .enumerate()
                .fold(0u64, |word, (j, element)| word | (u64::from(element.value()) << j))
        })
        .collect())
}

/// Extract bit `bit` of a packed word as a field element.
///
/// Treats a packed row as `factor` independent single-bit sub-rows; the
/// verifier's linearity check reads columns one bit lane at a time.
pub fn unpack_bit(word: u64, bit: usize) -> BinaryFieldElement {
    debug_assert!(bit < 64);
    BinaryFieldElement::new(word >> bit)
}

/// Zero-pad a vector up to the next multiple of `factor`.
pub fn pad_to_multiple(vector: &[BinaryFieldElement], factor: usize) -> Vec<BinaryFieldElement> {
    let mut padded = vector.to_vec();
    let remainder = padded.len() % factor;
    if remainder != 0 {
        padded.resize(padded.len() + factor - remainder, BinaryFieldElement::ZERO);
    }
    padded
}

/// Serialize a column of packed words into little-endian bytes,
/// `width_bits / 8` bytes per word, for use as a Merkle leaf.
pub fn column_to_le_bytes(column: &[u64], width_bits: usize) -> Vec<u8> {
    let bytes_per_word = width_bits / 8;
    let mut out = Vec::with_capacity(column.len() * bytes_per_word);
    for word in column {
        out.extend_from_slice(&word.to_le_bytes()[..bytes_per_word]);
    }
    out
}
