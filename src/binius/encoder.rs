//! Row extension through a placeholder linear code.
//!
//! Each packed word `w` of a row expands into `expansion_factor` words
//! `w ^ i`. This stands in for a genuine distance-bounded error-correcting
//! code; the only property the surrounding protocol relies on is linearity:
//! per bit lane, extending a GF(2) combination of rows equals the same
//! combination of the extensions.

use super::errors::ProofResult;
use super::field::BinaryFieldElement;
use super::packing::pack_vector;

/// Extend a row of field elements into `len(row) / packing_factor *
/// expansion_factor` packed words.
///
/// The row length must be an exact multiple of `packing_factor`; callers
/// zero-pad short rows first (padding commutes with the code).
pub fn extend_row(
    row: &[BinaryFieldElement],
    expansion_factor: usize,
    packing_factor: usize,
) -> ProofResult<Vec<u64>> {
    let packed = pack_vector(row, packing_factor)?;
    let mut extended = Vec::with_capacity(packed.len() * expansion_factor);
    for word in packed {
        for i in 0..expansion_factor as u64 {
            extended.push(word ^ i);
        }
    }
    Ok(extended)
}
