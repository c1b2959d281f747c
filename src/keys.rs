//! Secret-to-bit-vector derivation.
//!
//! The proof engine only ever sees the bit representation of a secret; this
//! module turns a hex-encoded secret into that evaluation vector. Deriving
//! public keys or addresses from the secret is deliberately outside this
//! crate.

use crate::binius::errors::{ProofError, ProofResult};
use crate::binius::field::BinaryFieldElement;

/// Decode a hex-encoded secret into its LSB-first bit sequence as field
/// elements. Accepts an optional `0x` prefix; rejects empty or non-hex
/// input before it can reach the proof engine.
pub fn derive_bit_sequence(secret: &str) -> ProofResult<Vec<BinaryFieldElement>> {
    let trimmed = secret.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(ProofError::validation("secret", "must not be empty"));
    }
    // Tolerate odd-length hex by left-padding a zero nibble.
    let normalized = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(&normalized)
        .map_err(|e| ProofError::validation("secret", format!("invalid hex: {e}")))?;

    let mut bits = Vec::with_capacity(bytes.len() * 8);
    // Least-significant byte and bit first, matching the index order of
    // the committed truth table.
    for byte in bytes.iter().rev() {
        for i in 0..8 {
            bits.push(BinaryFieldElement::new(u64::from(byte >> i)));
        }
    }
    Ok(bits)
}
