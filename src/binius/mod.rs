//! Packed tensor polynomial commitment over GF(2).
//!
//! A simplified Binius-style proof of knowledge: a secret bit-vector is
//! committed as the truth table of a multilinear polynomial, laid out as a
//! grid, code-extended row by row, and committed column by column in a
//! Merkle tree. The prover then opens Fiat-Shamir-chosen columns together
//! with a tensor combination of the original rows, and the verifier checks
//! the openings, the code's linearity, and the claimed evaluation.

pub mod encoder;
pub mod errors;
pub mod field;
pub mod hex_serde;
pub mod merkle;
pub mod packing;
pub mod proof;
pub mod tensor;

#[cfg(test)]
mod tests;

// Re-export core types for convenience
pub use errors::{ProofError, ProofResult};
pub use field::BinaryFieldElement;
pub use merkle::{verify_branch, MerkleDigest, MerkleTree};
pub use proof::{
    derive_challenges, prove, verify, GridShape, PackedProofParams, Proof, EXPANSION_FACTOR,
    NUM_CHALLENGES, PACKING_FACTOR,
};
pub use tensor::{multilinear_eval, tensor_product};
