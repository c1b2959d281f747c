//! zkk: proving properties of a secret bit-vector without revealing it.
//!
//! The crate implements a simplified Binius-style packed tensor polynomial
//! commitment over GF(2). A committed bit-vector is arranged as the truth
//! table of a multilinear polynomial; the prover commits to a code-extended
//! grid of its rows through a Merkle tree and convinces a verifier that the
//! polynomial evaluates to a claimed value at a chosen point, with
//! Fiat-Shamir spot checks replacing verifier randomness.
//!
//! ```rust
//! use zkk::{derive_bit_sequence, prove, verify, BinaryFieldElement, PackedProofParams};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let evaluations = derive_bit_sequence("0xa5")?;
//! let point = vec![
//!     BinaryFieldElement::ONE,
//!     BinaryFieldElement::ONE,
//!     BinaryFieldElement::ZERO,
//! ];
//!
//! let proof = prove(&evaluations, &point, &PackedProofParams::default())?;
//! verify(&proof)?;
//! # Ok(())
//! # }
//! ```
//!
//! The proof is the sole artifact crossing the system boundary; see
//! [`artifact`] for its binary and text transports.

pub mod artifact;
pub mod binius;
pub mod keys;

// Re-export commonly used types for convenience
pub use binius::{
    multilinear_eval, prove, tensor_product, verify, BinaryFieldElement, MerkleTree,
    PackedProofParams, Proof, ProofError, ProofResult,
};
pub use keys::derive_bit_sequence;
