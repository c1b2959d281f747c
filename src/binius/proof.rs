//! The packed commitment protocol: prove and verify.
//!
//! Proving lays the evaluation vector out as a power-of-two grid of rows,
//! extends each row through the linear code, commits to the extended
//! columns in a Merkle tree, and answers 32 Fiat-Shamir spot checks derived
//! from the root. Verification recomputes the shape and challenges, checks
//! every opened column against the root, checks the opened columns against
//! the declared row combination `t_prime` one bit lane at a time, and
//! recombines `t_prime` into the claimed evaluation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::encoder::extend_row;
use super::errors::{ProofError, ProofResult};
use super::field::BinaryFieldElement;
use super::hex_serde;
use super::merkle::{verify_branch, MerkleDigest, MerkleTree};
use super::packing::{column_to_le_bytes, pad_to_multiple, unpack_bit};
use super::tensor::{multilinear_eval, tensor_product};

/// Default code expansion: each packed word yields this many codeword words.
pub const EXPANSION_FACTOR: usize = 8;
/// Default packing width in bits per word.
pub const PACKING_FACTOR: usize = 16;
/// Number of Fiat-Shamir spot checks.
pub const NUM_CHALLENGES: usize = 32;

/// Hypercube dimension cap; keeps tensor weights and padding allocations
/// bounded on adversarial input.
const MAX_DIMENSIONS: usize = 32;

/// Encoder and challenge parameters carried inside every proof so the
/// verifier never has to guess the committed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedProofParams {
    pub expansion_factor: usize,
    pub packing_factor: usize,
    pub num_challenges: usize,
}

impl Default for PackedProofParams {
    fn default() -> Self {
        Self {
            expansion_factor: EXPANSION_FACTOR,
            packing_factor: PACKING_FACTOR,
            num_challenges: NUM_CHALLENGES,
        }
    }
}

impl PackedProofParams {
    pub fn new(
        expansion_factor: usize,
        packing_factor: usize,
        num_challenges: usize,
    ) -> ProofResult<Self> {
        let params = Self {
            expansion_factor,
            packing_factor,
            num_challenges,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parameter constraints: the packing width must fill whole bytes of a
    /// `u64` word, the expansion must keep `w ^ i` inside the packing width
    /// and the extended row length a power of two, and challenge indices
    /// are derived from a single-byte counter.
    pub fn validate(&self) -> ProofResult<()> {
        if self.packing_factor % 8 != 0
            || self.packing_factor == 0
            || self.packing_factor > 64
            || !self.packing_factor.is_power_of_two()
        {
            return Err(ProofError::validation(
                "packing factor",
                format!("must be a power of two multiple of 8 in 8..=64, got {}", self.packing_factor),
            ));
        }
        let width_cap = 1usize << self.packing_factor.min(16);
        if !self.expansion_factor.is_power_of_two()
            || self.expansion_factor < 2
            || self.expansion_factor > width_cap
        {
            return Err(ProofError::validation(
                "expansion factor",
                format!(
                    "must be a power of two in 2..={width_cap}, got {}",
                    self.expansion_factor
                ),
            ));
        }
        if self.num_challenges == 0 || self.num_challenges > 256 {
            return Err(ProofError::validation(
                "challenge count",
                format!("must be in 1..=256, got {}", self.num_challenges),
            ));
        }
        Ok(())
    }
}

/// The row/column layout of an evaluation vector of length `2^log_n`.
///
/// `log_row_length = (log_n + 2) / 2`, the rest of the bits index rows, so
/// the grid tiles the vector exactly and `row_length >= row_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub log_row_length: usize,
    pub log_row_count: usize,
    pub row_length: usize,
    pub row_count: usize,
}

impl GridShape {
    /// Shape for a hypercube of dimension `log_n` (`log_n >= 1`).
    pub fn for_dimensions(log_n: usize) -> Self {
        let log_row_length = (log_n + 2) / 2;
        let log_row_count = log_n.saturating_sub(log_row_length);
        Self {
            log_row_length,
            log_row_count,
            row_length: 1 << log_row_length,
            row_count: 1 << log_row_count,
        }
    }

    /// Row length after zero-padding up to the packing width.
    pub fn padded_row_length(&self, packing_factor: usize) -> usize {
        (self.row_length + packing_factor - 1) / packing_factor * packing_factor
    }

    /// Length of one encoded row, in packed words.
    pub fn extended_row_length(&self, params: &PackedProofParams) -> usize {
        self.padded_row_length(params.packing_factor) / params.packing_factor
            * params.expansion_factor
    }
}

/// The sole artifact crossing the system boundary.
///
/// Shape and encoder parameters travel inside the proof and are
/// cross-checked against the evaluation point during verification, so a
/// verifier reconstructs the grid without trusting the prover's implied
/// layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    pub params: PackedProofParams,
    pub row_length: u32,
    pub row_count: u32,
    #[serde(with = "hex_serde::digest")]
    pub root: MerkleDigest,
    pub evaluation_point: Vec<BinaryFieldElement>,
    pub eval: BinaryFieldElement,
    pub t_prime: Vec<BinaryFieldElement>,
    /// Full extended columns at the challenged indices, as packed words.
    pub columns: Vec<Vec<u64>>,
    #[serde(with = "hex_serde::digest_paths")]
    pub branches: Vec<Vec<MerkleDigest>>,
}

fn ceil_log2(n: usize) -> usize {
    n.next_power_of_two().trailing_zeros() as usize
}

/// Derive the spot-check indices from the commitment root:
/// `LE64(sha256(root || i)) mod extended_row_length` for `i = 0..count`.
///
/// Prover and verifier always agree on this set and its order given the
/// same root; this replaces verifier-supplied randomness.
pub fn derive_challenges(
    root: &MerkleDigest,
    count: usize,
    extended_row_length: usize,
) -> Vec<usize> {
    (0..count)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update(root);
            hasher.update([i as u8]);
            let digest = hasher.finalize();
            let mut low = [0u8; 8];
            low.copy_from_slice(&digest[..8]);
            // The extended row length is a power of two, so reducing the
            // low 64 bits equals reducing the full little-endian digest.
            (u64::from_le_bytes(low) % extended_row_length as u64) as usize
        })
        .collect()
}

/// Commit to `evaluations` and prove that its multilinear extension takes
/// the claimed value at `evaluation_point`.
///
/// The vector is zero-padded to the next power of two and the point
/// zero-extended until both name the same hypercube; proving is
/// trusted-input code, so any remaining inconsistency aborts with no
/// partial artifact.
pub fn prove(
    evaluations: &[BinaryFieldElement],
    evaluation_point: &[BinaryFieldElement],
    params: &PackedProofParams,
) -> ProofResult<Proof> {
    params.validate()?;
    if evaluations.is_empty() {
        return Err(ProofError::empty_input("evaluation vector"));
    }
    if evaluation_point.is_empty() {
        return Err(ProofError::validation(
            "evaluation point",
            "must have at least one coordinate",
        ));
    }
    let log_n = ceil_log2(evaluations.len()).max(evaluation_point.len()).max(1);
    if log_n > MAX_DIMENSIONS {
        return Err(ProofError::validation(
            "evaluation vector",
            format!("hypercube dimension {log_n} exceeds the supported {MAX_DIMENSIONS}"),
        ));
    }

    let original_length = evaluations.len();
    let mut evaluations = evaluations.to_vec();
    evaluations.resize(1 << log_n, BinaryFieldElement::ZERO);
    let mut point = evaluation_point.to_vec();
    point.resize(log_n, BinaryFieldElement::ZERO);
    debug!(
        original_length,
        padded_length = evaluations.len(),
        "padded evaluation vector to a power of two"
    );

    let shape = GridShape::for_dimensions(log_n);
    let rows: Vec<&[BinaryFieldElement]> = evaluations.chunks(shape.row_length).collect();
    if rows.len() != shape.row_count {
        return Err(ProofError::shape_mismatch(
            "grid rows",
            format!("expected {} rows, got {}", shape.row_count, rows.len()),
        ));
    }

    let extended_rows: Vec<Vec<u64>> = rows
        .par_iter()
        .map(|row| {
            let padded = pad_to_multiple(row, params.packing_factor);
            extend_row(&padded, params.expansion_factor, params.packing_factor)
        })
        .collect::<ProofResult<Vec<_>>>()?;
    let extended_row_length = shape.extended_row_length(params);
    debug!(
        rows = shape.row_count,
        row_length = shape.row_length,
        extended_row_length,
        "extended rows through the linear code"
    );

    // Row weights come from the high coordinates of the point, column
    // weights from the low ones: index i = row * row_length + col.
    let row_combination = tensor_product(&point[shape.log_row_length..]);
    if row_combination.len() != shape.row_count {
        return Err(ProofError::shape_mismatch(
            "row combination",
            format!(
                "expected {} weights, got {}",
                shape.row_count,
                row_combination.len()
            ),
        ));
    }

    let t_prime: Vec<BinaryFieldElement> = (0..shape.row_length)
        .map(|j| {
            row_combination
                .iter()
                .zip(&rows)
                .map(|(weight, row)| *weight * row[j])
                .sum()
        })
        .collect();

    let columns: Vec<Vec<u64>> = (0..extended_row_length)
        .map(|j| extended_rows.iter().map(|row| row[j]).collect())
        .collect();
    let leaves: Vec<Vec<u8>> = columns
        .par_iter()
        .map(|column| column_to_le_bytes(column, params.packing_factor))
        .collect();
    let tree = MerkleTree::new(&leaves)?;
    let root = tree.root();
    info!(root = %hex::encode(root), columns = extended_row_length, "committed to extended columns");

    let challenges = derive_challenges(&root, params.num_challenges, extended_row_length);
    let queried_columns: Vec<Vec<u64>> = challenges.iter().map(|&c| columns[c].clone()).collect();
    let branches = challenges
        .iter()
        .map(|&c| tree.branch(c))
        .collect::<ProofResult<Vec<_>>>()?;

    let eval = multilinear_eval(&evaluations, &point)?;
    info!(challenges = challenges.len(), %eval, "proof assembled");

    Ok(Proof {
        params: *params,
        row_length: shape.row_length as u32,
        row_count: shape.row_count as u32,
        root,
        evaluation_point: point,
        eval,
        t_prime,
        columns: queried_columns,
        branches,
    })
}

/// Check a proof against its own claims. Returns the first failing check as
/// a structured rejection; adversarial input never panics.
pub fn verify(proof: &Proof) -> ProofResult<()> {
    let params = &proof.params;
    params.validate()?;
    let point = &proof.evaluation_point;
    if point.is_empty() || point.len() > MAX_DIMENSIONS {
        return Err(ProofError::validation(
            "evaluation point",
            format!("must have 1..={MAX_DIMENSIONS} coordinates, got {}", point.len()),
        ));
    }

    // The carried shape must agree with the shape the point implies.
    let shape = GridShape::for_dimensions(point.len());
    if proof.row_length as usize != shape.row_length
        || proof.row_count as usize != shape.row_count
    {
        return Err(ProofError::shape_mismatch(
            "proof header",
            format!(
                "declared {}x{} grid but a {}-coordinate point implies {}x{}",
                proof.row_count,
                proof.row_length,
                point.len(),
                shape.row_count,
                shape.row_length
            ),
        ));
    }
    let extended_row_length = shape.extended_row_length(params);
    if proof.t_prime.len() != shape.row_length {
        return Err(ProofError::validation(
            "t_prime",
            format!("expected {} elements, got {}", shape.row_length, proof.t_prime.len()),
        ));
    }
    if proof.columns.len() != params.num_challenges || proof.branches.len() != params.num_challenges
    {
        return Err(ProofError::validation(
            "openings",
            format!(
                "expected {} columns and branches, got {} and {}",
                params.num_challenges,
                proof.columns.len(),
                proof.branches.len()
            ),
        ));
    }
    for (k, column) in proof.columns.iter().enumerate() {
        if column.len() != shape.row_count {
            return Err(ProofError::validation(
                "opened column",
                format!(
                    "column {k} has {} entries, expected {}",
                    column.len(),
                    shape.row_count
                ),
            ));
        }
        if params.packing_factor < 64 {
            for &word in column {
                if word >> params.packing_factor != 0 {
                    return Err(ProofError::validation(
                        "opened column",
                        format!("column {k} carries bits above the packing width"),
                    ));
                }
            }
        }
    }

    let challenges = derive_challenges(&proof.root, params.num_challenges, extended_row_length);
    debug!(challenges = challenges.len(), "re-derived challenge indices");

    (0..params.num_challenges)
        .into_par_iter()
        .try_for_each(|k| {
            let challenge = challenges[k];
            let leaf = column_to_le_bytes(&proof.columns[k], params.packing_factor);
            if !verify_branch(&proof.root, challenge, &leaf, &proof.branches[k]) {
                return Err(ProofError::merkle_verification(format!(
                    "opened column at index {challenge} does not hash to the committed root"
                )));
            }
            Ok(())
        })?;
    debug!("all opened columns verified against the root");

    // The code is linear per bit lane, so extending the declared row
    // combination must agree with combining the opened columns lane by
    // lane at every challenged index.
    let row_combination = tensor_product(&point[shape.log_row_length..]);
    let padded_t_prime = pad_to_multiple(&proof.t_prime, params.packing_factor);
    let extended_t_prime = extend_row(&padded_t_prime, params.expansion_factor, params.packing_factor)?;
    if extended_t_prime.len() != extended_row_length {
        return Err(ProofError::shape_mismatch(
            "extended t_prime",
            format!(
                "expected {extended_row_length} words, got {}",
                extended_t_prime.len()
            ),
        ));
    }

    (0..params.num_challenges)
        .into_par_iter()
        .try_for_each(|k| {
            let challenge = challenges[k];
            let column = &proof.columns[k];
            for lane in 0..params.packing_factor {
                let expected = unpack_bit(extended_t_prime[challenge], lane);
                let computed: BinaryFieldElement = row_combination
                    .iter()
                    .zip(column)
                    .map(|(weight, &word)| *weight * unpack_bit(word, lane))
                    .sum();
                if expected != computed {
                    return Err(ProofError::linearity_check(format!(
                        "column at index {challenge}, bit lane {lane}: opened rows combine to {computed}, t_prime extension gives {expected}"
                    )));
                }
            }
            Ok(())
        })?;
    debug!("t_prime consistent with every opened column");

    let col_combination = tensor_product(&point[..shape.log_row_length]);
    let computed_eval: BinaryFieldElement = proof
        .t_prime
        .iter()
        .zip(&col_combination)
        .map(|(value, weight)| *value * *weight)
        .sum();
    if computed_eval != proof.eval {
        return Err(ProofError::evaluation_mismatch(format!(
            "t_prime recombines to {computed_eval}, proof claims {}",
            proof.eval
        )));
    }
    info!(%computed_eval, "proof accepted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(values: &[u64]) -> Vec<BinaryFieldElement> {
        values.iter().map(|&v| BinaryFieldElement::new(v)).collect()
    }

    #[test]
    fn test_grid_shape_tiles_exactly() {
        for log_n in 1..=20 {
            let shape = GridShape::for_dimensions(log_n);
            assert_eq!(shape.row_length * shape.row_count, 1 << log_n);
            assert!(shape.row_length >= shape.row_count);
            assert!(shape.row_length.is_power_of_two());
            assert!(shape.row_count.is_power_of_two());
        }
    }

    #[test]
    fn test_extended_row_length_is_power_of_two() {
        let params = PackedProofParams::default();
        for log_n in 1..=16 {
            let shape = GridShape::for_dimensions(log_n);
            assert!(shape.extended_row_length(&params).is_power_of_two());
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(PackedProofParams::new(8, 16, 32).is_ok());
        // Packing width not a byte multiple.
        assert!(PackedProofParams::new(8, 12, 32).is_err());
        // Expansion of one never expands.
        assert!(PackedProofParams::new(1, 16, 32).is_err());
        // Challenge counter is a single byte.
        assert!(PackedProofParams::new(8, 16, 257).is_err());
    }

    #[test]
    fn test_challenges_in_range_and_deterministic() {
        let root = [7u8; 32];
        let first = derive_challenges(&root, 32, 8);
        let second = derive_challenges(&root, 32, 8);
        assert_eq!(first, second);
        assert!(first.iter().all(|&c| c < 8));

        let other = derive_challenges(&[8u8; 32], 32, 8);
        assert_ne!(first, other);
    }

    #[test]
    fn test_prove_rejects_empty_inputs() {
        let params = PackedProofParams::default();
        let err = prove(&[], &bits(&[0]), &params).unwrap_err();
        assert!(matches!(err, ProofError::EmptyInput { .. }));
        let err = prove(&bits(&[1]), &[], &params).unwrap_err();
        assert!(matches!(err, ProofError::Validation { .. }));
    }

    #[test]
    fn test_point_longer_than_vector_grows_grid() {
        let params = PackedProofParams::default();
        let proof = prove(&bits(&[1, 0]), &bits(&[0, 0, 0, 0]), &params).unwrap();
        assert_eq!(proof.evaluation_point.len(), 4);
        assert_eq!(proof.row_length as usize * proof.row_count as usize, 16);
        verify(&proof).unwrap();
    }

    #[test]
    fn test_verify_rejects_header_shape_lie() {
        let params = PackedProofParams::default();
        let mut proof = prove(&bits(&[1, 0, 1, 1, 0, 1, 0, 1]), &bits(&[1, 1, 0]), &params).unwrap();
        proof.row_length *= 2;
        let err = verify(&proof).unwrap_err();
        assert!(matches!(err, ProofError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_verify_rejects_wrong_opening_count() {
        let params = PackedProofParams::default();
        let mut proof = prove(&bits(&[1, 0, 1, 1, 0, 1, 0, 1]), &bits(&[1, 1, 0]), &params).unwrap();
        proof.columns.pop();
        let err = verify(&proof).unwrap_err();
        assert!(matches!(err, ProofError::Validation { .. }));
    }

    #[test]
    fn test_verify_rejects_oversized_column_words() {
        let params = PackedProofParams::default();
        let mut proof = prove(&bits(&[1, 0, 1, 1, 0, 1, 0, 1]), &bits(&[1, 1, 0]), &params).unwrap();
        proof.columns[0][0] |= 1 << 20;
        let err = verify(&proof).unwrap_err();
        assert!(matches!(err, ProofError::Validation { .. }));
    }
}
