//! Integration suite for the packed commitment protocol: full round trips,
//! tamper rejection, Fiat-Shamir determinism, and the code's linearity
//! property.

use proptest::prelude::*;
use rand::Rng;

use super::encoder::extend_row;
use super::errors::ProofError;
use super::field::BinaryFieldElement;
use super::packing::unpack_bit;
use super::proof::{derive_challenges, prove, verify, GridShape, PackedProofParams};
use super::tensor::{multilinear_eval, tensor_product};

fn bits(values: &[u64]) -> Vec<BinaryFieldElement> {
    values.iter().map(|&v| BinaryFieldElement::new(v)).collect()
}

/// LSB-first bit decomposition of a byte.
fn byte_bits(byte: u8) -> Vec<BinaryFieldElement> {
    (0..8).map(|i| BinaryFieldElement::new((byte >> i) as u64)).collect()
}

fn random_vector(len: usize) -> Vec<BinaryFieldElement> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| BinaryFieldElement::new(rng.gen::<u64>())).collect()
}

#[test]
fn test_round_trip_small_grid() {
    let params = PackedProofParams::default();
    let evaluations = byte_bits(0xA5);
    let point = bits(&[1, 1, 0]);
    let proof = prove(&evaluations, &point, &params).expect("proving should succeed");
    verify(&proof).expect("round trip should verify");
}

#[test]
fn test_round_trip_large_grid() {
    let params = PackedProofParams::default();
    let evaluations = random_vector(256);
    let point = random_vector(8);
    let proof = prove(&evaluations, &point, &params).expect("proving should succeed");
    verify(&proof).expect("round trip should verify");
}

#[test]
fn test_round_trip_unpadded_input() {
    // 100 evaluations pad up to 128; the point grows to 7 coordinates.
    let params = PackedProofParams::default();
    let evaluations = random_vector(100);
    let point = bits(&[1, 0, 1]);
    let proof = prove(&evaluations, &point, &params).expect("proving should succeed");
    assert_eq!(proof.evaluation_point.len(), 7);
    verify(&proof).expect("round trip should verify");
}

#[test]
fn test_end_to_end_selects_committed_bit() {
    // The byte 0xA5 as a truth table; a boolean point naming index 3 must
    // evaluate to bit 3 of the byte.
    let params = PackedProofParams::default();
    let evaluations = byte_bits(0xA5);
    let point = bits(&[1, 1, 0]);

    let expected = evaluations[3];
    assert_eq!(multilinear_eval(&evaluations, &point).unwrap(), expected);

    let proof = prove(&evaluations, &point, &params).unwrap();
    assert_eq!(proof.eval, expected);
    verify(&proof).unwrap();
}

#[test]
fn test_fiat_shamir_determinism() {
    let params = PackedProofParams::default();
    let evaluations = random_vector(64);
    let point = random_vector(6);

    let first = prove(&evaluations, &point, &params).unwrap();
    let second = prove(&evaluations, &point, &params).unwrap();

    assert_eq!(first.root, second.root);
    let shape = GridShape::for_dimensions(6);
    let erl = shape.extended_row_length(&params);
    assert_eq!(
        derive_challenges(&first.root, params.num_challenges, erl),
        derive_challenges(&second.root, params.num_challenges, erl),
    );
    assert_eq!(
        bincode::serialize(&first).unwrap(),
        bincode::serialize(&second).unwrap(),
        "independent proofs over identical inputs must be byte-identical"
    );
}

#[test]
fn test_tampered_root_rejected() {
    let params = PackedProofParams::default();
    let mut proof = prove(&random_vector(64), &random_vector(6), &params).unwrap();
    proof.root[0] ^= 0x01;
    let err = verify(&proof).unwrap_err();
    assert!(matches!(err, ProofError::MerkleVerification { .. }), "got {err}");
}

#[test]
fn test_tampered_column_rejected() {
    let params = PackedProofParams::default();
    let mut proof = prove(&random_vector(64), &random_vector(6), &params).unwrap();
    proof.columns[5][0] ^= 0x01;
    let err = verify(&proof).unwrap_err();
    assert!(matches!(err, ProofError::MerkleVerification { .. }), "got {err}");
}

#[test]
fn test_tampered_branch_rejected() {
    let params = PackedProofParams::default();
    let mut proof = prove(&random_vector(64), &random_vector(6), &params).unwrap();
    proof.branches[0][0][0] ^= 0x01;
    let err = verify(&proof).unwrap_err();
    assert!(matches!(err, ProofError::MerkleVerification { .. }), "got {err}");
}

#[test]
fn test_tampered_t_prime_rejected() {
    // A small grid keeps every extended position downstream of every
    // t_prime word, so the spot checks always see the flip.
    let params = PackedProofParams::default();
    let mut proof = prove(&byte_bits(0xA5), &bits(&[1, 1, 0]), &params).unwrap();
    proof.t_prime[0] += BinaryFieldElement::ONE;
    let err = verify(&proof).unwrap_err();
    assert!(matches!(err, ProofError::LinearityCheck { .. }), "got {err}");
}

#[test]
fn test_tampered_eval_rejected() {
    let params = PackedProofParams::default();
    let mut proof = prove(&random_vector(64), &random_vector(6), &params).unwrap();
    proof.eval += BinaryFieldElement::ONE;
    let err = verify(&proof).unwrap_err();
    assert!(matches!(err, ProofError::EvaluationMismatch { .. }), "got {err}");
}

#[test]
fn test_swapped_openings_rejected() {
    // Columns re-ordered against their branches no longer match the
    // challenge indices they are checked at.
    let params = PackedProofParams::default();
    let mut proof = prove(&random_vector(256), &random_vector(8), &params).unwrap();

    let shape = GridShape::for_dimensions(8);
    let challenges = derive_challenges(
        &proof.root,
        params.num_challenges,
        shape.extended_row_length(&params),
    );
    let swap_with = challenges
        .iter()
        .position(|&c| c != challenges[0])
        .expect("32 draws from 16 indices should not all collide");
    proof.columns.swap(0, swap_with);

    let err = verify(&proof).unwrap_err();
    assert!(matches!(err, ProofError::MerkleVerification { .. }), "got {err}");
}

proptest! {
    #[test]
    fn prop_tensor_partition_of_unity(corner_bits in proptest::collection::vec(any::<bool>(), 1..10)) {
        let point: Vec<BinaryFieldElement> =
            corner_bits.iter().map(|&b| BinaryFieldElement::from(b)).collect();
        let weights = tensor_product(&point);
        prop_assert_eq!(weights.len(), 1 << point.len());

        let corner: usize = corner_bits
            .iter()
            .enumerate()
            .map(|(j, &b)| (b as usize) << j)
            .sum();
        let ones = weights.iter().filter(|w| w.is_one()).count();
        prop_assert_eq!(ones, 1);
        prop_assert!(weights[corner].is_one());
    }

    #[test]
    fn prop_extension_commutes_with_combinations(
        row_bits in proptest::collection::vec(any::<bool>(), 64..=64),
        other_bits in proptest::collection::vec(any::<bool>(), 64..=64),
    ) {
        let a: Vec<BinaryFieldElement> = row_bits.iter().map(|&b| BinaryFieldElement::from(b)).collect();
        let b: Vec<BinaryFieldElement> = other_bits.iter().map(|&b| BinaryFieldElement::from(b)).collect();
        let sum: Vec<BinaryFieldElement> = a.iter().zip(&b).map(|(x, y)| *x + *y).collect();

        let ext_a = extend_row(&a, 8, 16).unwrap();
        let ext_b = extend_row(&b, 8, 16).unwrap();
        let ext_sum = extend_row(&sum, 8, 16).unwrap();
        let ext_zero = extend_row(&vec![BinaryFieldElement::ZERO; 64], 8, 16).unwrap();

        // extend(a + b) + extend(a) + extend(b) collapses to the zero
        // row's extension in every bit lane.
        for j in 0..ext_sum.len() {
            for lane in 0..16 {
                let folded = unpack_bit(ext_sum[j], lane)
                    + unpack_bit(ext_a[j], lane)
                    + unpack_bit(ext_b[j], lane);
                prop_assert_eq!(folded, unpack_bit(ext_zero[j], lane));
            }
        }
    }

    #[test]
    fn prop_round_trip_random_inputs(
        evaluation_bits in proptest::collection::vec(any::<bool>(), 1..200),
        point_bits in proptest::collection::vec(any::<bool>(), 1..8),
    ) {
        let params = PackedProofParams::default();
        let evaluations: Vec<BinaryFieldElement> =
            evaluation_bits.iter().map(|&b| BinaryFieldElement::from(b)).collect();
        let point: Vec<BinaryFieldElement> =
            point_bits.iter().map(|&b| BinaryFieldElement::from(b)).collect();

        let proof = prove(&evaluations, &point, &params).unwrap();
        prop_assert!(verify(&proof).is_ok());
    }
}
