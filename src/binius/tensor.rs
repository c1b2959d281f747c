//! Multilinear Lagrange-basis weights over the boolean hypercube.

use super::errors::{ProofError, ProofResult};
use super::field::BinaryFieldElement;

/// Build the `2^k` Lagrange-basis weights for a `k`-coordinate point by
/// iterative doubling: each coordinate `p` maps the current vector `V` to
/// `[(1-p)·x for x in V] ++ [p·x for x in V]`.
///
/// Over GF(2) every coordinate is boolean, so exactly one weight is 1 (at
/// the hypercube corner named by the point's bits) and the rest are 0.
pub fn tensor_product(point: &[BinaryFieldElement]) -> Vec<BinaryFieldElement> {
    let mut weights = vec![BinaryFieldElement::ONE];
    for coordinate in point {
        // 1 - p in GF(2) is 1 + p.
        let complement = BinaryFieldElement::ONE + *coordinate;
        let mut next = Vec::with_capacity(weights.len() * 2);
        next.extend(weights.iter().map(|w| *w * complement));
        next.extend(weights.iter().map(|w| *w * *coordinate));
        weights = next;
    }
    weights
}

/// Evaluate the multilinear extension of `evaluations` at `point`:
/// `Σ_i evaluations[i] · w_i(point)` where
/// `w_i(point) = Π_j (point[j] if bit j of i else 1 - point[j])`.
pub fn multilinear_eval(
    evaluations: &[BinaryFieldElement],
    point: &[BinaryFieldElement],
) -> ProofResult<BinaryFieldElement> {
    let weights = tensor_product(point);
    if evaluations.len() != weights.len() {
        return Err(ProofError::shape_mismatch(
            "multilinear evaluation",
            format!(
                "{} evaluations for a {}-coordinate point (expected {})",
                evaluations.len(),
                point.len(),
                weights.len()
            ),
        ));
    }
    Ok(evaluations
        .iter()
        .zip(&weights)
        .map(|(value, weight)| *value * *weight)
        .sum())
}
