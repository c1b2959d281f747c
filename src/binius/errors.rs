//! Error taxonomy for the packed commitment protocol.
//!
//! Proving treats any inconsistency as fatal and aborts with no partial
//! artifact. Verification treats its input as adversarial: every failed
//! check surfaces as an explicit rejection reason, never a panic.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProofError {
    #[error("invalid input: {context} - {details}")]
    Validation { context: String, details: String },

    #[error("shape mismatch: {context} - {details}")]
    ShapeMismatch { context: String, details: String },

    #[error("Merkle branch verification failed: {details}")]
    MerkleVerification { details: String },

    #[error("linearity check failed: {details}")]
    LinearityCheck { details: String },

    #[error("evaluation mismatch: {details}")]
    EvaluationMismatch { details: String },

    #[error("empty input: {context}")]
    EmptyInput { context: String },

    #[error("serialization error: {details}")]
    Serialization { details: String },
}

impl ProofError {
    pub fn validation(context: &str, details: impl Into<String>) -> Self {
        ProofError::Validation {
            context: context.to_string(),
            details: details.into(),
        }
    }

    pub fn shape_mismatch(context: &str, details: impl Into<String>) -> Self {
        ProofError::ShapeMismatch {
            context: context.to_string(),
            details: details.into(),
        }
    }

    pub fn merkle_verification(details: impl Into<String>) -> Self {
        ProofError::MerkleVerification {
            details: details.into(),
        }
    }

    pub fn linearity_check(details: impl Into<String>) -> Self {
        ProofError::LinearityCheck {
            details: details.into(),
        }
    }

    pub fn evaluation_mismatch(details: impl Into<String>) -> Self {
        ProofError::EvaluationMismatch {
            details: details.into(),
        }
    }

    pub fn empty_input(context: &str) -> Self {
        ProofError::EmptyInput {
            context: context.to_string(),
        }
    }

    pub fn serialization(details: impl Into<String>) -> Self {
        ProofError::Serialization {
            details: details.into(),
        }
    }
}

/// Result type alias for convenience
pub type ProofResult<T> = Result<T, ProofError>;
