//! Proof artifact transport.
//!
//! A proof crosses the system boundary either as a compact binary record
//! (bincode) or as self-describing JSON with hex-encoded digests for
//! text-based carriers. Both formats embed the grid shape and encoder
//! parameters, so a verifier reconstructs the layout from the artifact
//! alone. Decoding treats input as untrusted and never panics.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::binius::errors::{ProofError, ProofResult};
use crate::binius::proof::Proof;

/// Serialize a proof into the compact binary transport format.
pub fn encode_proof(proof: &Proof) -> ProofResult<Vec<u8>> {
    bincode::serialize(proof)
        .map_err(|e| ProofError::serialization(format!("binary encoding failed: {e}")))
}

/// Decode a proof from the binary transport format.
pub fn decode_proof(bytes: &[u8]) -> ProofResult<Proof> {
    bincode::deserialize(bytes)
        .map_err(|e| ProofError::serialization(format!("malformed binary proof: {e}")))
}

/// Serialize a proof into the text transport format: JSON with the root
/// and branch digests hex-encoded.
pub fn encode_proof_json(proof: &Proof) -> ProofResult<String> {
    serde_json::to_string_pretty(proof)
        .map_err(|e| ProofError::serialization(format!("JSON encoding failed: {e}")))
}

/// Decode a proof from the text transport format.
pub fn decode_proof_json(text: &str) -> ProofResult<Proof> {
    serde_json::from_str(text)
        .map_err(|e| ProofError::serialization(format!("malformed JSON proof: {e}")))
}

/// Hand an opaque serialized proof to the external display/transport sink.
/// The core neither renders nor inspects the artifact beyond writing it.
pub fn emit(path: &Path, payload: &[u8]) -> ProofResult<()> {
    fs::write(path, payload).map_err(|e| {
        ProofError::serialization(format!("could not write artifact {}: {e}", path.display()))
    })?;
    info!(path = %path.display(), bytes = payload.len(), "proof artifact emitted");
    Ok(())
}
