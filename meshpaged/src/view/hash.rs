use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use shared::types::ViewEntry;

/// SHA-256 over the serialized view. Entry order is part of the view, so it
/// is hashed as built.
pub fn compute_hash(entries: &[ViewEntry]) -> Result<String> {
    let json = serde_json::to_vec(entries)
        .context("Failed to serialize view for hashing")?;

    let hash = Sha256::digest(&json);
    Ok(hex::encode(hash))
}
