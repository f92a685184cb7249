use sha2::{Digest, Sha256};

/// Fingerprints a proverb for de-duplication lookups.
///
/// The text is lowercased and stripped of ASCII punctuation before
/// hashing, so rewordings that differ only in case or punctuation map to
/// the same digest. Returns the SHA-256 digest as lowercase hex.
pub fn compute_hash(text: &str) -> String {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let digest = Sha256::digest(normalized.as_bytes());
    hex::encode(digest)
}
