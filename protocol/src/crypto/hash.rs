//! # Hashing Utilities
//!
//! BLAKE3 is the only hash function the note client uses. Every digest that
//! leaves this module is domain separated through BLAKE3's `derive_key`
//! mode, so a note hash can never be confused with a proof transcript even
//! if both were computed over the same bytes.

/// Compute the BLAKE3 hash of the input data.
///
/// # Example
///
/// ```
/// use shade_protocol::crypto::blake3_hash;
///
/// let hash = blake3_hash(b"shade");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Compute a domain-separated hash using BLAKE3's `derive_key` mode.
///
/// `domain_separated_hash("a", x)` and `domain_separated_hash("b", x)` are
/// independent outputs. Context strings live in [`crate::config`].
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

/// Domain-separated hash over several parts without concatenating them.
///
/// Each part is length-prefixed (u64 LE) so that `["ab", "c"]` and
/// `["a", "bc"]` hash differently.
pub fn domain_separated_hash_multi(context: &str, parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}
