//! # Cryptographic Primitives
//!
//! Thin, typed wrappers around audited crates:
//!
//! - **BLAKE3** for note hashes, proof transcripts and generator seeds.
//! - **AES-256-GCM** for sealing viewing keys at rest on the session side.
//!
//! Nothing here implements a primitive from scratch.

pub mod encryption;
pub mod hash;

pub use encryption::{open_hex, seal_hex, EncryptionError};
pub use hash::{blake3_hash, domain_separated_hash, domain_separated_hash_multi};
