//! # Protocol Configuration & Constants
//!
//! Every constant the note client depends on lives here: the operation
//! names understood by the connection service, wire-format lengths, and the
//! domain-separation tags that keep hashes from one context from being
//! replayed in another.
//!
//! Changing a domain tag changes every derived note hash and the Pedersen
//! generators, which invalidates all existing viewing keys. Bump the `/vN`
//! suffix instead of editing a tag in place.

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Client protocol version, reported by the CLI and attached to logs.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Connection Gateway Operations
// ---------------------------------------------------------------------------

/// Asks the session holder for the decrypted viewing key of a note.
/// Payload `{id}`, response `{note: {decryptedViewingKey, owner: {address}}}`.
pub const OP_NOTE_WITH_VIEWING_KEY: &str = "noteWithViewingKey";

/// Asks the session holder to share a note's viewing key with other accounts.
/// Payload `{id, addresses}`, response `{success}`.
pub const OP_GRANT_NOTE_ACCESS: &str = "grantNoteAccess";

// ---------------------------------------------------------------------------
// Addresses & Hashes
// ---------------------------------------------------------------------------

/// Account address length in characters: `0x` followed by 40 hex digits.
pub const ADDRESS_LENGTH: usize = 42;

/// Hex prefix used by every address, key and hash on the wire.
pub const HEX_PREFIX: &str = "0x";

/// Note hash length in bytes. Rendered as 66 characters with the prefix.
pub const NOTE_HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Viewing Keys
// ---------------------------------------------------------------------------

/// Compressed BN254 scalar holding the note's blinding factor.
pub const VIEWING_KEY_BLINDING_LENGTH: usize = 32;

/// Big-endian `u64` holding the note's value.
pub const VIEWING_KEY_VALUE_LENGTH: usize = 8;

/// Total decoded length of a decrypted viewing key.
pub const VIEWING_KEY_LENGTH: usize = VIEWING_KEY_BLINDING_LENGTH + VIEWING_KEY_VALUE_LENGTH;

// ---------------------------------------------------------------------------
// Symmetric Encryption (sealed viewing keys)
// ---------------------------------------------------------------------------

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. Twelve, always.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Domain Separation
// ---------------------------------------------------------------------------

/// Seed tag for the canonical Pedersen generators.
pub const PEDERSEN_DOMAIN: &str = "shade/pedersen-generators/v1";

/// Tag for deriving a note hash from its commitment.
pub const NOTE_HASH_DOMAIN: &str = "shade/note-hash/v1";

/// Tag for the proof transcript digest (relation, commitments, sender).
pub const PROOF_TRANSCRIPT_DOMAIN: &str = "shade/range-proof-transcript/v1";
