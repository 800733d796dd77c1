//! # Confidential Notes
//!
//! A note is an encrypted record of a value bound to an owner and an asset.
//! This module holds both views of it:
//!
//! ```text
//! identity.rs     - NoteIdentity: opaque record view + predicates
//! viewing_key.rs  - decrypted viewing key codec (value, blinding)
//! materialized.rs - MaterializedNote: commitment + hash, prover operand
//! materialize.rs  - export through the gateway, NoteInput, resolve()
//! access.rs       - grant_access and address normalization
//! error.rs        - NoteError result kinds
//! ```
//!
//! An identity only becomes a materialized note by asking the session
//! holder for its decrypted viewing key; see [`NoteIdentity::try_export`].

pub mod access;
pub mod identity;
pub mod materialize;
pub mod materialized;
pub mod viewing_key;

mod error;

pub use access::AddressList;
pub use error::NoteError;
pub use identity::{Account, Asset, NoteData, NoteIdentity, NoteRecord, NoteStatus};
pub use materialize::{resolve, NoteInput};
pub use materialized::{MaterializedNote, NoteHash};
pub use viewing_key::{ViewingKey, ViewingKeyError};
