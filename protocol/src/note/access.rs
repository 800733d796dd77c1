//! Sharing a note's viewing key with other accounts.

use crate::config::{ADDRESS_LENGTH, HEX_PREFIX};
use crate::gateway::{self, ConnectionGateway, Operation};

use super::error::NoteError;
use super::identity::NoteIdentity;

/// One or more account addresses. A single address becomes a one-element
/// list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressList(Vec<String>);

impl AddressList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Non-empty, and every entry is `0x` followed by 40 hex digits.
    pub fn validate(&self) -> Result<(), NoteError> {
        if self.0.is_empty() {
            return Err(NoteError::InvalidInput("address list is empty".into()));
        }
        match self.0.iter().find(|address| !is_address(address)) {
            Some(bad) => Err(NoteError::InvalidInput(format!("malformed address {bad:?}"))),
            None => Ok(()),
        }
    }
}

fn is_address(candidate: &str) -> bool {
    candidate.len() == ADDRESS_LENGTH
        && candidate
            .strip_prefix(HEX_PREFIX)
            .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

impl From<&str> for AddressList {
    fn from(address: &str) -> Self {
        Self(vec![address.to_string()])
    }
}

impl From<String> for AddressList {
    fn from(address: String) -> Self {
        Self(vec![address])
    }
}

impl From<Vec<String>> for AddressList {
    fn from(addresses: Vec<String>) -> Self {
        Self(addresses)
    }
}

impl From<Vec<&str>> for AddressList {
    fn from(addresses: Vec<&str>) -> Self {
        Self(addresses.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for AddressList {
    fn from(addresses: &[&str]) -> Self {
        Self(addresses.iter().map(|a| a.to_string()).collect())
    }
}

impl NoteIdentity {
    /// Grant view access on this note to `addresses`.
    ///
    /// Refused locally when the note is not visible or is destroyed; no
    /// query is issued in that case. Otherwise one `grantNoteAccess` query
    /// is sent and its `success` flag returned (absent flag reads as
    /// `false`).
    pub async fn try_grant_access(
        &self,
        gateway: &dyn ConnectionGateway,
        addresses: impl Into<AddressList>,
    ) -> Result<bool, NoteError> {
        if !self.is_visible() {
            tracing::debug!(note = %self.id(), "grant refused: note not visible");
            return Err(NoteError::NotVisible(self.id().to_string()));
        }
        if self.is_destroyed() {
            tracing::debug!(note = %self.id(), "grant refused: note destroyed");
            return Err(NoteError::Destroyed(self.id().to_string()));
        }

        let addresses = addresses.into();
        addresses.validate()?;

        let response = gateway::request_access_grant(gateway, self.id(), addresses.into_vec())
            .await
            .ok_or(NoteError::UpstreamEmpty {
                operation: Operation::GrantNoteAccess,
            })?;

        Ok(response.success.unwrap_or(false))
    }

    /// Fail-closed [`NoteIdentity::try_grant_access`]: `false` whatever the
    /// cause.
    pub async fn grant_access(
        &self,
        gateway: &dyn ConnectionGateway,
        addresses: impl Into<AddressList>,
    ) -> bool {
        self.try_grant_access(gateway, addresses)
            .await
            .unwrap_or(false)
    }
}
