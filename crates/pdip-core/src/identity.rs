//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers that cross the workspace: wallet
//! addresses (issuers and holders) and wallet session identifiers. You
//! cannot pass a session id where an address is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::IdentityError;

/// A wallet address: `0x` followed by 40 lowercase hex characters.
///
/// Issuing institutions and credential holders are both identified by
/// addresses supplied by the wallet provider. The inner string is private;
/// construction goes through [`Address::parse()`] or
/// [`Address::from_public_key_bytes()`], so an `Address` in hand is always
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Validate and normalize an address string.
    ///
    /// Uppercase hex is accepted and lowered; anything that is not
    /// `0x` + 40 hex chars is rejected.
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        let s = s.trim();
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| IdentityError::InvalidAddress(format!("missing 0x prefix: {s:?}")))?;
        if hex.len() != 40 {
            return Err(IdentityError::InvalidAddress(format!(
                "expected 40 hex chars after 0x, got {}",
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdentityError::InvalidAddress(format!(
                "non-hex character in address: {s:?}"
            )));
        }
        Ok(Self(format!("0x{}", hex.to_lowercase())))
    }

    /// Derive an address from a 32-byte public key: the last 20 bytes of
    /// the key's SHA-256 digest, hex encoded.
    pub fn from_public_key_bytes(key: &[u8; 32]) -> Self {
        let hash = Sha256::digest(key);
        let tail: String = hash[12..].iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("0x{tail}"))
    }

    /// The normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Unique identifier for one wallet connection.
///
/// Minted on connect, discarded on disconnect. Carried in the persisted
/// snapshot only so a reloaded session can resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}
