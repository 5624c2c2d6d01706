//! # Nullifiers
//!
//! A nullifier is a single-use random token attached to one verification
//! attempt. The verifier records it as consumed; any later attempt reusing
//! the same token is rejected, which is what stops a captured presentation
//! from being replayed.
//!
//! Generation reads the operating system's secure random source and fails
//! loudly if it is unavailable. There is no fallback generator: a
//! predictable nullifier would let an attacker pre-consume a holder's
//! tokens or link verification attempts.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use pdip_core::CryptoError;

/// A 32-byte single-use random token.
///
/// Serializes as a 64-character lowercase hex string. `Debug` shows only
/// a prefix; the full value appears where it is deliberately rendered.
/// Carries no derivable relationship to any committed data.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nullifier([u8; 32]);

impl Nullifier {
    /// Generate a fresh random nullifier from the OS random source.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomSourceUnavailable`] if the source
    /// cannot be read. Generation never degrades to a weaker generator.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::RandomSourceUnavailable(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Construct from raw bytes. Intended for deserialization and tests.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32-byte value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex.trim().to_lowercase();
        if hex.len() != 64 {
            return Err(CryptoError::DigestError(format!(
                "nullifier hex must be 64 chars, got {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in (0..hex.len()).step_by(2).enumerate() {
            bytes[i] = u8::from_str_radix(&hex[chunk..chunk + 2], 16)
                .map_err(|e| CryptoError::DigestError(format!("invalid hex: {e}")))?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for Nullifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Nullifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Nullifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "Nullifier({prefix}...)")
    }
}

impl std::fmt::Display for Nullifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_succeeds_and_is_unique() {
        let mut seen = HashSet::new();
        for _ in 0..64 {
            let n = Nullifier::generate().expect("OS random source should be available");
            assert!(seen.insert(n), "generated a duplicate nullifier");
        }
    }

    #[test]
    fn test_hex_roundtrip() {
        let n = Nullifier::from_bytes([0xab; 32]);
        let hex = n.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(Nullifier::from_hex(&hex).unwrap(), n);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(Nullifier::from_hex("").is_err());
        assert!(Nullifier::from_hex("abcd").is_err());
        assert!(Nullifier::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let n = Nullifier::generate().unwrap();
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json.len(), 64 + 2);
        let back: Nullifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }

    #[test]
    fn test_debug_shows_prefix_only() {
        let n = Nullifier::from_bytes([0xcd; 32]);
        let debug = format!("{n:?}");
        assert_eq!(debug, "Nullifier(cdcdcdcd...)");
    }
}
