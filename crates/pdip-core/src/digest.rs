//! # Content Digests
//!
//! `ContentDigest` is the fixed-width, one-way fingerprint used for
//! certificate hashes, student-data commitments, and every other digest in
//! the workspace. Digests can only be computed from `CanonicalBytes`, so
//! the same logical record always fingerprints identically.
//!
//! SHA-256 is the production algorithm. A circuit-friendly hash would be
//! required by a real proving system; the algorithm tag on every digest
//! keeps that migration open without a format break.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CryptoError;

/// The hash algorithm that produced a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256, the production algorithm.
    Sha256,
    /// Reserved for a circuit-friendly hash. Never computed here; present
    /// so serialized digests carry a tag that survives a future migration.
    Poseidon2,
}

impl DigestAlgorithm {
    /// Algorithm identifier string, as used in the `algo:hex` rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Poseidon2 => "poseidon2",
        }
    }

    /// Parse an algorithm identifier string.
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "poseidon2" => Ok(Self::Poseidon2),
            other => Err(CryptoError::DigestError(format!(
                "unknown digest algorithm: {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte content digest with its algorithm tag.
///
/// Renders and serializes as `"sha256:<64 hex chars>"`, the form used in
/// persisted ledger snapshots and presentation statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a content digest from raw bytes and an algorithm tag.
    ///
    /// Prefer [`sha256_digest()`] for computing digests from canonical
    /// bytes; this constructor exists for deserialization and derivation
    /// code in the crypto layer.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest value as a lowercase hex string (no algorithm tag).
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a digest from its `algo:hex` rendering.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DigestError`] if the string is missing the
    /// algorithm tag, names an unknown algorithm, or the hex part is not
    /// exactly 64 hex characters.
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        let (algo, hex) = s.split_once(':').ok_or_else(|| {
            CryptoError::DigestError(format!("digest missing algorithm tag: {s:?}"))
        })?;
        let algorithm = DigestAlgorithm::parse(algo)?;
        if hex.len() != 64 {
            return Err(CryptoError::DigestError(format!(
                "digest hex must be 64 chars, got {}",
                hex.len()
            )));
        }
        let raw = hex_to_bytes(hex).map_err(CryptoError::DigestError)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(Self { algorithm, bytes })
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// This is the only digest computation path. The signature accepts
/// `&CanonicalBytes`, not raw `&[u8]`, so no code path can fingerprint
/// bytes that skipped canonicalization.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

pub(crate) fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(value: &serde_json::Value) -> ContentDigest {
        sha256_digest(&CanonicalBytes::new(value).unwrap())
    }

    #[test]
    fn test_deterministic() {
        let record = serde_json::json!({"student": "S-100", "degree": "BSc"});
        assert_eq!(digest_of(&record), digest_of(&record));
    }

    #[test]
    fn test_known_vector() {
        // SHA256 of the canonical empty object "{}".
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_hex(&cb),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_one_char_change_is_unrelated() {
        let a = digest_of(&serde_json::json!({"student": "S-100"}));
        let b = digest_of(&serde_json::json!({"student": "S-101"}));
        assert_ne!(a, b);
        // No shared prefix beyond chance: the first 8 bytes differ.
        assert_ne!(a.bytes[..8], b.bytes[..8]);
    }

    #[test]
    fn test_display_and_parse_roundtrip() {
        let d = digest_of(&serde_json::json!({"a": 1}));
        let s = d.to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
        assert_eq!(ContentDigest::parse(&s).unwrap(), d);
    }

    #[test]
    fn test_serde_as_string() {
        let d = digest_of(&serde_json::json!({"a": 1}));
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{d}\""));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ContentDigest::parse("no-tag").is_err());
        assert!(ContentDigest::parse("md5:abcd").is_err());
        assert!(ContentDigest::parse("sha256:abcd").is_err());
        assert!(ContentDigest::parse(&format!("sha256:{}", "zz".repeat(32))).is_err());
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(DigestAlgorithm::Sha256.to_string(), "sha256");
        assert_eq!(DigestAlgorithm::Poseidon2.to_string(), "poseidon2");
    }
}
