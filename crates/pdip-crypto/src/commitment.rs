//! # Commitments and Certificate Hashes
//!
//! The one-way digests at the center of the credential flow:
//!
//! - a **commitment** binds the issuer to a private student record without
//!   revealing it;
//! - **field hashes** fingerprint individual public-ish attributes (degree
//!   type, department) so a verifier can match them without the cleartext;
//! - the **certificate hash** is the public identifier of an issued
//!   credential, derived from issuer, commitment, and issuance time.
//!
//! Each derivation is domain-separated: the digest input is
//! `tag || 0x1f || canonical bytes`. A commitment over some record and a
//! certificate hash over the same bytes can never be equal.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use pdip_core::{
    Address, CanonicalBytes, CanonicalizationError, ContentDigest, DigestAlgorithm, Timestamp,
};

const COMMITMENT_TAG: &str = "pdip/commitment/v1";
const FIELD_TAG: &str = "pdip/field/v1";
const CERTIFICATE_TAG: &str = "pdip/certificate/v1";

/// Compute a domain-separated SHA-256 digest over canonical bytes.
///
/// The tag and a `0x1f` separator are hashed ahead of the payload, so
/// digests from different namespaces are unrelated even for identical
/// payloads. Like `sha256_digest()`, this accepts only `&CanonicalBytes`.
pub fn tagged_digest(tag: &str, data: &CanonicalBytes) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    hasher.update([0x1f]);
    hasher.update(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// The private student record a credential is issued over.
///
/// This is the witness: it stays with the holder and the issuing
/// institution, and only digests of it ever reach the ledger. `Debug`
/// does not print field values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWitness {
    /// Full legal name of the student.
    pub student_name: String,
    /// Institution-local student number.
    pub student_number: String,
    /// Degree type (e.g. "BSc", "MEng").
    pub degree_type: String,
    /// Awarding department.
    pub department: String,
    /// Year of graduation.
    pub graduation_year: i32,
}

impl StudentWitness {
    /// Derive the binding commitment to this record.
    ///
    /// Deterministic: the same witness always commits to the same digest,
    /// which is how a holder later proves knowledge of the record behind
    /// an issued credential.
    pub fn commitment(&self) -> Result<Commitment, CanonicalizationError> {
        let cb = CanonicalBytes::new(self)?;
        Ok(Commitment(tagged_digest(COMMITMENT_TAG, &cb)))
    }

    /// Field hash of the degree type.
    pub fn degree_type_hash(&self) -> Result<ContentDigest, CanonicalizationError> {
        field_hash(&self.degree_type)
    }

    /// Field hash of the awarding department.
    pub fn department_hash(&self) -> Result<ContentDigest, CanonicalizationError> {
        field_hash(&self.department)
    }
}

// Debug must not leak witness fields into logs or panic messages.
impl std::fmt::Debug for StudentWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StudentWitness(<private>)")
    }
}

/// A one-way commitment to a private student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub ContentDigest);

impl Commitment {
    /// Access the underlying content digest.
    pub fn digest(&self) -> &ContentDigest {
        &self.0
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Hash a single public attribute value (degree type, department).
pub fn field_hash(value: &str) -> Result<ContentDigest, CanonicalizationError> {
    let cb = CanonicalBytes::new(&value)?;
    Ok(tagged_digest(FIELD_TAG, &cb))
}

/// The public identifier of an issued credential.
///
/// Derived from issuer address, student-data commitment, and issuance
/// time, so re-issuing the same record by the same issuer at the same
/// instant is detectable as a duplicate, while distinct issuers or times
/// produce distinct identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateHash(pub ContentDigest);

/// Canonical derivation input for a certificate hash.
#[derive(Serialize)]
struct CertificateInput<'a> {
    issuer: &'a Address,
    commitment: &'a Commitment,
    issued_at: &'a Timestamp,
}

impl CertificateHash {
    /// Derive the certificate hash for an issuance.
    pub fn derive(
        issuer: &Address,
        commitment: &Commitment,
        issued_at: &Timestamp,
    ) -> Result<Self, CanonicalizationError> {
        let input = CertificateInput {
            issuer,
            commitment,
            issued_at,
        };
        let cb = CanonicalBytes::new(&input)?;
        Ok(Self(tagged_digest(CERTIFICATE_TAG, &cb)))
    }

    /// Access the underlying content digest.
    pub fn digest(&self) -> &ContentDigest {
        &self.0
    }
}

impl std::fmt::Display for CertificateHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witness() -> StudentWitness {
        StudentWitness {
            student_name: "Ada Lovelace".to_string(),
            student_number: "S-1815".to_string(),
            degree_type: "BSc".to_string(),
            department: "Mathematics".to_string(),
            graduation_year: 2026,
        }
    }

    fn issuer() -> Address {
        Address::from_public_key_bytes(&[11u8; 32])
    }

    #[test]
    fn test_commitment_deterministic() {
        let w = witness();
        assert_eq!(w.commitment().unwrap(), w.commitment().unwrap());
    }

    #[test]
    fn test_commitment_one_char_change_unrelated() {
        let a = witness().commitment().unwrap();
        let mut other = witness();
        other.student_number.push('1');
        let b = other.commitment().unwrap();
        assert_ne!(a, b);
        assert_ne!(a.digest().bytes[..8], b.digest().bytes[..8]);
    }

    #[test]
    fn test_domain_separation() {
        // Identical payload, different tags: unrelated digests.
        let cb = CanonicalBytes::new(&serde_json::json!({"x": 1})).unwrap();
        let a = tagged_digest(COMMITMENT_TAG, &cb);
        let b = tagged_digest(CERTIFICATE_TAG, &cb);
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_hash_matches_across_parties() {
        // Issuer hashes the degree type at issuance; verifier hashes the
        // claimed value independently. The digests must agree.
        let issued = witness().degree_type_hash().unwrap();
        let claimed = field_hash("BSc").unwrap();
        assert_eq!(issued, claimed);
        assert_ne!(issued, field_hash("MSc").unwrap());
    }

    #[test]
    fn test_certificate_hash_varies_by_issuer_and_time() {
        let c = witness().commitment().unwrap();
        let t1 = Timestamp::parse("2026-06-01T09:00:00Z").unwrap();
        let t2 = Timestamp::parse("2026-06-01T09:00:01Z").unwrap();
        let other_issuer = Address::from_public_key_bytes(&[12u8; 32]);

        let base = CertificateHash::derive(&issuer(), &c, &t1).unwrap();
        assert_eq!(CertificateHash::derive(&issuer(), &c, &t1).unwrap(), base);
        assert_ne!(CertificateHash::derive(&issuer(), &c, &t2).unwrap(), base);
        assert_ne!(
            CertificateHash::derive(&other_issuer, &c, &t1).unwrap(),
            base
        );
    }

    #[test]
    fn test_certificate_hash_serde_as_string() {
        let c = witness().commitment().unwrap();
        let t = Timestamp::parse("2026-06-01T09:00:00Z").unwrap();
        let h = CertificateHash::derive(&issuer(), &c, &t).unwrap();
        let json = serde_json::to_string(&h).unwrap();
        assert!(json.starts_with("\"sha256:"));
        let back: CertificateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn test_witness_debug_does_not_leak() {
        let debug = format!("{:?}", witness());
        assert_eq!(debug, "StudentWitness(<private>)");
        assert!(!debug.contains("Ada"));
    }
}
