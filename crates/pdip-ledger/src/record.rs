//! # Credential Records
//!
//! The ledger entry created at issuance. A record carries only digests of
//! the private student data; the witness itself never reaches the ledger.

use serde::{Deserialize, Serialize};

use pdip_core::{Address, CanonicalizationError, ContentDigest, Timestamp};
use pdip_crypto::{CertificateHash, Commitment, StudentWitness};

/// Lifecycle status of an issued credential.
///
/// VALID → REVOKED is the only transition, performed by the original
/// issuer. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialStatus {
    /// The credential is in good standing.
    Valid,
    /// The credential was revoked by its issuer.
    Revoked,
}

impl CredentialStatus {
    /// Whether the credential is in good standing.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Valid => "VALID",
            Self::Revoked => "REVOKED",
        };
        f.write_str(s)
    }
}

/// One issued credential as recorded on the ledger.
///
/// Keyed uniquely and immutably by `certificate_hash`. Only `status` ever
/// changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Public identifier of this credential.
    pub certificate_hash: CertificateHash,
    /// One-way commitment to the private student record.
    pub student_data_commitment: Commitment,
    /// Address of the issuing institution.
    pub issuer: Address,
    /// Field hash of the degree type.
    pub degree_type_hash: ContentDigest,
    /// Field hash of the awarding department.
    pub department_hash: ContentDigest,
    /// When the credential was issued.
    pub issued_at: Timestamp,
    /// Current lifecycle status.
    pub status: CredentialStatus,
}

impl CredentialRecord {
    /// Derive a fresh record from the private witness.
    ///
    /// Computes the commitment, the field hashes, and the certificate
    /// hash, and assembles a record with status [`CredentialStatus::Valid`].
    /// The witness is read, digested, and dropped; none of its fields land
    /// in the record.
    pub fn derive(
        issuer: Address,
        witness: &StudentWitness,
        issued_at: Timestamp,
    ) -> Result<Self, CanonicalizationError> {
        let commitment = witness.commitment()?;
        let certificate_hash = CertificateHash::derive(&issuer, &commitment, &issued_at)?;
        Ok(Self {
            certificate_hash,
            student_data_commitment: commitment,
            issuer,
            degree_type_hash: witness.degree_type_hash()?,
            department_hash: witness.department_hash()?,
            issued_at,
            status: CredentialStatus::Valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witness() -> StudentWitness {
        StudentWitness {
            student_name: "Alan Turing".to_string(),
            student_number: "S-1912".to_string(),
            degree_type: "PhD".to_string(),
            department: "Mathematics".to_string(),
            graduation_year: 2026,
        }
    }

    fn issuer() -> Address {
        Address::from_public_key_bytes(&[21u8; 32])
    }

    #[test]
    fn test_derive_produces_valid_record() {
        let w = witness();
        let ts = Timestamp::parse("2026-06-15T10:00:00Z").unwrap();
        let record = CredentialRecord::derive(issuer(), &w, ts).unwrap();

        assert_eq!(record.status, CredentialStatus::Valid);
        assert!(record.status.is_valid());
        assert_eq!(record.student_data_commitment, w.commitment().unwrap());
        assert_eq!(
            record.certificate_hash,
            CertificateHash::derive(&issuer(), &record.student_data_commitment, &ts).unwrap()
        );
    }

    #[test]
    fn test_record_contains_no_witness_cleartext() {
        let w = witness();
        let ts = Timestamp::parse("2026-06-15T10:00:00Z").unwrap();
        let record = CredentialRecord::derive(issuer(), &w, ts).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("Alan"));
        assert!(!json.contains("S-1912"));
        assert!(!json.contains("Mathematics"));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let ts = Timestamp::parse("2026-06-15T10:00:00Z").unwrap();
        let record = CredentialRecord::derive(issuer(), &witness(), ts).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: CredentialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CredentialStatus::Valid.to_string(), "VALID");
        assert_eq!(CredentialStatus::Revoked.to_string(), "REVOKED");
    }
}
