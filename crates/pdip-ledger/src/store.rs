//! # Ledger State Store
//!
//! The in-memory table of issued credentials, the consumed-nullifier set,
//! and the current wallet session.
//!
//! One logical actor owns and mutates a `LedgerStore`; all operations are
//! synchronous single mutations through `&mut self`, so no partial state
//! is observable. Records are keyed by certificate hash and indexed
//! secondarily by issuer on query.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use pdip_core::Address;
use pdip_crypto::{CertificateHash, Nullifier};

use crate::record::{CredentialRecord, CredentialStatus};
use crate::session::WalletSession;

/// Errors from ledger store operations.
///
/// All are terminal for the operation that raised them; nothing retries.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A record with this certificate hash already exists.
    #[error("certificate already issued: {0}")]
    DuplicateCertificate(CertificateHash),

    /// No record exists for this certificate hash.
    #[error("no credential record for certificate: {0}")]
    RecordNotFound(CertificateHash),

    /// The requester is not the issuer that created the record.
    #[error("revocation of {certificate_hash} denied for {requester}: not the issuer")]
    UnauthorizedRevoke {
        /// The targeted credential.
        certificate_hash: CertificateHash,
        /// The address that attempted the revocation.
        requester: Address,
    },

    /// The nullifier was already consumed by an earlier verification.
    #[error("nullifier already used")]
    NullifierAlreadyUsed,
}

/// The ledger state: credentials, consumed nullifiers, wallet session.
#[derive(Debug, Default, Clone)]
pub struct LedgerStore {
    credentials: HashMap<CertificateHash, CredentialRecord>,
    used_nullifiers: HashSet<Nullifier>,
    session: Option<WalletSession>,
}

impl LedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly issued credential.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateCertificate`] if a record with the
    /// same certificate hash already exists. The existing record is left
    /// untouched; certificate hashes are immutable once issued.
    pub fn issue(&mut self, record: CredentialRecord) -> Result<(), LedgerError> {
        if self.credentials.contains_key(&record.certificate_hash) {
            return Err(LedgerError::DuplicateCertificate(record.certificate_hash));
        }
        tracing::info!(
            certificate_hash = %record.certificate_hash,
            issuer = %record.issuer,
            "credential issued"
        );
        self.credentials.insert(record.certificate_hash, record);
        Ok(())
    }

    /// Revoke a credential.
    ///
    /// Only the address that issued the record may revoke it. Repeating
    /// the call for an already revoked record is a no-op for the issuer:
    /// revocation is idempotent.
    ///
    /// # Errors
    ///
    /// [`LedgerError::RecordNotFound`] if no record exists,
    /// [`LedgerError::UnauthorizedRevoke`] if `requester` is not the
    /// original issuer.
    pub fn revoke(
        &mut self,
        certificate_hash: &CertificateHash,
        requester: &Address,
    ) -> Result<(), LedgerError> {
        let record = self
            .credentials
            .get_mut(certificate_hash)
            .ok_or(LedgerError::RecordNotFound(*certificate_hash))?;
        if &record.issuer != requester {
            return Err(LedgerError::UnauthorizedRevoke {
                certificate_hash: *certificate_hash,
                requester: requester.clone(),
            });
        }
        if record.status == CredentialStatus::Revoked {
            return Ok(());
        }
        record.status = CredentialStatus::Revoked;
        tracing::info!(certificate_hash = %certificate_hash, "credential revoked");
        Ok(())
    }

    /// Look up a record by certificate hash.
    pub fn query(&self, certificate_hash: &CertificateHash) -> Option<&CredentialRecord> {
        self.credentials.get(certificate_hash)
    }

    /// All records created by the given issuer. Order is not significant.
    pub fn query_by_issuer(&self, issuer: &Address) -> Vec<&CredentialRecord> {
        self.credentials
            .values()
            .filter(|r| &r.issuer == issuer)
            .collect()
    }

    /// Whether a nullifier has been consumed.
    pub fn is_nullifier_used(&self, nullifier: &Nullifier) -> bool {
        self.used_nullifiers.contains(nullifier)
    }

    /// Consume a nullifier.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NullifierAlreadyUsed`] if it was consumed
    /// before. A consumed nullifier never leaves the set.
    pub fn mark_nullifier_used(&mut self, nullifier: Nullifier) -> Result<(), LedgerError> {
        if !self.used_nullifiers.insert(nullifier) {
            return Err(LedgerError::NullifierAlreadyUsed);
        }
        tracing::debug!(nullifier = %nullifier, "nullifier consumed");
        Ok(())
    }

    /// Attach the current wallet session, replacing any previous one.
    pub fn connect_session(&mut self, session: WalletSession) {
        tracing::debug!(address = %session.address, session_id = %session.session_id, "wallet connected");
        self.session = Some(session);
    }

    /// Clear and return the current wallet session.
    pub fn disconnect_session(&mut self) -> Option<WalletSession> {
        if let Some(ref s) = self.session {
            tracing::debug!(address = %s.address, "wallet disconnected");
        }
        self.session.take()
    }

    /// The current wallet session, if connected.
    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    /// Number of issued credentials.
    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    pub(crate) fn credentials(&self) -> &HashMap<CertificateHash, CredentialRecord> {
        &self.credentials
    }

    pub(crate) fn used_nullifiers(&self) -> &HashSet<Nullifier> {
        &self.used_nullifiers
    }

    pub(crate) fn from_parts(
        credentials: HashMap<CertificateHash, CredentialRecord>,
        used_nullifiers: HashSet<Nullifier>,
        session: Option<WalletSession>,
    ) -> Self {
        Self {
            credentials,
            used_nullifiers,
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdip_core::Timestamp;
    use pdip_crypto::StudentWitness;

    fn witness(number: &str) -> StudentWitness {
        StudentWitness {
            student_name: "Emmy Noether".to_string(),
            student_number: number.to_string(),
            degree_type: "MSc".to_string(),
            department: "Physics".to_string(),
            graduation_year: 2025,
        }
    }

    fn issuer() -> Address {
        Address::from_public_key_bytes(&[31u8; 32])
    }

    fn record(number: &str) -> CredentialRecord {
        let ts = Timestamp::parse("2026-05-01T12:00:00Z").unwrap();
        CredentialRecord::derive(issuer(), &witness(number), ts).unwrap()
    }

    #[test]
    fn test_issue_then_query_is_valid() {
        let mut store = LedgerStore::new();
        let r = record("S-1");
        let hash = r.certificate_hash;
        store.issue(r).unwrap();

        let found = store.query(&hash).expect("record should exist");
        assert_eq!(found.status, CredentialStatus::Valid);
    }

    #[test]
    fn test_query_absent_returns_none() {
        let store = LedgerStore::new();
        assert!(store.query(&record("S-1").certificate_hash).is_none());
    }

    #[test]
    fn test_reissue_fails_with_duplicate() {
        let mut store = LedgerStore::new();
        let r = record("S-1");
        store.issue(r.clone()).unwrap();
        match store.issue(r) {
            Err(LedgerError::DuplicateCertificate(_)) => {}
            other => panic!("expected DuplicateCertificate, got {other:?}"),
        }
        assert_eq!(store.credential_count(), 1);
    }

    #[test]
    fn test_revoke_by_wrong_address_denied() {
        let mut store = LedgerStore::new();
        let r = record("S-1");
        let hash = r.certificate_hash;
        store.issue(r).unwrap();

        let stranger = Address::from_public_key_bytes(&[99u8; 32]);
        match store.revoke(&hash, &stranger) {
            Err(LedgerError::UnauthorizedRevoke { .. }) => {}
            other => panic!("expected UnauthorizedRevoke, got {other:?}"),
        }
        // Status untouched.
        assert_eq!(store.query(&hash).unwrap().status, CredentialStatus::Valid);
    }

    #[test]
    fn test_revoke_by_issuer_flips_status_and_is_idempotent() {
        let mut store = LedgerStore::new();
        let r = record("S-1");
        let hash = r.certificate_hash;
        store.issue(r).unwrap();

        store.revoke(&hash, &issuer()).unwrap();
        assert_eq!(store.query(&hash).unwrap().status, CredentialStatus::Revoked);

        // Second revocation by the issuer succeeds without change.
        store.revoke(&hash, &issuer()).unwrap();
        assert_eq!(store.query(&hash).unwrap().status, CredentialStatus::Revoked);
    }

    #[test]
    fn test_revoke_absent_record() {
        let mut store = LedgerStore::new();
        match store.revoke(&record("S-1").certificate_hash, &issuer()) {
            Err(LedgerError::RecordNotFound(_)) => {}
            other => panic!("expected RecordNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_query_by_issuer() {
        let mut store = LedgerStore::new();
        store.issue(record("S-1")).unwrap();
        store.issue(record("S-2")).unwrap();

        let other = Address::from_public_key_bytes(&[77u8; 32]);
        let ts = Timestamp::parse("2026-05-01T12:00:00Z").unwrap();
        store
            .issue(CredentialRecord::derive(other.clone(), &witness("S-3"), ts).unwrap())
            .unwrap();

        assert_eq!(store.query_by_issuer(&issuer()).len(), 2);
        assert_eq!(store.query_by_issuer(&other).len(), 1);
        let nobody = Address::from_public_key_bytes(&[78u8; 32]);
        assert!(store.query_by_issuer(&nobody).is_empty());
    }

    #[test]
    fn test_nullifier_single_use() {
        let mut store = LedgerStore::new();
        let n = Nullifier::from_bytes([1u8; 32]);
        assert!(!store.is_nullifier_used(&n));

        store.mark_nullifier_used(n).unwrap();
        assert!(store.is_nullifier_used(&n));

        match store.mark_nullifier_used(n) {
            Err(LedgerError::NullifierAlreadyUsed) => {}
            other => panic!("expected NullifierAlreadyUsed, got {other:?}"),
        }
    }

    #[test]
    fn test_session_lifecycle() {
        use crate::session::WalletSession;
        use pdip_crypto::Ed25519KeyPair;

        let mut store = LedgerStore::new();
        assert!(store.session().is_none());

        let kp = Ed25519KeyPair::from_seed(&[4u8; 32]);
        store.connect_session(WalletSession::open(kp.public_key()));
        assert_eq!(store.session().unwrap().address, kp.address());

        let closed = store.disconnect_session().unwrap();
        assert_eq!(closed.address, kp.address());
        assert!(store.session().is_none());
        assert!(store.disconnect_session().is_none());
    }
}
