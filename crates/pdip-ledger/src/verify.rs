//! # Presentation and Verification
//!
//! The verification attempt: a holder assembles a [`Presentation`] from
//! their private witness, and a verifying party checks it against the
//! ledger. On success the presentation's nullifier is consumed, so the
//! same presentation can never verify twice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pdip_core::{CanonicalBytes, CanonicalizationError, CryptoError};
use pdip_crypto::{
    verify_with_public_key, CertificateHash, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
    Nullifier, StudentWitness,
};
use pdip_zkp::{CommitmentProof, ProofError, ProofStatement, ProofSystem, VerifyError};

use crate::record::CredentialStatus;
use crate::store::{LedgerError, LedgerStore};

/// Errors from building or verifying a presentation.
#[derive(Error, Debug)]
pub enum PresentationError {
    /// No record exists for the presented certificate hash.
    #[error("no credential record for certificate: {0}")]
    RecordNotFound(CertificateHash),

    /// The presented credential was revoked by its issuer.
    #[error("credential revoked: {0}")]
    CredentialRevoked(CertificateHash),

    /// The presented commitment does not match the ledger record.
    #[error("presented commitment does not match the ledger record")]
    CommitmentMismatch,

    /// The presentation's nullifier was consumed by an earlier attempt.
    #[error("nullifier already used")]
    NullifierAlreadyUsed,

    /// The proof did not check out against the statement.
    #[error("proof rejected")]
    ProofRejected,

    /// Proof generation failed on the holder side.
    #[error("proof generation failed: {0}")]
    Prove(#[from] ProofError),

    /// The proof system could not process the statement.
    #[error("proof verification failed: {0}")]
    ProofSystem(#[from] VerifyError),

    /// Signature or randomness failure.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Canonicalization of the statement failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// One verification attempt, assembled by the credential holder.
///
/// Carries the public statement, the proof over it, and the holder's
/// signature binding the statement to their wallet key. The private
/// witness is not part of a presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// The public inputs of this attempt.
    pub statement: ProofStatement,
    /// Proof that the holder knows the record behind the commitment.
    pub proof: CommitmentProof,
    /// The holder's wallet public key.
    pub holder_key: Ed25519PublicKey,
    /// Holder signature over the canonical statement.
    pub signature: Ed25519Signature,
}

impl Presentation {
    /// Build a presentation for an issued credential.
    ///
    /// Recomputes the commitment from the witness, draws a fresh
    /// nullifier, proves the statement, and signs it with the holder's
    /// wallet key. Fails if the random source is unavailable or the
    /// witness does not open the credential's commitment.
    pub fn create<S>(
        witness: &StudentWitness,
        certificate_hash: CertificateHash,
        system: &S,
        wallet: &Ed25519KeyPair,
    ) -> Result<Self, PresentationError>
    where
        S: ProofSystem<Proof = CommitmentProof>,
    {
        let commitment = witness.commitment()?;
        let nullifier = Nullifier::generate()?;
        let statement = ProofStatement {
            certificate_hash,
            commitment,
            nullifier,
        };
        let proof = system.prove(&statement, witness)?;
        let signature = wallet.sign(&CanonicalBytes::new(&statement)?);
        Ok(Self {
            statement,
            proof,
            holder_key: wallet.public_key(),
            signature,
        })
    }
}

/// Verify a presentation against the ledger, consuming its nullifier.
///
/// Checks, in order: the record exists; it has not been revoked; the
/// presented commitment matches the record; the holder signature covers
/// the statement; the proof verifies; and the nullifier is unused. Only
/// when everything holds is the nullifier consumed, so a failed attempt
/// does not burn the holder's token.
pub fn verify_presentation<S>(
    store: &mut LedgerStore,
    presentation: &Presentation,
    system: &S,
) -> Result<(), PresentationError>
where
    S: ProofSystem<Proof = CommitmentProof>,
{
    let statement = &presentation.statement;

    let record = store
        .query(&statement.certificate_hash)
        .ok_or(PresentationError::RecordNotFound(statement.certificate_hash))?;
    if record.status != CredentialStatus::Valid {
        return Err(PresentationError::CredentialRevoked(
            statement.certificate_hash,
        ));
    }
    if record.student_data_commitment != statement.commitment {
        return Err(PresentationError::CommitmentMismatch);
    }

    let canonical = CanonicalBytes::new(statement)?;
    verify_with_public_key(&canonical, &presentation.signature, &presentation.holder_key)?;

    if !system.verify(statement, &presentation.proof)? {
        return Err(PresentationError::ProofRejected);
    }

    // Consuming the nullifier is the last step; a failed attempt above
    // does not burn the holder's token.
    store
        .mark_nullifier_used(statement.nullifier)
        .map_err(|_: LedgerError| PresentationError::NullifierAlreadyUsed)?;

    tracing::info!(
        certificate_hash = %statement.certificate_hash,
        holder = %presentation.holder_key.to_address(),
        "presentation verified"
    );
    Ok(())
}
