//! # Proof System Trait
//!
//! The abstract interface every proof implementation satisfies. Proving
//! and verifying are pure functions over a public statement and (for the
//! prover) the private witness; the `Send + Sync` bound allows safe
//! concurrent use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pdip_crypto::{CertificateHash, Commitment, Nullifier, StudentWitness};

/// The public inputs of one verification attempt.
///
/// Everything a verifier sees: which credential is being presented, the
/// commitment it should open to, and the single-use nullifier consumed by
/// this attempt. The private witness never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStatement {
    /// Public identifier of the presented credential.
    pub certificate_hash: CertificateHash,
    /// The student-data commitment the witness must open.
    pub commitment: Commitment,
    /// Fresh single-use token for this attempt.
    pub nullifier: Nullifier,
}

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The supplied witness does not open the commitment in the statement.
    #[error("witness does not open the committed value")]
    WitnessMismatch,

    /// Canonicalization of the statement or witness failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] pdip_core::CanonicalizationError),
}

/// Error during proof verification.
///
/// A well-formed proof that simply does not check out is NOT an error;
/// `verify` returns `Ok(false)` for that. Errors are reserved for inputs
/// that could not be processed at all.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Canonicalization of the statement failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] pdip_core::CanonicalizationError),
}

/// Abstract interface for a proof system over credential statements.
///
/// Implementations are interchangeable at compile time: the ledger's
/// verification flow is generic over this trait.
pub trait ProofSystem: Send + Sync {
    /// The proof type produced by this system.
    type Proof: Clone + Send + Sync;

    /// Generate a proof that the witness opens the statement's commitment.
    fn prove(
        &self,
        statement: &ProofStatement,
        witness: &StudentWitness,
    ) -> Result<Self::Proof, ProofError>;

    /// Verify a proof against a statement.
    fn verify(
        &self,
        statement: &ProofStatement,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError>;
}
