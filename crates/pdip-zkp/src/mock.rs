//! # Transparent Commitment Proofs
//!
//! The deterministic, transparent proof implementation: a proof is the
//! domain-separated SHA-256 digest of the canonical statement, emitted
//! only after the prover has checked that the witness actually opens the
//! statement's commitment.
//!
//! ## Security Notice
//!
//! This provides NO zero-knowledge privacy. Anyone holding a statement
//! can recompute its proof digest; what the scheme enforces is that the
//! statement's commitment binds the issuer to the private record, and
//! that the nullifier makes each presentation single-use. A real proving
//! system would replace this implementation behind [`ProofSystem`].

use serde::{Deserialize, Serialize};

use pdip_core::{CanonicalBytes, ContentDigest};
use pdip_crypto::{tagged_digest, StudentWitness};

use crate::traits::{ProofError, ProofStatement, ProofSystem, VerifyError};

const PROOF_TAG: &str = "pdip/proof/v1";

/// A transparent proof: the tagged digest of the canonical statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentProof {
    /// The proof digest.
    pub digest: ContentDigest,
}

/// The transparent, deterministic proof system.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitmentProofSystem;

impl CommitmentProofSystem {
    fn statement_digest(statement: &ProofStatement) -> Result<ContentDigest, pdip_core::CanonicalizationError> {
        let cb = CanonicalBytes::new(statement)?;
        Ok(tagged_digest(PROOF_TAG, &cb))
    }
}

impl ProofSystem for CommitmentProofSystem {
    type Proof = CommitmentProof;

    /// Prove knowledge of the record behind the statement's commitment.
    ///
    /// Fails with [`ProofError::WitnessMismatch`] if the witness does not
    /// open the commitment; a holder cannot produce a proof for a
    /// credential whose private record they do not actually hold.
    fn prove(
        &self,
        statement: &ProofStatement,
        witness: &StudentWitness,
    ) -> Result<Self::Proof, ProofError> {
        let derived = witness.commitment()?;
        if derived != statement.commitment {
            return Err(ProofError::WitnessMismatch);
        }
        let digest = Self::statement_digest(statement)?;
        Ok(CommitmentProof { digest })
    }

    /// Recompute the statement digest and compare.
    fn verify(
        &self,
        statement: &ProofStatement,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError> {
        let expected = Self::statement_digest(statement)?;
        Ok(expected == proof.digest)
    }
}
