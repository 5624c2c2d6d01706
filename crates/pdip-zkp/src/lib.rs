//! # pdip-zkp — Proof Layer for PrivateDiploma
//!
//! "Proof" in this system means a hash commitment plus a random nullifier,
//! not a succinct zero-knowledge argument. The [`ProofSystem`] trait keeps
//! that honest: the transparent [`CommitmentProofSystem`] satisfies it
//! today, and a real proving system would slot in behind the same
//! interface without touching the ledger or verification flow.

pub mod mock;
pub mod traits;

pub use mock::{CommitmentProof, CommitmentProofSystem};
pub use traits::{ProofError, ProofStatement, ProofSystem, VerifyError};
