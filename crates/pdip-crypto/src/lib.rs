//! # pdip-crypto — Cryptographic Primitives for PrivateDiploma
//!
//! Commitment derivation over canonical student records, single-use
//! nullifier generation, and the Ed25519 signing capability the wallet
//! provider exposes.
//!
//! All hashing and signing input is `&CanonicalBytes` from `pdip-core`;
//! there is no raw-byte entry point. Every derivation is domain-separated
//! by a tag, so a commitment can never collide with a certificate hash or
//! a proof digest computed over the same record.

pub mod commitment;
pub mod ed25519;
pub mod nullifier;

pub use commitment::{
    field_hash, tagged_digest, CertificateHash, Commitment, StudentWitness,
};
pub use ed25519::{verify, verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use nullifier::Nullifier;
