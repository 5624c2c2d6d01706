//! # pdip-core — Foundational Types for PrivateDiploma
//!
//! The leaf crate of the PrivateDiploma workspace. It defines the primitives
//! every other crate builds on: canonical byte production, content digests,
//! wallet addresses, session identifiers, and UTC-only timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` ever feeds a
//!    hash. Two parties canonicalizing the same student record always
//!    produce the same bytes, so commitments can be recomputed and checked.
//!
//! 2. **Newtype wrappers for domain primitives.** `Address` and `SessionId`
//!    have validated constructors. No bare strings for identifiers.
//!
//! 3. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every digest path flows through canonicalization.
//!
//! 4. **UTC-only timestamps.** `Timestamp` enforces the Z suffix and
//!    seconds precision, and serializes to exactly that form.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pdip-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, CryptoError, IdentityError, TimestampError};
pub use identity::{Address, SessionId};
pub use temporal::Timestamp;
