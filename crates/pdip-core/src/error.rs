//! # Error Types
//!
//! Structured error enums shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Failures are loud and terminal for the operation that raised them.
//! Nothing in this workspace retries automatically; callers decide whether
//! to restart an operation.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Grade points and scores must be strings or scaled integers, since
    /// float serialization has non-deterministic edge cases across
    /// implementations.
    #[error("float values are not permitted in canonical representations; use string or scaled integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The operating system's secure random source could not be read.
    /// Generation fails rather than falling back to a weak generator.
    #[error("secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Digest parsing or computation failed.
    #[error("digest error: {0}")]
    DigestError(String),
}

/// Error validating a domain identifier.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The wallet address is not `0x` followed by 40 lowercase hex chars.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Error parsing or constructing a timestamp.
#[derive(Error, Debug)]
pub enum TimestampError {
    /// Only the `Z` suffix is accepted; explicit offsets are rejected,
    /// even `+00:00`.
    #[error("timestamp must use the Z suffix (UTC only), got {0:?}")]
    NonUtc(String),

    /// The string is not valid RFC 3339.
    #[error("invalid RFC 3339 timestamp {input:?}: {source}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// The underlying parse failure.
        source: chrono::ParseError,
    },

    /// The Unix epoch value does not map to a representable instant.
    #[error("unix timestamp out of range: {0}")]
    OutOfRange(i64),
}
