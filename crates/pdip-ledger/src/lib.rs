//! # pdip-ledger — Credential Ledger for PrivateDiploma
//!
//! The simulated ledger state: issued credential records keyed by
//! certificate hash, the consumed-nullifier set, and the current wallet
//! session, together with the presentation flow a verifying party runs.
//!
//! ## Design
//!
//! - [`LedgerStore`] is an explicit value owned by the caller. There is no
//!   global singleton; consumers receive `&mut LedgerStore`.
//! - Single-writer: mutation is synchronous through `&mut self`. No
//!   locking, no transactions. One logical actor mutates the store.
//! - Records are never deleted. Revocation flips status; the consumed
//!   nullifier set only grows.
//! - Persistence is pluggable through the [`StateStore`] trait: the whole
//!   store round-trips as one serialized snapshot under a single key.

pub mod persist;
pub mod record;
pub mod session;
pub mod store;
pub mod verify;

pub use persist::{
    FileStateStore, LedgerSnapshot, MemoryStateStore, PersistError, StateStore, STATE_KEY,
};
pub use record::{CredentialRecord, CredentialStatus};
pub use session::WalletSession;
pub use store::{LedgerError, LedgerStore};
pub use verify::{verify_presentation, Presentation, PresentationError};
