//! # Pluggable Persistence
//!
//! The ledger persists as one serialized snapshot under a single key, the
//! same layout the browser front end keeps in local storage. The backend
//! is a trait: an in-memory map for tests and a file-per-key store for a
//! real deployment, with room for a database implementation behind the
//! same interface.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pdip_crypto::Nullifier;

use crate::record::CredentialRecord;
use crate::session::WalletSession;
use crate::store::LedgerStore;

/// The single key the ledger snapshot is stored under.
pub const STATE_KEY: &str = "privatediploma-ledger";

/// Errors from persistence operations.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A key-value persistence backend.
///
/// Implementations store opaque bytes under string keys. The ledger uses
/// exactly one key ([`STATE_KEY`]), but the interface is keyed so other
/// state can share a backend.
pub trait StateStore {
    /// Read the bytes stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;

    /// Write `bytes` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistError>;

    /// Delete the value under `key`. Deleting an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStateStore {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Filesystem backend: one JSON file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    root: PathBuf,
}

impl FileStateStore {
    /// Create a backend rooted at the given directory.
    ///
    /// The directory is created lazily on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this backend.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StateStore for FileStateStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.path_for(key), bytes)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The serialized form of the full ledger state.
///
/// Credentials and nullifiers are sorted on capture so the same logical
/// state always snapshots to the same bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Every issued credential record.
    pub credentials: Vec<CredentialRecord>,
    /// Every consumed nullifier.
    pub used_nullifiers: Vec<Nullifier>,
    /// The wallet session at capture time, if connected.
    pub session: Option<WalletSession>,
}

impl LedgerStore {
    /// Capture the full store state as a snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut credentials: Vec<CredentialRecord> = self.credentials().values().cloned().collect();
        credentials.sort_by_key(|r| r.certificate_hash.digest().bytes);
        let mut used_nullifiers: Vec<Nullifier> = self.used_nullifiers().iter().copied().collect();
        used_nullifiers.sort_by_key(|n| *n.as_bytes());
        LedgerSnapshot {
            credentials,
            used_nullifiers,
            session: self.session().cloned(),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let credentials = snapshot
            .credentials
            .into_iter()
            .map(|r| (r.certificate_hash, r))
            .collect();
        let used_nullifiers = snapshot.used_nullifiers.into_iter().collect();
        Self::from_parts(credentials, used_nullifiers, snapshot.session)
    }

    /// Serialize the store and write it under [`STATE_KEY`].
    pub fn persist(&self, backend: &mut dyn StateStore) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec(&self.snapshot())?;
        backend.save(STATE_KEY, &bytes)?;
        tracing::debug!(
            credentials = self.credential_count(),
            bytes = bytes.len(),
            "ledger state persisted"
        );
        Ok(())
    }

    /// Load the store persisted under [`STATE_KEY`], if present.
    pub fn restore(backend: &dyn StateStore) -> Result<Option<Self>, PersistError> {
        let Some(bytes) = backend.load(STATE_KEY)? else {
            return Ok(None);
        };
        let snapshot: LedgerSnapshot = serde_json::from_slice(&bytes)?;
        Ok(Some(Self::from_snapshot(snapshot)))
    }
}
