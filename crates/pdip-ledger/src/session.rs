//! # Wallet Sessions
//!
//! The ephemeral connection to a wallet provider. A session is created on
//! connect and cleared on disconnect; the ledger snapshot carries the last
//! session only so a reloaded process can resume where it left off.

use serde::{Deserialize, Serialize};

use pdip_core::{Address, SessionId, Timestamp};
use pdip_crypto::Ed25519PublicKey;

/// One wallet connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSession {
    /// The wallet's address, derived from its public key.
    pub address: Address,
    /// The wallet's public key.
    pub public_key: Ed25519PublicKey,
    /// Identifier of this connection.
    pub session_id: SessionId,
    /// When the connection was established.
    pub connected_at: Timestamp,
}

impl WalletSession {
    /// Open a session for the wallet behind the given public key.
    ///
    /// Mints a fresh [`SessionId`] and stamps the connection time; the
    /// address is derived from the key, so it cannot disagree with it.
    pub fn open(public_key: Ed25519PublicKey) -> Self {
        Self {
            address: public_key.to_address(),
            public_key,
            session_id: SessionId::new(),
            connected_at: Timestamp::now(),
        }
    }
}
