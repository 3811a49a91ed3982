// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable credential slots.
//!
//! The client persists its access and refresh tokens under fixed key names
//! so a restarted process can pick the session back up.

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// A named credential slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSlot {
    Access,
    Refresh,
}

impl TokenSlot {
    pub const ALL: [TokenSlot; 2] = [TokenSlot::Access, TokenSlot::Refresh];

    /// Fixed key name the slot is stored under.
    pub const fn key(self) -> &'static str {
        match self {
            TokenSlot::Access => "access_token",
            TokenSlot::Refresh => "refresh_token",
        }
    }
}

/// Key-value storage for the credential slots.
pub trait TokenStore: Send + Sync {
    fn get(&self, slot: TokenSlot) -> Result<Option<String>, StoreError>;
    fn set(&self, slot: TokenSlot, value: &str) -> Result<(), StoreError>;
    /// Removing an empty slot is not an error.
    fn remove(&self, slot: TokenSlot) -> Result<(), StoreError>;
    /// Whether values outlive the process.
    fn is_persistent(&self) -> bool;
}

/// Token store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt token file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize tokens: {0}")]
    Serialize(#[from] serde_json::Error),
}
