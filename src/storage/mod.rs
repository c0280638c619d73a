// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted credential storage.
//!
//! The session store is the only writer. Token and user record always move
//! together through [`CredentialStore::set_all`] / [`CredentialStore::delete_all`],
//! and implementations make those a single critical section so a reader never
//! sees one key without the other.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage key names as constants.
pub mod keys {
    /// Bearer token
    pub const TOKEN: &str = "niyofit_auth_token";
    /// JSON copy of the last known user
    pub const USER: &str = "niyofit_user_data";
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Key-value port over whatever survives a restart.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Write several keys as one unit.
    ///
    /// The default writes them one by one; stores that can be observed
    /// concurrently override it.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove several keys as one unit.
    fn delete_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }
}
