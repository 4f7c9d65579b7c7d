// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Config entry storage.
//!
//! The host owns persistence; [`ConfigEntryStore`] is the narrow view of it
//! the config flow needs. [`MemoryEntryStore`] keeps entries in process and
//! is what hosts without their own storage (and the tests) use.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Error, Result};

use super::{ConfigEntry, EntryId};

/// Host-side storage of config entries.
pub trait ConfigEntryStore: Send + Sync {
    /// Returns the entry with the given id.
    fn get(&self, entry_id: EntryId) -> Option<ConfigEntry>;

    /// Returns the entry owning the given unique id, if any.
    fn find_by_unique_id(&self, unique_id: &str) -> Option<ConfigEntry>;

    /// Stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateDevice` if an entry with the same unique id
    /// already exists.
    fn insert(&self, entry: ConfigEntry) -> Result<()>;

    /// Removes an entry, returning it if it existed.
    fn remove(&self, entry_id: EntryId) -> Option<ConfigEntry>;

    /// Returns all stored entries.
    fn entries(&self) -> Vec<ConfigEntry>;
}

/// In-process [`ConfigEntryStore`].
///
/// # Examples
///
/// ```
/// use grid_connect::entry::{ConfigEntry, ConfigEntryStore, CredentialRecord, MemoryEntryStore};
///
/// let store = MemoryEntryStore::new();
/// let entry = ConfigEntry::new(CredentialRecord::new("Plug", "10.0.0.2", "bf01", "key"));
/// store.insert(entry.clone()).unwrap();
///
/// assert_eq!(store.find_by_unique_id("bf01"), Some(entry.clone()));
/// assert!(store.insert(entry).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: RwLock<HashMap<EntryId, ConfigEntry>>,
}

impl MemoryEntryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ConfigEntryStore for MemoryEntryStore {
    fn get(&self, entry_id: EntryId) -> Option<ConfigEntry> {
        self.entries.read().get(&entry_id).cloned()
    }

    fn find_by_unique_id(&self, unique_id: &str) -> Option<ConfigEntry> {
        self.entries
            .read()
            .values()
            .find(|entry| entry.unique_id == unique_id)
            .cloned()
    }

    fn insert(&self, entry: ConfigEntry) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.values().any(|e| e.unique_id == entry.unique_id) {
            return Err(Error::DuplicateDevice {
                device_id: entry.unique_id,
            });
        }
        tracing::debug!(entry_id = %entry.entry_id, unique_id = %entry.unique_id, "Storing config entry");
        entries.insert(entry.entry_id, entry);
        Ok(())
    }

    fn remove(&self, entry_id: EntryId) -> Option<ConfigEntry> {
        self.entries.write().remove(&entry_id)
    }

    fn entries(&self) -> Vec<ConfigEntry> {
        self.entries.read().values().cloned().collect()
    }
}
