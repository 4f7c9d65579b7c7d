// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entry-to-handle registry.

use std::collections::HashMap;

use crate::client::DeviceHandle;
use crate::entry::EntryId;

/// Live device handles keyed by config entry.
///
/// Owned by the [`Integration`](super::Integration) and mutated through
/// `&mut self` only. Holds at most one handle per entry.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    handles: HashMap<EntryId, DeviceHandle>,
}

impl HandleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle, returning the one it replaced.
    pub fn insert(&mut self, entry_id: EntryId, handle: DeviceHandle) -> Option<DeviceHandle> {
        self.handles.insert(entry_id, handle)
    }

    /// Removes and returns the handle for an entry.
    pub fn remove(&mut self, entry_id: EntryId) -> Option<DeviceHandle> {
        self.handles.remove(&entry_id)
    }

    /// Returns the handle for an entry.
    #[must_use]
    pub fn get(&self, entry_id: EntryId) -> Option<&DeviceHandle> {
        self.handles.get(&entry_id)
    }

    /// Returns true if the entry has a handle.
    #[must_use]
    pub fn contains(&self, entry_id: EntryId) -> bool {
        self.handles.contains_key(&entry_id)
    }

    /// Returns the ids of all entries with a handle.
    #[must_use]
    pub fn entry_ids(&self) -> Vec<EntryId> {
        self.handles.keys().copied().collect()
    }

    /// Returns the number of registered handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if no handle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
