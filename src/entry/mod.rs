// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Config entries: what the host persists for each configured device.
//!
//! A [`ConfigEntry`] wraps the user's [`CredentialRecord`] with the host's
//! bookkeeping: a generated [`EntryId`], the unique id (the device id) and the
//! display title. Entries are created by the [config flow](crate::config_flow)
//! and read once per activation by the [integration](crate::integration).

mod credentials;
mod entry_id;
mod local_key;
mod store;

pub use credentials::CredentialRecord;
pub use entry_id::EntryId;
pub use local_key::LocalKey;
pub use store::{ConfigEntryStore, MemoryEntryStore};

use serde::{Deserialize, Serialize};

/// Current schema version of the entry data.
pub const ENTRY_VERSION: u32 = 1;

/// One configured device as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Host-assigned identifier.
    pub entry_id: EntryId,
    /// Uniqueness token; equal to the device id.
    pub unique_id: String,
    /// Display title; equal to the user-supplied name.
    pub title: String,
    /// Schema version of `data`.
    pub version: u32,
    /// Connection credentials.
    pub data: CredentialRecord,
}

impl ConfigEntry {
    /// Creates an entry for the given credentials with a fresh id.
    #[must_use]
    pub fn new(data: CredentialRecord) -> Self {
        Self {
            entry_id: EntryId::new(),
            unique_id: data.device_id.clone(),
            title: data.name.clone(),
            version: ENTRY_VERSION,
            data,
        }
    }
}
