// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity event types.

use serde::Serialize;

use crate::entity::EntityState;
use crate::entry::EntryId;

/// Events emitted by entities and the lifecycle manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EntityEvent {
    /// An entity wrote new state (after a command or a poll).
    StateWritten {
        /// The config entry the entity belongs to.
        entry_id: EntryId,
        /// The entity's unique id.
        unique_id: String,
        /// The state that was written.
        state: EntityState,
    },

    /// An entry was activated and its entities handed to the host.
    EntryActivated {
        /// The activated entry.
        entry_id: EntryId,
    },

    /// An entry was fully deactivated and its handle released.
    EntryDeactivated {
        /// The deactivated entry.
        entry_id: EntryId,
    },
}

impl EntityEvent {
    /// Creates a state-written event.
    #[must_use]
    pub fn state_written(
        entry_id: EntryId,
        unique_id: impl Into<String>,
        state: EntityState,
    ) -> Self {
        Self::StateWritten {
            entry_id,
            unique_id: unique_id.into(),
            state,
        }
    }

    /// Returns the entry this event concerns.
    #[must_use]
    pub fn entry_id(&self) -> EntryId {
        match self {
            Self::StateWritten { entry_id, .. }
            | Self::EntryActivated { entry_id }
            | Self::EntryDeactivated { entry_id } => *entry_id,
        }
    }

    /// Returns the entity unique id for state events.
    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        match self {
            Self::StateWritten { unique_id, .. } => Some(unique_id),
            Self::EntryActivated { .. } | Self::EntryDeactivated { .. } => None,
        }
    }

    /// Returns `true` if this is an entry lifecycle event.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::EntryActivated { .. } | Self::EntryDeactivated { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_extraction() {
        let id = EntryId::new();

        assert_eq!(EntityEvent::EntryActivated { entry_id: id }.entry_id(), id);
        assert_eq!(EntityEvent::EntryDeactivated { entry_id: id }.entry_id(), id);
        assert_eq!(
            EntityEvent::state_written(id, "bf01_1", EntityState::default()).entry_id(),
            id
        );
    }

    #[test]
    fn unique_id_only_on_state_events() {
        let id = EntryId::new();

        let written = EntityEvent::state_written(id, "bf01_1", EntityState::default());
        assert_eq!(written.unique_id(), Some("bf01_1"));
        assert!(!written.is_lifecycle());

        let activated = EntityEvent::EntryActivated { entry_id: id };
        assert_eq!(activated.unique_id(), None);
        assert!(activated.is_lifecycle());
    }

    #[test]
    fn serializes_with_event_tag() {
        let id = EntryId::new();
        let state = EntityState {
            is_on: true,
            ..EntityState::default()
        };

        let value = serde_json::to_value(EntityEvent::state_written(id, "bf01_1", state)).unwrap();

        assert_eq!(value["event"], "state_written");
        assert_eq!(value["unique_id"], "bf01_1");
        assert_eq!(value["state"]["is_on"], true);
        assert_eq!(value["state"]["available"], true);
        assert!(value["state"]["last_polled"].is_null());
    }
}
