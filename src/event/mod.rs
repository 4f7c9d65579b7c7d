// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State notifications.
//!
//! Entities publish an [`EntityEvent`] every time they write new state, the
//! way a host expects after an optimistic command or a poll. The [`EventBus`]
//! fans events out to any number of subscribers over a tokio broadcast
//! channel.
//!
//! # Examples
//!
//! ```
//! use grid_connect::entity::EntityState;
//! use grid_connect::entry::EntryId;
//! use grid_connect::event::{EntityEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(EntityEvent::state_written(EntryId::new(), "bf01_1", EntityState::default()));
//! assert!(rx.try_recv().is_ok());
//! ```

mod entity_event;
mod event_bus;

pub use entity_event::EntityEvent;
pub use event_bus::{DEFAULT_EVENT_CAPACITY, EventBus};
