// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel for entity events.

use tokio::sync::broadcast;

use super::EntityEvent;

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Fan-out of [`EntityEvent`]s to every subscriber.
///
/// Clones share one channel, so entities hold a clone and the integration
/// hands out receivers. A subscriber that falls more than the capacity behind
/// gets `RecvError::Lagged` and skips the oldest events.
///
/// # Examples
///
/// ```
/// use grid_connect::entry::EntryId;
/// use grid_connect::event::{EntityEvent, EventBus};
///
/// let bus = EventBus::with_capacity(8);
/// let mut first = bus.subscribe();
/// let mut second = bus.subscribe();
///
/// let entry_id = EntryId::new();
/// bus.publish(EntityEvent::EntryActivated { entry_id });
///
/// assert_eq!(first.try_recv().unwrap().entry_id(), entry_id);
/// assert_eq!(second.try_recv().unwrap().entry_id(), entry_id);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EntityEvent>,
}

impl EventBus {
    /// Creates a bus buffering [`DEFAULT_EVENT_CAPACITY`] events.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a bus buffering `capacity` events per subscriber.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EntityEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event, returning how many receivers it reached.
    ///
    /// Publishing with no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: EntityEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
