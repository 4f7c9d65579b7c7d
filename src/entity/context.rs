// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plumbing shared by every entity kind.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::client::DeviceHandle;
use crate::entry::EntryId;
use crate::event::{EntityEvent, EventBus};
use crate::types::DataPoint;

use super::EntityState;

/// Handle, identity and state of one entity.
#[derive(Debug)]
pub(crate) struct EntityContext {
    pub(crate) entry_id: EntryId,
    pub(crate) name: String,
    pub(crate) unique_id: String,
    pub(crate) handle: DeviceHandle,
    pub(crate) events: EventBus,
    pub(crate) verify_after_command: bool,
    pub(crate) state: EntityState,
}

impl EntityContext {
    pub(crate) fn new(
        entry_id: EntryId,
        name: String,
        unique_id: String,
        handle: DeviceHandle,
        events: EventBus,
    ) -> Self {
        Self {
            entry_id,
            name,
            unique_id,
            handle,
            events,
            verify_after_command: false,
            state: EntityState::default(),
        }
    }

    /// Announces the current state to subscribers.
    pub(crate) fn write_state(&self) {
        self.events.publish(EntityEvent::state_written(
            self.entry_id,
            self.unique_id.clone(),
            self.state.clone(),
        ));
    }

    /// Sends one data-point write. Failures are logged and swallowed.
    pub(crate) async fn send(&self, dp: DataPoint, value: Value) {
        if let Err(e) = self.handle.set_data_point(dp, value).await {
            tracing::warn!(
                entity = %self.unique_id,
                dp = dp.index(),
                error = %e,
                "Command failed"
            );
        }
    }

    /// Queries the device and returns its data-point map.
    ///
    /// Marks the entity unavailable when the query fails or the payload has
    /// no map; availability is otherwise left to the caller.
    pub(crate) async fn poll(&mut self) -> Option<Map<String, Value>> {
        let status = match self.handle.query_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(entity = %self.unique_id, error = %e, "Error updating entity");
                self.state.available = false;
                return None;
            }
        };

        match status.dps() {
            Some(dps) if !status.is_empty() => {
                self.state.last_polled = Some(Utc::now());
                Some(dps.clone())
            }
            _ => {
                tracing::warn!(
                    entity = %self.unique_id,
                    status = %status.raw(),
                    "Invalid status response"
                );
                self.state.available = false;
                None
            }
        }
    }

    /// Applies the power data point from a polled map.
    ///
    /// Present and boolean: sets `is_on` and marks available. Otherwise the
    /// state is left unchanged.
    pub(crate) fn apply_power(&mut self, dps: &Map<String, Value>, dp: DataPoint) {
        match dps.get(&dp.key()) {
            Some(Value::Bool(on)) => {
                self.state.is_on = *on;
                self.state.available = true;
            }
            Some(other) => {
                tracing::warn!(
                    entity = %self.unique_id,
                    dp = dp.index(),
                    value = %other,
                    "Data point is not a boolean"
                );
            }
            None => {
                let keys: Vec<&str> = dps.keys().map(String::as_str).collect();
                tracing::warn!(
                    entity = %self.unique_id,
                    dp = dp.index(),
                    available = ?keys,
                    "Data point not found in device status"
                );
            }
        }
    }
}

/// Reads a numeric data point that fits the device's 16-bit scales.
pub(crate) fn numeric(dps: &Map<String, Value>, dp: DataPoint) -> Option<u16> {
    dps.get(&dp.key())
        .and_then(Value::as_u64)
        .and_then(|raw| u16::try_from(raw).ok())
}
