// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power switch entity.

use serde_json::Value;

use crate::client::DeviceHandle;
use crate::entry::{CredentialRecord, EntryId};
use crate::event::EventBus;
use crate::types::DataPoint;

use super::EntityState;
use super::context::EntityContext;

/// A switch bound to one boolean data point.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use grid_connect::client::{DeviceHandle, MemoryConnector, MemoryDevice};
/// use grid_connect::entity::SwitchEntity;
/// use grid_connect::entry::{CredentialRecord, EntryId};
/// use grid_connect::event::EventBus;
///
/// # #[tokio::main]
/// # async fn main() -> grid_connect::Result<()> {
/// let connector = Arc::new(MemoryConnector::new());
/// connector.add_device("10.0.0.2", MemoryDevice::new("bf01", "localkey"));
/// let record = CredentialRecord::new("Kettle", "10.0.0.2", "bf01", "localkey");
/// let handle = DeviceHandle::connect(connector, &record).await?;
///
/// let mut switch = SwitchEntity::new(EntryId::new(), &record, handle, EventBus::new());
/// switch.turn_on().await;
/// assert!(switch.is_on());
/// assert_eq!(switch.unique_id(), "bf01_1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SwitchEntity {
    ctx: EntityContext,
    dp: DataPoint,
}

impl SwitchEntity {
    /// Creates a switch for the record's switch data point.
    #[must_use]
    pub fn new(
        entry_id: EntryId,
        record: &CredentialRecord,
        handle: DeviceHandle,
        events: EventBus,
    ) -> Self {
        let dp = record.dps_switch;
        let unique_id = format!("{}_{}", record.device_id, dp);
        Self {
            ctx: EntityContext::new(entry_id, record.name.clone(), unique_id, handle, events),
            dp,
        }
    }

    /// Polls the device after every command to confirm its effect.
    #[must_use]
    pub fn with_command_verification(mut self, enabled: bool) -> Self {
        self.ctx.verify_after_command = enabled;
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.ctx.name
    }

    /// Returns the stable unique id, `{device_id}_{dp}`.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.ctx.unique_id
    }

    /// Returns the bound data point.
    #[must_use]
    pub fn data_point(&self) -> DataPoint {
        self.dp
    }

    /// Returns true if the switch is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ctx.state.is_on
    }

    /// Returns true if the last poll reached the device.
    #[must_use]
    pub fn available(&self) -> bool {
        self.ctx.state.available
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> &EntityState {
        &self.ctx.state
    }

    /// Turns the switch on.
    pub async fn turn_on(&mut self) {
        self.set(true).await;
    }

    /// Turns the switch off.
    pub async fn turn_off(&mut self) {
        self.set(false).await;
    }

    /// Turns the switch on if it is off, off otherwise.
    pub async fn toggle(&mut self) {
        self.set(!self.ctx.state.is_on).await;
    }

    async fn set(&mut self, on: bool) {
        self.ctx.send(self.dp, Value::Bool(on)).await;

        self.ctx.state.is_on = on;
        self.ctx.write_state();

        if self.ctx.verify_after_command {
            self.update().await;
        }
    }

    /// Polls the device and refreshes `is_on` and `available`.
    ///
    /// Never fails: a query error or a malformed payload marks the switch
    /// unavailable, and a payload missing the bound data point leaves the
    /// state as it was.
    pub async fn update(&mut self) {
        if let Some(dps) = self.ctx.poll().await {
            self.ctx.apply_power(&dps, self.dp);
        }
        self.ctx.write_state();
    }
}
