// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimmable light entity.

use serde_json::{Map, Value};

use crate::client::DeviceHandle;
use crate::entry::{CredentialRecord, EntryId};
use crate::event::EventBus;
use crate::types::{Brightness, ColorTemp, DataPoint};

use super::EntityState;
use super::context::{EntityContext, numeric};

/// Optional settings applied when turning a light on.
///
/// # Examples
///
/// ```
/// use grid_connect::entity::LightCommand;
/// use grid_connect::types::{Brightness, ColorTemp};
///
/// let command = LightCommand::new()
///     .with_brightness(Brightness::new(128))
///     .with_color_temp(ColorTemp::NEUTRAL);
/// assert_eq!(command.brightness, Some(Brightness::new(128)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightCommand {
    /// Target brightness on the host scale.
    pub brightness: Option<Brightness>,
    /// Target color temperature in mireds.
    pub color_temp: Option<ColorTemp>,
}

impl LightCommand {
    /// Creates a command that only switches the light on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target brightness.
    #[must_use]
    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Sets the target color temperature.
    #[must_use]
    pub fn with_color_temp(mut self, color_temp: ColorTemp) -> Self {
        self.color_temp = Some(color_temp);
        self
    }
}

/// A light with on/off, brightness, and optionally color temperature.
///
/// On/off shares the switch data point. Brightness is 0-255 on the host and
/// 25-255 on the device; color temperature is in mireds on the host and
/// 0-255 (warmest to coolest) on the device.
#[derive(Debug)]
pub struct LightEntity {
    ctx: EntityContext,
    dp_power: DataPoint,
    dp_brightness: DataPoint,
    dp_color_temp: Option<DataPoint>,
}

impl LightEntity {
    /// Creates a light from the record's light data points.
    ///
    /// Returns `None` if the record has no brightness data point.
    #[must_use]
    pub fn new(
        entry_id: EntryId,
        record: &CredentialRecord,
        handle: DeviceHandle,
        events: EventBus,
    ) -> Option<Self> {
        let dp_brightness = record.dps_brightness?;
        let unique_id = format!("{}_{}", record.device_id, dp_brightness);
        Some(Self {
            ctx: EntityContext::new(entry_id, record.name.clone(), unique_id, handle, events),
            dp_power: record.dps_switch,
            dp_brightness,
            dp_color_temp: record.dps_color_temp,
        })
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

    /// Returns the stable unique id, `{device_id}_{brightness dp}`.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.ctx.unique_id
    }

    /// Returns true if the light is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ctx.state.is_on
    }

    /// Returns true if the last poll reached the device.
    #[must_use]
    pub fn available(&self) -> bool {
        self.ctx.state.available
    }

    /// Returns the last known brightness.
    #[must_use]
    pub fn brightness(&self) -> Option<Brightness> {
        self.ctx.state.brightness
    }

    /// Returns the last known color temperature.
    #[must_use]
    pub fn color_temp(&self) -> Option<ColorTemp> {
        self.ctx.state.color_temp
    }

    /// Returns true if the light has a color-temperature data point.
    #[must_use]
    pub fn supports_color_temp(&self) -> bool {
        self.dp_color_temp.is_some()
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> &EntityState {
        &self.ctx.state
    }

    /// Turns the light on, then applies brightness and color temperature.
    ///
    /// A color temperature is ignored when the light has no data point for it.
    pub async fn turn_on(&mut self, command: LightCommand) {
        self.ctx.send(self.dp_power, Value::Bool(true)).await;
        self.ctx.state.is_on = true;

        if let Some(brightness) = command.brightness {
            self.ctx
                .send(self.dp_brightness, Value::from(brightness.to_device()))
                .await;
            self.ctx.state.brightness = Some(brightness);
        }

        if let Some(color_temp) = command.color_temp {
            match self.dp_color_temp {
                Some(dp) => {
                    self.ctx.send(dp, Value::from(color_temp.to_device())).await;
                    self.ctx.state.color_temp = Some(color_temp);
                }
                None => {
                    tracing::debug!(
                        entity = %self.ctx.unique_id,
                        "Light has no color temperature data point, ignoring"
                    );
                }
            }
        }

        self.ctx.write_state();

        if self.ctx.verify_after_command {
            self.update().await;
        }
    }

    /// Turns the light off.
    pub async fn turn_off(&mut self) {
        self.ctx.send(self.dp_power, Value::Bool(false)).await;
        self.ctx.state.is_on = false;
        self.ctx.write_state();

        if self.ctx.verify_after_command {
            self.update().await;
        }
    }

    /// Polls the device and refreshes the state.
    ///
    /// Power and availability follow the switch rules. Brightness and color
    /// temperature are read when present; values outside the device scale are
    /// logged and ignored.
    pub async fn update(&mut self) {
        if let Some(dps) = self.ctx.poll().await {
            self.ctx.apply_power(&dps, self.dp_power);
            self.apply_levels(&dps);
        }
        self.ctx.write_state();
    }

    fn apply_levels(&mut self, dps: &Map<String, Value>) {
        if let Some(raw) = numeric(dps, self.dp_brightness) {
            match Brightness::from_device(raw) {
                Ok(brightness) => self.ctx.state.brightness = Some(brightness),
                Err(e) => {
                    tracing::warn!(entity = %self.ctx.unique_id, error = %e, "Ignoring brightness");
                }
            }
        }

        if let Some(raw) = self.dp_color_temp.and_then(|dp| numeric(dps, dp)) {
            match ColorTemp::from_device(raw) {
                Ok(color_temp) => self.ctx.state.color_temp = Some(color_temp),
                Err(e) => {
                    tracing::warn!(entity = %self.ctx.unique_id, error = %e, "Ignoring color temperature");
                }
            }
        }
    }
}
