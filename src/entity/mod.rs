// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing entities.
//!
//! Each activated config entry yields a [`SwitchEntity`] and, when the entry
//! names a brightness data point, a [`LightEntity`]. Entities read through the
//! entry's [`DeviceHandle`](crate::client::DeviceHandle) when polled and write
//! through it when commanded.
//!
//! Commands are optimistic: the new state is written and announced as soon as
//! the command has been sent, whether or not the device acted on it. A poll
//! reconciles the state with what the device actually reports.

mod context;
mod light;
mod switch;

pub use light::{LightCommand, LightEntity};
pub use switch::SwitchEntity;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::integration::Platform;
use crate::types::{Brightness, ColorTemp};

/// Snapshot of an entity's state.
///
/// Rebuilt on every poll and never persisted. A fresh entity is off and
/// available until its first poll says otherwise.
///
/// # Examples
///
/// ```
/// use grid_connect::entity::EntityState;
///
/// let state = EntityState::default();
/// assert!(!state.is_on);
/// assert!(state.available);
/// assert!(state.last_polled.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    /// Whether the device output is on.
    pub is_on: bool,
    /// Whether the last poll reached the device.
    pub available: bool,
    /// Brightness on the host scale; lights only.
    pub brightness: Option<Brightness>,
    /// Color temperature in mireds; lights with a color-temperature data point only.
    pub color_temp: Option<ColorTemp>,
    /// When the device last answered a poll with its data-point map.
    pub last_polled: Option<DateTime<Utc>>,
}

impl Default for EntityState {
    fn default() -> Self {
        Self {
            is_on: false,
            available: true,
            brightness: None,
            color_temp: None,
            last_polled: None,
        }
    }
}

/// Any entity produced by the integration.
#[derive(Debug)]
pub enum Entity {
    /// A power switch.
    Switch(SwitchEntity),
    /// A dimmable light.
    Light(LightEntity),
}

impl Entity {
    /// Returns the platform this entity belongs to.
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Self::Switch(_) => Platform::Switch,
            Self::Light(_) => Platform::Light,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Switch(switch) => switch.name(),
            Self::Light(light) => light.name(),
        }
    }

    /// Returns the stable unique id.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        match self {
            Self::Switch(switch) => switch.unique_id(),
            Self::Light(light) => light.unique_id(),
        }
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> &EntityState {
        match self {
            Self::Switch(switch) => switch.state(),
            Self::Light(light) => light.state(),
        }
    }

    /// Turns the output on with default settings.
    pub async fn turn_on(&mut self) {
        match self {
            Self::Switch(switch) => switch.turn_on().await,
            Self::Light(light) => light.turn_on(LightCommand::default()).await,
        }
    }

    /// Turns the output off.
    pub async fn turn_off(&mut self) {
        match self {
            Self::Switch(switch) => switch.turn_off().await,
            Self::Light(light) => light.turn_off().await,
        }
    }

    /// Polls the device and refreshes the state.
    pub async fn update(&mut self) {
        match self {
            Self::Switch(switch) => switch.update().await,
            Self::Light(light) => light.update().await,
        }
    }

    /// Returns the switch, if this is one.
    #[must_use]
    pub fn as_switch_mut(&mut self) -> Option<&mut SwitchEntity> {
        match self {
            Self::Switch(switch) => Some(switch),
            Self::Light(_) => None,
        }
    }

    /// Returns the light, if this is one.
    #[must_use]
    pub fn as_light_mut(&mut self) -> Option<&mut LightEntity> {
        match self {
            Self::Light(light) => Some(light),
            Self::Switch(_) => None,
        }
    }
}

impl From<SwitchEntity> for Entity {
    fn from(switch: SwitchEntity) -> Self {
        Self::Switch(switch)
    }
}

impl From<LightEntity> for Entity {
    fn from(light: LightEntity) -> Self {
        Self::Light(light)
    }
}
