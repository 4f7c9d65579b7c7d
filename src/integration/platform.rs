// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity platforms and the host side of their setup.

use std::fmt;

use crate::client::DeviceHandle;
use crate::entity::{Entity, LightEntity, SwitchEntity};
use crate::entry::{ConfigEntry, EntryId};
use crate::event::EventBus;

use super::IntegrationOptions;

/// Entity platform kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Power switches.
    Switch,
    /// Dimmable lights.
    Light,
}

impl Platform {
    /// Returns the platform's host-facing name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platforms every entry is set up and torn down on.
pub const PLATFORMS: [Platform; 2] = [Platform::Switch, Platform::Light];

/// What the integration needs from the home-automation host.
#[allow(async_fn_in_trait)]
pub trait PlatformHost {
    /// Takes ownership of the entities one platform created for an entry.
    ///
    /// Not called for a platform that produced no entities.
    async fn add_entities(
        &mut self,
        entry_id: EntryId,
        platform: Platform,
        entities: Vec<Entity>,
    );

    /// Unloads one platform's entities for an entry.
    ///
    /// Returns false if the platform could not be unloaded.
    async fn unload_platform(&mut self, entry_id: EntryId, platform: Platform) -> bool;
}

/// Builds the entities one platform contributes for an entry.
pub(crate) fn setup_entry(
    platform: Platform,
    entry: &ConfigEntry,
    handle: &DeviceHandle,
    events: &EventBus,
    options: &IntegrationOptions,
) -> Vec<Entity> {
    let record = &entry.data;
    match platform {
        Platform::Switch => {
            let switch = SwitchEntity::new(entry.entry_id, record, handle.clone(), events.clone())
                .with_command_verification(options.verify_after_command);
            vec![Entity::from(switch)]
        }
        Platform::Light => LightEntity::new(entry.entry_id, record, handle.clone(), events.clone())
            .map(|light| light.with_command_verification(options.verify_after_command))
            .map(Entity::from)
            .into_iter()
            .collect(),
    }
}
