// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Config entry lifecycle.
//!
//! [`Integration`] turns stored config entries into live devices and back.
//! Activation opens and validates a [`DeviceHandle`], registers it, and hands
//! the entry's entities to the host. Deactivation asks the host to unload
//! every platform and releases the handle only once all of them agreed.

mod platform;
mod registry;

pub use platform::{PLATFORMS, Platform, PlatformHost};
pub use registry::HandleRegistry;

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::client::{Connector, DeviceHandle};
use crate::entry::{ConfigEntry, EntryId};
use crate::error::{ConnectionError, Error, Result};
use crate::event::{DEFAULT_EVENT_CAPACITY, EntityEvent, EventBus};

/// Integration domain, as registered with the host.
pub const DOMAIN: &str = "grid_connect";

/// Tunables for an [`Integration`].
///
/// # Examples
///
/// ```
/// use grid_connect::integration::IntegrationOptions;
///
/// let options = IntegrationOptions::new()
///     .with_command_verification(true)
///     .with_event_capacity(16);
/// assert!(options.verify_after_command);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationOptions {
    /// Poll the device after every command instead of trusting it.
    pub verify_after_command: bool,
    /// Events buffered per state subscriber.
    pub event_capacity: usize,
}

impl IntegrationOptions {
    /// Creates the default options: optimistic commands, default event capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the post-command verification poll.
    #[must_use]
    pub fn with_command_verification(mut self, enabled: bool) -> Self {
        self.verify_after_command = enabled;
        self
    }

    /// Sets the state notification buffer size.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            verify_after_command: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Lifecycle manager for Grid Connect config entries.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use grid_connect::client::{MemoryConnector, MemoryDevice};
/// use grid_connect::entity::Entity;
/// use grid_connect::entry::{ConfigEntry, CredentialRecord, EntryId};
/// use grid_connect::integration::{Integration, Platform, PlatformHost};
///
/// #[derive(Default)]
/// struct Host {
///     entities: Vec<Entity>,
/// }
///
/// impl PlatformHost for Host {
///     async fn add_entities(&mut self, _: EntryId, _: Platform, entities: Vec<Entity>) {
///         self.entities.extend(entities);
///     }
///
///     async fn unload_platform(&mut self, _: EntryId, _: Platform) -> bool {
///         self.entities.clear();
///         true
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> grid_connect::Result<()> {
/// let connector = Arc::new(MemoryConnector::new());
/// connector.add_device("10.0.0.2", MemoryDevice::new("bf01", "localkey"));
///
/// let entry = ConfigEntry::new(CredentialRecord::new("Kettle", "10.0.0.2", "bf01", "localkey"));
/// let mut integration = Integration::new(connector);
/// let mut host = Host::default();
///
/// integration.activate(&entry, &mut host).await?;
/// assert!(integration.is_active(entry.entry_id));
/// assert_eq!(host.entities.len(), 1);
///
/// integration.deactivate(&entry, &mut host).await?;
/// assert!(!integration.is_active(entry.entry_id));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Integration<C: ?Sized> {
    connector: Arc<C>,
    registry: HandleRegistry,
    events: EventBus,
    options: IntegrationOptions,
}

impl<C> Integration<C>
where
    C: Connector + ?Sized,
{
    /// Creates an integration with default options.
    #[must_use]
    pub fn new(connector: Arc<C>) -> Self {
        Self::with_options(connector, IntegrationOptions::default())
    }

    /// Creates an integration with the given options.
    #[must_use]
    pub fn with_options(connector: Arc<C>, options: IntegrationOptions) -> Self {
        Self {
            connector,
            registry: HandleRegistry::new(),
            events: EventBus::with_capacity(options.event_capacity),
            options,
        }
    }

    /// Returns the connector used to reach devices.
    #[must_use]
    pub fn connector(&self) -> &Arc<C> {
        &self.connector
    }

    /// Returns the options in effect.
    #[must_use]
    pub fn options(&self) -> &IntegrationOptions {
        &self.options
    }

    /// Activates a config entry.
    ///
    /// Connects to the device, registers the handle, then sets up every
    /// platform: each entity is polled once and handed to `host`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyActive` if the entry already has a handle, and
    /// `Error::NotReady` if the device could not be reached. Nothing is
    /// registered in either case; the host may retry `NotReady` later.
    pub async fn activate<H: PlatformHost>(
        &mut self,
        entry: &ConfigEntry,
        host: &mut H,
    ) -> Result<()> {
        let entry_id = entry.entry_id;
        if self.registry.contains(entry_id) {
            return Err(Error::AlreadyActive(entry_id));
        }

        tracing::debug!(%entry_id, device_id = %entry.unique_id, "Activating config entry");

        let handle = DeviceHandle::connect(Arc::clone(&self.connector), &entry.data)
            .await
            .map_err(|e| {
                tracing::error!(%entry_id, error = %e, "Failed to connect to device");
                Error::NotReady(match e {
                    Error::Connection(source) => source,
                    other => ConnectionError::Unreachable(other.to_string()),
                })
            })?;

        self.registry.insert(entry_id, handle.clone());

        for platform in PLATFORMS {
            let mut entities =
                platform::setup_entry(platform, entry, &handle, &self.events, &self.options);
            if entities.is_empty() {
                continue;
            }
            for entity in &mut entities {
                entity.update().await;
            }
            tracing::debug!(%entry_id, %platform, count = entities.len(), "Adding entities");
            host.add_entities(entry_id, platform, entities).await;
        }

        self.events.publish(EntityEvent::EntryActivated { entry_id });
        tracing::info!(%entry_id, title = %entry.title, "Config entry activated");
        Ok(())
    }

    /// Deactivates a config entry.
    ///
    /// Every platform is asked to unload, even after one refuses. The handle is
    /// released only if all of them succeeded.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntryNotFound` if the entry is not active, and
    /// `Error::PlatformTeardownPartial` if some platforms failed to unload; the
    /// entry then stays active and deactivation can be retried.
    pub async fn deactivate<H: PlatformHost>(
        &mut self,
        entry: &ConfigEntry,
        host: &mut H,
    ) -> Result<()> {
        let entry_id = entry.entry_id;
        if !self.registry.contains(entry_id) {
            return Err(Error::EntryNotFound);
        }

        let mut failed = Vec::new();
        for platform in PLATFORMS {
            if !host.unload_platform(entry_id, platform).await {
                failed.push(platform);
            }
        }

        if !failed.is_empty() {
            tracing::warn!(%entry_id, ?failed, "Platform unload failed, keeping device handle");
            return Err(Error::PlatformTeardownPartial { entry_id, failed });
        }

        self.registry.remove(entry_id);
        self.events.publish(EntityEvent::EntryDeactivated { entry_id });
        tracing::info!(%entry_id, "Config entry deactivated");
        Ok(())
    }

    /// Returns the live handle for an entry.
    #[must_use]
    pub fn handle(&self, entry_id: EntryId) -> Option<&DeviceHandle> {
        self.registry.get(entry_id)
    }

    /// Returns true if the entry is active.
    #[must_use]
    pub fn is_active(&self, entry_id: EntryId) -> bool {
        self.registry.contains(entry_id)
    }

    /// Returns the ids of all active entries.
    #[must_use]
    pub fn active_entries(&self) -> Vec<EntryId> {
        self.registry.entry_ids()
    }

    /// Subscribes to entity state and entry lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EntityEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Fault, MemoryConnector, MemoryDevice};
    use crate::entity::Entity;
    use crate::entry::CredentialRecord;
    use crate::types::DataPoint;
    use serde_json::json;
    use std::collections::HashSet;

    #[derive(Default)]
    struct RecordingHost {
        added: Vec<(EntryId, Platform, Vec<Entity>)>,
        refuse: HashSet<Platform>,
        unloads: Vec<Platform>,
    }

    impl PlatformHost for RecordingHost {
        async fn add_entities(
            &mut self,
            entry_id: EntryId,
            platform: Platform,
            entities: Vec<Entity>,
        ) {
            self.added.push((entry_id, platform, entities));
        }

        async fn unload_platform(&mut self, _entry_id: EntryId, platform: Platform) -> bool {
            self.unloads.push(platform);
            !self.refuse.contains(&platform)
        }
    }

    fn setup() -> (Arc<MemoryConnector>, Arc<MemoryDevice>, ConfigEntry) {
        let connector = Arc::new(MemoryConnector::new());
        let device = connector.add_device(
            "10.0.0.2",
            MemoryDevice::new("bf01", "localkey").with_data_point(DataPoint::SWITCH, json!(true)),
        );
        let entry =
            ConfigEntry::new(CredentialRecord::new("Kettle", "10.0.0.2", "bf01", "localkey"));
        (connector, device, entry)
    }

    #[tokio::test]
    async fn activate_registers_handle_and_adds_polled_switch() {
        let (connector, _device, entry) = setup();
        let mut integration = Integration::new(connector);
        let mut host = RecordingHost::default();

        integration.activate(&entry, &mut host).await.unwrap();

        assert_eq!(integration.active_entries(), vec![entry.entry_id]);
        assert_eq!(
            integration.handle(entry.entry_id).map(DeviceHandle::device_id),
            Some("bf01")
        );
        assert_eq!(host.added.len(), 1);
        let (entry_id, platform, entities) = &host.added[0];
        assert_eq!(*entry_id, entry.entry_id);
        assert_eq!(*platform, Platform::Switch);
        assert!(entities[0].state().is_on);
        assert!(entities[0].state().last_polled.is_some());
    }

    #[tokio::test]
    async fn options_and_connector_are_kept() {
        let (connector, _device, _entry) = setup();
        let options = IntegrationOptions::new()
            .with_command_verification(true)
            .with_event_capacity(4);

        let integration = Integration::with_options(Arc::clone(&connector), options);

        assert!(Arc::ptr_eq(integration.connector(), &connector));
        assert_eq!(integration.options(), &options);
        assert!(!Integration::new(connector).options().verify_after_command);
    }

    #[tokio::test]
    async fn activate_unreachable_is_not_ready() {
        let (connector, device, entry) = setup();
        device.inject_fault(Fault::Unreachable);
        let mut integration = Integration::new(connector);
        let mut host = RecordingHost::default();

        let err = integration.activate(&entry, &mut host).await.unwrap_err();

        assert!(matches!(err, Error::NotReady(ConnectionError::Unreachable(_))));
        assert!(err.is_retryable());
        assert!(integration.active_entries().is_empty());
        assert!(host.added.is_empty());
    }

    #[tokio::test]
    async fn activate_library_panic_is_not_ready() {
        let (connector, device, entry) = setup();
        device.inject_fault(Fault::Crash);
        let mut integration = Integration::new(connector);

        let err = integration
            .activate(&entry, &mut RecordingHost::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotReady(_)));
        assert!(!integration.is_active(entry.entry_id));
    }

    #[tokio::test]
    async fn activate_twice_is_rejected_without_reconnecting() {
        let (connector, _device, entry) = setup();
        let mut integration = Integration::new(Arc::clone(&connector));
        let mut host = RecordingHost::default();

        integration.activate(&entry, &mut host).await.unwrap();
        let err = integration.activate(&entry, &mut host).await.unwrap_err();

        assert!(matches!(err, Error::AlreadyActive(id) if id == entry.entry_id));
        assert_eq!(connector.open_count(), 1);
    }

    #[tokio::test]
    async fn deactivate_removes_handle() {
        let (connector, _device, entry) = setup();
        let mut integration = Integration::new(connector);
        let mut host = RecordingHost::default();
        integration.activate(&entry, &mut host).await.unwrap();

        integration.deactivate(&entry, &mut host).await.unwrap();

        assert!(integration.handle(entry.entry_id).is_none());
        assert_eq!(host.unloads, PLATFORMS.to_vec());
    }

    #[tokio::test]
    async fn partial_unload_keeps_handle() {
        let (connector, _device, entry) = setup();
        let mut integration = Integration::new(connector);
        let mut host = RecordingHost::default();
        integration.activate(&entry, &mut host).await.unwrap();
        host.refuse.insert(Platform::Switch);

        let err = integration.deactivate(&entry, &mut host).await.unwrap_err();

        match err {
            Error::PlatformTeardownPartial { entry_id, failed } => {
                assert_eq!(entry_id, entry.entry_id);
                assert_eq!(failed, vec![Platform::Switch]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(integration.is_active(entry.entry_id));
        assert_eq!(host.unloads, PLATFORMS.to_vec());
    }

    #[tokio::test]
    async fn deactivate_inactive_entry_is_not_found() {
        let (connector, _device, entry) = setup();
        let mut integration = Integration::new(connector);
        let mut host = RecordingHost::default();

        let err = integration.deactivate(&entry, &mut host).await.unwrap_err();

        assert!(matches!(err, Error::EntryNotFound));
        assert!(host.unloads.is_empty());
    }

    #[tokio::test]
    async fn lifecycle_events_are_published() {
        let (connector, _device, entry) = setup();
        let mut integration = Integration::new(connector);
        let mut host = RecordingHost::default();
        let mut rx = integration.subscribe();

        integration.activate(&entry, &mut host).await.unwrap();
        integration.deactivate(&entry, &mut host).await.unwrap();

        let mut lifecycle = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if event.is_lifecycle() {
                lifecycle.push(event);
            }
        }
        assert_eq!(
            lifecycle,
            vec![
                EntityEvent::EntryActivated { entry_id: entry.entry_id },
                EntityEvent::EntryDeactivated { entry_id: entry.entry_id },
            ]
        );
    }

    #[test]
    fn options_default_to_optimistic_commands() {
        let options = IntegrationOptions::default();
        assert!(!options.verify_after_command);
        assert_eq!(options.event_capacity, DEFAULT_EVENT_CAPACITY);
    }
}
