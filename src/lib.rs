// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid Connect - local-network control of Grid Connect smart outlets and
//! lights for home-automation hosts.
//!
//! The local protocol itself is handled by a device-control library reached
//! through the [`Connector`](client::Connector) trait. This crate supplies
//! everything around it:
//!
//! - **Setup**: a single-step [`ConfigFlow`] that validates credentials with
//!   one status query and stores a [`ConfigEntry`] per device
//! - **Lifecycle**: an [`Integration`] that activates entries into live device
//!   handles and tears them down again
//! - **Entities**: a polled [`SwitchEntity`] and, for dimmable devices, a
//!   [`LightEntity`] with brightness and color temperature
//!
//! Every blocking device call runs on tokio's blocking pool, so none of the
//! async APIs stall the scheduler.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use grid_connect::client::{MemoryConnector, MemoryDevice};
//! use grid_connect::config_flow::{ConfigFlow, FlowResult, UserInput};
//! use grid_connect::entity::Entity;
//! use grid_connect::entry::{EntryId, MemoryEntryStore};
//! use grid_connect::integration::{Integration, Platform, PlatformHost};
//!
//! #[derive(Default)]
//! struct Host {
//!     entities: Vec<Entity>,
//! }
//!
//! impl PlatformHost for Host {
//!     async fn add_entities(&mut self, _: EntryId, _: Platform, entities: Vec<Entity>) {
//!         self.entities.extend(entities);
//!     }
//!
//!     async fn unload_platform(&mut self, _: EntryId, _: Platform) -> bool {
//!         true
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> grid_connect::Result<()> {
//!     // A simulated device stands in for real hardware
//!     let connector = Arc::new(MemoryConnector::new());
//!     connector.add_device("192.168.1.40", MemoryDevice::new("bf12ab", "0123456789abcdef"));
//!     let store = Arc::new(MemoryEntryStore::new());
//!
//!     let mut flow = ConfigFlow::new(Arc::clone(&connector), Arc::clone(&store));
//!     let input = UserInput::new("Kettle", "192.168.1.40", "bf12ab", "0123456789abcdef");
//!     let FlowResult::CreateEntry { entry } = flow.step_user(Some(input)).await else {
//!         panic!("setup failed");
//!     };
//!
//!     let mut integration = Integration::new(connector);
//!     let mut host = Host::default();
//!     integration.activate(&entry, &mut host).await?;
//!
//!     let kettle = &mut host.entities[0];
//!     kettle.turn_on().await;
//!     assert!(kettle.state().is_on);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config_flow;
pub mod entity;
pub mod entry;
pub mod error;
pub mod event;
pub mod integration;
pub mod types;

pub use client::{Connector, DeviceHandle, DeviceTransport, MemoryConnector, StatusResponse};
pub use config_flow::{ConfigFlow, FlowError, FlowResult, UserInput};
pub use entity::{Entity, EntityState, LightCommand, LightEntity, SwitchEntity};
pub use entry::{
    ConfigEntry, ConfigEntryStore, CredentialRecord, EntryId, LocalKey, MemoryEntryStore,
};
pub use error::{ConnectionError, Error, Result, ValueError};
pub use event::{EntityEvent, EventBus};
pub use integration::{DOMAIN, Integration, IntegrationOptions, Platform, PlatformHost};
pub use types::{Brightness, ColorTemp, DataPoint, ProtocolVersion};
