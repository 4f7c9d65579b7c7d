// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the config flow, the device adapter and entities.
//!
//! Each type validates its range at construction time so that invalid
//! configuration is rejected before any device I/O happens.
//!
//! # Types
//!
//! - [`ProtocolVersion`] - Local protocol version (3.1, 3.3, 3.4)
//! - [`DataPoint`] - Data-point index in the device status map
//! - [`Brightness`] - Light brightness (host 0-255, device 25-255)
//! - [`ColorTemp`] - Color temperature in mireds (153-500)

mod brightness;
mod color;
mod data_point;
mod protocol_version;

pub use brightness::Brightness;
pub use color::ColorTemp;
pub use data_point::DataPoint;
pub use protocol_version::ProtocolVersion;
