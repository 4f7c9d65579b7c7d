// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted connection credentials for one device.

use serde::{Deserialize, Serialize};

use crate::types::{DataPoint, ProtocolVersion};

use super::LocalKey;

/// Everything needed to reach one device and map its data points.
///
/// This is the `data` payload of a [`ConfigEntry`](super::ConfigEntry). The
/// serialized keys match the form field names.
///
/// # Examples
///
/// ```
/// use grid_connect::entry::CredentialRecord;
/// use grid_connect::types::{DataPoint, ProtocolVersion};
///
/// let record = CredentialRecord::new("Kettle", "192.168.1.40", "bf12ab", "0123456789abcdef")
///     .with_protocol_version(ProtocolVersion::V34);
///
/// assert_eq!(record.dps_switch, DataPoint::SWITCH);
/// assert!(!format!("{record:?}").contains("0123456789abcdef"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Display name chosen by the user; becomes the entry title.
    pub name: String,
    /// Device host name or IP address.
    pub host: String,
    /// Device identifier; also the entry's unique id.
    pub device_id: String,
    /// Pre-shared local key.
    pub local_key: LocalKey,
    /// Local protocol version.
    #[serde(default)]
    pub protocol_version: ProtocolVersion,
    /// Power switch data point.
    #[serde(default)]
    pub dps_switch: DataPoint,
    /// Brightness data point; a light entity is created when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dps_brightness: Option<DataPoint>,
    /// Color temperature data point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dps_color_temp: Option<DataPoint>,
}

impl CredentialRecord {
    /// Creates a record with default protocol version and data points.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        device_id: impl Into<String>,
        local_key: impl Into<LocalKey>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            device_id: device_id.into(),
            local_key: local_key.into(),
            protocol_version: ProtocolVersion::default(),
            dps_switch: DataPoint::default(),
            dps_brightness: None,
            dps_color_temp: None,
        }
    }

    /// Sets the protocol version.
    #[must_use]
    pub fn with_protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = version;
        self
    }

    /// Sets the power switch data point.
    #[must_use]
    pub fn with_switch_dp(mut self, dp: DataPoint) -> Self {
        self.dps_switch = dp;
        self
    }

    /// Sets the light data points.
    #[must_use]
    pub fn with_light_dps(mut self, brightness: DataPoint, color_temp: Option<DataPoint>) -> Self {
        self.dps_brightness = Some(brightness);
        self.dps_color_temp = color_temp;
        self
    }

    /// Returns true if the record describes a dimmable light.
    #[must_use]
    pub fn has_light(&self) -> bool {
        self.dps_brightness.is_some()
    }
}
