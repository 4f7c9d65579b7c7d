// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local protocol version spoken by the device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Version of the local-network protocol the device firmware speaks.
///
/// The form and the persisted record carry the version as a string
/// (`"3.1"`, `"3.3"`, `"3.4"`); the device library expects a float.
///
/// # Examples
///
/// ```
/// use grid_connect::types::ProtocolVersion;
///
/// let version: ProtocolVersion = "3.4".parse().unwrap();
/// assert_eq!(version, ProtocolVersion::V34);
/// assert!((version.as_f32() - 3.4).abs() < f32::EPSILON);
///
/// assert_eq!(ProtocolVersion::default().as_str(), "3.3");
/// assert!("3.2".parse::<ProtocolVersion>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProtocolVersion {
    /// Protocol 3.1 (older plugs, unencrypted status).
    V31,
    /// Protocol 3.3, the most common firmware.
    #[default]
    V33,
    /// Protocol 3.4 (session-key negotiation).
    V34,
}

impl ProtocolVersion {
    /// All supported versions, in the order the form offers them.
    pub const ALL: [Self; 3] = [Self::V31, Self::V33, Self::V34];

    /// Returns the string form used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V31 => "3.1",
            Self::V33 => "3.3",
            Self::V34 => "3.4",
        }
    }

    /// Returns the floating-point form the device library expects.
    #[must_use]
    pub const fn as_f32(&self) -> f32 {
        match self {
            Self::V31 => 3.1,
            Self::V33 => 3.3,
            Self::V34 => 3.4,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolVersion {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3.1" => Ok(Self::V31),
            "3.3" => Ok(Self::V33),
            "3.4" => Ok(Self::V34),
            other => Err(ValueError::InvalidProtocolVersion(other.to_string())),
        }
    }
}

impl TryFrom<String> for ProtocolVersion {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProtocolVersion> for String {
    fn from(version: ProtocolVersion) -> Self {
        version.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_versions() {
        for version in ProtocolVersion::ALL {
            assert_eq!(version.as_str().parse::<ProtocolVersion>(), Ok(version));
        }
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = "3.5".parse::<ProtocolVersion>().unwrap_err();
        assert_eq!(err, ValueError::InvalidProtocolVersion("3.5".to_string()));
    }

    #[test]
    fn float_conversion_matches_string() {
        assert!((ProtocolVersion::V31.as_f32() - 3.1).abs() < f32::EPSILON);
        assert!((ProtocolVersion::V33.as_f32() - 3.3).abs() < f32::EPSILON);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&ProtocolVersion::V34).unwrap();
        assert_eq!(json, "\"3.4\"");
        let parsed: ProtocolVersion = serde_json::from_str("\"3.1\"").unwrap();
        assert_eq!(parsed, ProtocolVersion::V31);
        assert!(serde_json::from_str::<ProtocolVersion>("\"4.0\"").is_err());
    }
}
