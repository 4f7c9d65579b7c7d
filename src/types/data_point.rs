// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data-point index type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Index of a data point (DP) in the device's status map.
///
/// Status payloads key data points by their decimal string (`"1"`), while
/// set-status commands take the integer. `DataPoint` keeps the integer and
/// renders the key on demand, so both sides always agree.
///
/// # Examples
///
/// ```
/// use grid_connect::types::DataPoint;
///
/// let dp: DataPoint = "1".parse().unwrap();
/// assert_eq!(dp, DataPoint::SWITCH);
/// assert_eq!(dp.key(), "1");
/// assert_eq!(dp.index(), 1);
///
/// assert!("0".parse::<DataPoint>().is_err());
/// assert!("power".parse::<DataPoint>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataPoint(u16);

impl DataPoint {
    /// Default power switch data point.
    pub const SWITCH: Self = Self(1);

    /// Default brightness data point for Grid Connect lights.
    pub const BRIGHTNESS: Self = Self(2);

    /// Default color temperature data point for Grid Connect lights.
    pub const COLOR_TEMP: Self = Self(3);

    /// Creates a data point from its integer index.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidDataPoint` for index 0.
    pub fn new(index: u16) -> Result<Self, ValueError> {
        if index == 0 {
            return Err(ValueError::InvalidDataPoint(index.to_string()));
        }
        Ok(Self(index))
    }

    /// Returns the integer index used by set-status commands.
    #[must_use]
    pub const fn index(&self) -> u16 {
        self.0
    }

    /// Returns the key used in status payloads.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl Default for DataPoint {
    fn default() -> Self {
        Self::SWITCH
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DataPoint {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index: u16 = s
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidDataPoint(s.to_string()))?;
        Self::new(index)
    }
}

impl TryFrom<String> for DataPoint {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataPoint> for String {
    fn from(dp: DataPoint) -> Self {
        dp.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_switch() {
        assert_eq!(DataPoint::default(), DataPoint::SWITCH);
        assert_eq!(DataPoint::default().key(), "1");
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(" 20 ".parse::<DataPoint>().unwrap().index(), 20);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(DataPoint::new(0).is_err());
        assert_eq!(
            "-1".parse::<DataPoint>().unwrap_err(),
            ValueError::InvalidDataPoint("-1".to_string())
        );
    }

    #[test]
    fn serializes_as_key_string() {
        let json = serde_json::to_string(&DataPoint::COLOR_TEMP).unwrap();
        assert_eq!(json, "\"3\"");
    }
}
