// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The pre-shared device key.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pre-shared local key of one device.
///
/// Held in a [`SecretString`], so `Debug` output never shows it and the
/// buffer is zeroed on drop. Device libraries read it through
/// [`expose_secret`](Self::expose_secret) when opening a connection.
///
/// # Examples
///
/// ```
/// use grid_connect::entry::LocalKey;
///
/// let key = LocalKey::from("0123456789abcdef");
/// assert_eq!(key.expose_secret(), "0123456789abcdef");
/// assert!(!format!("{key:?}").contains("0123456789abcdef"));
/// ```
#[derive(Debug)]
pub struct LocalKey(SecretString);

impl LocalKey {
    /// Wraps a key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Returns the key in clear text.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Returns true if the key is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.expose_secret().trim().is_empty()
    }
}

impl Clone for LocalKey {
    fn clone(&self) -> Self {
        Self::new(self.expose_secret())
    }
}

impl Default for LocalKey {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl PartialEq for LocalKey {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret() == other.expose_secret()
    }
}

impl Eq for LocalKey {}

impl From<&str> for LocalKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for LocalKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

// Persisted in clear text; the host's entry storage is the trust boundary.
impl Serialize for LocalKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose_secret())
    }
}

impl<'de> Deserialize<'de> for LocalKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_the_key() {
        let key = LocalKey::new("hunter2hunter2");
        let debug = format!("{key:?}");
        assert!(!debug.contains("hunter2hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = LocalKey::from("abc123");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"abc123\"");

        let parsed: LocalKey = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn blank_keys() {
        assert!(LocalKey::default().is_blank());
        assert!(LocalKey::from("  ").is_blank());
        assert!(!LocalKey::from("k").is_blank());
        assert_ne!(LocalKey::from("a"), LocalKey::from("b"));
    }
}
