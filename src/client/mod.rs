// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device client adapter.
//!
//! The local protocol itself (handshake, encryption, framing) belongs to a
//! device-control library. This module narrows that library down to the three
//! calls the integration needs:
//!
//! - [`Connector::open`] builds a connection object for one device
//! - [`DeviceTransport::status`] reads the status map
//! - [`DeviceTransport::set_status`] writes one data point
//!
//! All three block. [`DeviceHandle`] is the async face of a transport: every
//! call it makes is moved onto tokio's blocking pool so the host's scheduler
//! never stalls on device I/O.
//!
//! [`MemoryConnector`] is an in-process implementation for tests and demos.

mod handle;
mod memory;
mod offload;

pub use handle::DeviceHandle;
pub use memory::{Fault, MemoryConnector, MemoryDevice};

pub(crate) use offload::offload;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::entry::{CredentialRecord, LocalKey};
use crate::error::ConnectionError;
use crate::types::DataPoint;

/// Parameters for opening a device connection.
///
/// Connectors read the key with [`LocalKey::expose_secret`] when handing it
/// to the device library.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectParams {
    /// Device host name or IP address.
    pub host: String,
    /// Device identifier.
    pub device_id: String,
    /// Pre-shared local key.
    pub local_key: LocalKey,
    /// Protocol version in the library's floating-point form.
    pub version: f32,
}

impl From<&CredentialRecord> for ConnectParams {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            host: record.host.clone(),
            device_id: record.device_id.clone(),
            local_key: record.local_key.clone(),
            version: record.protocol_version.as_f32(),
        }
    }
}

/// Blocking connection to one device, as provided by the device library.
pub trait DeviceTransport: Send + Sync {
    /// Reads the device status payload.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` on transport failure. Devices may also
    /// answer `Ok` with an error payload; see [`StatusResponse::ensure_healthy`].
    fn status(&self) -> Result<Value, ConnectionError>;

    /// Writes `value` to data point `dp`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` on transport failure.
    fn set_status(&self, dp: u16, value: Value) -> Result<Value, ConnectionError>;
}

/// Factory for [`DeviceTransport`]s.
pub trait Connector: Send + Sync + 'static {
    /// Opens a connection object for the device described by `params`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the connection object cannot be built.
    fn open(&self, params: &ConnectParams) -> Result<Arc<dyn DeviceTransport>, ConnectionError>;
}

/// Status payload returned by a device.
///
/// Devices answer with `{"devID": "...", "dps": {"1": true, ...}}` on
/// success, and with an object carrying an `"Error"` key otherwise.
///
/// # Examples
///
/// ```
/// use grid_connect::client::StatusResponse;
/// use grid_connect::types::DataPoint;
/// use serde_json::json;
///
/// let ok = StatusResponse::new(json!({"dps": {"1": true}}));
/// assert!(ok.ensure_healthy().is_ok());
/// assert_eq!(ok.get(DataPoint::SWITCH), Some(&json!(true)));
///
/// let failed = StatusResponse::new(json!({"Error": "Network Error: Device Unreachable"}));
/// assert!(failed.ensure_healthy().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    raw: Value,
}

impl StatusResponse {
    /// Wraps a raw status payload.
    #[must_use]
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns true if the payload carries no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.raw {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Returns the error message if the payload indicates an error.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        if let Some(err) = self.raw.get("Error") {
            return Some(match err {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
        let text = self.raw.to_string();
        text.contains("Error").then_some(text)
    }

    /// Checks that the payload is a non-empty, error-free mapping.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::EmptyResponse` for an empty payload and
    /// `ConnectionError::DeviceReported` for an error payload or anything
    /// that is not a mapping.
    pub fn ensure_healthy(&self) -> Result<(), ConnectionError> {
        if self.is_empty() {
            return Err(ConnectionError::EmptyResponse);
        }
        if !self.raw.is_object() {
            return Err(ConnectionError::DeviceReported(format!(
                "malformed status payload: {}",
                self.raw
            )));
        }
        if let Some(message) = self.error() {
            return Err(ConnectionError::DeviceReported(message));
        }
        Ok(())
    }

    /// Returns the data-point map, if the payload has one.
    #[must_use]
    pub fn dps(&self) -> Option<&Map<String, Value>> {
        self.raw.get("dps").and_then(Value::as_object)
    }

    /// Returns the value of one data point.
    #[must_use]
    pub fn get(&self, dp: DataPoint) -> Option<&Value> {
        self.dps().and_then(|dps| dps.get(&dp.key()))
    }
}
