// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process simulated devices.
//!
//! [`MemoryConnector`] stands in for the device library: it resolves hosts to
//! [`MemoryDevice`]s registered with it and answers status and set-status
//! calls from an in-memory data-point map. Faults can be injected to exercise
//! the unhappy paths without a network.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use serde_json::{Value, json};

use crate::entry::LocalKey;
use crate::error::ConnectionError;
use crate::types::DataPoint;

use super::{ConnectParams, Connector, DeviceTransport};

/// Failure modes a [`MemoryDevice`] can be put into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Every call fails with `ConnectionError::Unreachable`.
    Unreachable,
    /// Status answers with an empty payload.
    EmptyReply,
    /// Status answers with an error payload carrying this message.
    ErrorReply(String),
    /// Status answers without a `dps` map.
    MalformedReply,
    /// Status answers with exactly this payload.
    RawReply(Value),
    /// Commands are acknowledged but not applied.
    IgnoreCommands,
    /// Every call panics inside the device library.
    Crash,
}

/// A simulated device.
///
/// # Examples
///
/// ```
/// use grid_connect::client::MemoryDevice;
/// use grid_connect::types::DataPoint;
/// use serde_json::json;
///
/// let device = MemoryDevice::new("bf01", "localkey").with_data_point(DataPoint::SWITCH, json!(true));
/// assert_eq!(device.data_point(DataPoint::SWITCH), Some(json!(true)));
/// ```
#[derive(Debug)]
pub struct MemoryDevice {
    device_id: String,
    local_key: LocalKey,
    dps: Mutex<BTreeMap<String, Value>>,
    fault: Mutex<Option<Fault>>,
    commands: Mutex<Vec<(u16, Value)>>,
    status_calls: AtomicUsize,
}

impl MemoryDevice {
    /// Creates a switched-off device with the given id and key.
    #[must_use]
    pub fn new(device_id: impl Into<String>, local_key: impl Into<LocalKey>) -> Self {
        let mut dps = BTreeMap::new();
        dps.insert(DataPoint::SWITCH.key(), Value::Bool(false));

        Self {
            device_id: device_id.into(),
            local_key: local_key.into(),
            dps: Mutex::new(dps),
            fault: Mutex::new(None),
            commands: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Sets an initial data-point value.
    #[must_use]
    pub fn with_data_point(self, dp: DataPoint, value: Value) -> Self {
        self.dps.lock().insert(dp.key(), value);
        self
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the current value of a data point.
    #[must_use]
    pub fn data_point(&self, dp: DataPoint) -> Option<Value> {
        self.dps.lock().get(&dp.key()).cloned()
    }

    /// Overwrites a data point, as if changed from outside (e.g. a wall button).
    pub fn set_data_point(&self, dp: DataPoint, value: Value) {
        self.dps.lock().insert(dp.key(), value);
    }

    /// Removes a data point from the status map.
    pub fn remove_data_point(&self, dp: DataPoint) {
        self.dps.lock().remove(&dp.key());
    }

    /// Puts the device into a failure mode.
    pub fn inject_fault(&self, fault: Fault) {
        *self.fault.lock() = Some(fault);
    }

    /// Returns the device to normal operation.
    pub fn clear_fault(&self) {
        *self.fault.lock() = None;
    }

    /// Returns every set-status command received, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<(u16, Value)> {
        self.commands.lock().clone()
    }

    /// Returns the number of status queries answered or refused.
    #[must_use]
    pub fn status_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn current_fault(&self) -> Option<Fault> {
        self.fault.lock().clone()
    }

    fn status(&self, key_ok: bool) -> Result<Value, ConnectionError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        match self.current_fault() {
            Some(Fault::Unreachable) => {
                return Err(ConnectionError::Unreachable(format!(
                    "no route to {}",
                    self.device_id
                )));
            }
            Some(Fault::EmptyReply) => return Ok(Value::Null),
            Some(Fault::ErrorReply(message)) => {
                return Ok(json!({"Error": message, "Err": "900", "Payload": null}));
            }
            Some(Fault::MalformedReply) => return Ok(json!({"devID": self.device_id})),
            Some(Fault::RawReply(raw)) => return Ok(raw),
            Some(Fault::Crash) => panic!("simulated device library crash"),
            Some(Fault::IgnoreCommands) | None => {}
        }

        if !key_ok {
            return Ok(json!({
                "Error": "Check device key or version",
                "Err": "914",
                "Payload": null
            }));
        }

        let dps: serde_json::Map<String, Value> = self
            .dps
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(json!({"devID": self.device_id, "dps": dps}))
    }

    fn set_status(&self, dp: u16, value: Value) -> Result<Value, ConnectionError> {
        match self.current_fault() {
            Some(Fault::Unreachable) => {
                return Err(ConnectionError::Unreachable(format!(
                    "no route to {}",
                    self.device_id
                )));
            }
            Some(Fault::Crash) => panic!("simulated device library crash"),
            _ => {}
        }

        self.commands.lock().push((dp, value.clone()));

        if self.current_fault() != Some(Fault::IgnoreCommands) {
            self.dps.lock().insert(dp.to_string(), value.clone());
        }

        Ok(json!({"devID": self.device_id, "dps": {dp.to_string(): value}}))
    }
}

/// Transport bound to one [`MemoryDevice`].
struct MemoryTransport {
    device: Arc<MemoryDevice>,
    key_ok: bool,
}

impl DeviceTransport for MemoryTransport {
    fn status(&self) -> Result<Value, ConnectionError> {
        self.device.status(self.key_ok)
    }

    fn set_status(&self, dp: u16, value: Value) -> Result<Value, ConnectionError> {
        if !self.key_ok {
            return Ok(json!({"Error": "Check device key or version", "Err": "914"}));
        }
        self.device.set_status(dp, value)
    }
}

/// [`Connector`] resolving hosts to registered [`MemoryDevice`]s.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use grid_connect::client::{DeviceHandle, MemoryConnector, MemoryDevice};
/// use grid_connect::entry::CredentialRecord;
///
/// # #[tokio::main]
/// # async fn main() -> grid_connect::Result<()> {
/// let connector = Arc::new(MemoryConnector::new());
/// connector.add_device("10.0.0.2", MemoryDevice::new("bf01", "localkey"));
///
/// let record = CredentialRecord::new("Plug", "10.0.0.2", "bf01", "localkey");
/// let handle = DeviceHandle::connect(connector, &record).await?;
/// assert_eq!(handle.device_id(), "bf01");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryConnector {
    devices: RwLock<HashMap<String, Arc<MemoryDevice>>>,
    opens: AtomicUsize,
}

impl MemoryConnector {
    /// Creates a connector with no devices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device at `host`, returning a shared reference to it.
    pub fn add_device(&self, host: impl Into<String>, device: MemoryDevice) -> Arc<MemoryDevice> {
        let device = Arc::new(device);
        self.devices.write().insert(host.into(), Arc::clone(&device));
        device
    }

    /// Unregisters the device at `host`.
    pub fn remove_device(&self, host: &str) -> Option<Arc<MemoryDevice>> {
        self.devices.write().remove(host)
    }

    /// Returns the number of connection objects opened so far.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl Connector for MemoryConnector {
    fn open(&self, params: &ConnectParams) -> Result<Arc<dyn DeviceTransport>, ConnectionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);

        let device = self
            .devices
            .read()
            .get(&params.host)
            .cloned()
            .filter(|device| device.device_id == params.device_id)
            .ok_or_else(|| {
                ConnectionError::Unreachable(format!(
                    "no device {} at {}",
                    params.device_id, params.host
                ))
            })?;

        let key_ok = device.local_key == params.local_key;
        Ok(Arc::new(MemoryTransport { device, key_ok }))
    }
}
