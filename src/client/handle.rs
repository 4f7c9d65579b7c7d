// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated, async-safe device handle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::entry::CredentialRecord;
use crate::error::Result;
use crate::types::DataPoint;

use super::{ConnectParams, Connector, DeviceTransport, StatusResponse, offload};

/// Live handle to one device.
///
/// A handle can only be obtained through [`connect`](Self::connect), which
/// proves the credentials work before returning. Cloning is cheap; all clones
/// share the same transport, and the transport is released when the last
/// clone is dropped.
#[derive(Clone)]
pub struct DeviceHandle {
    device_id: Arc<str>,
    transport: Arc<dyn DeviceTransport>,
}

impl DeviceHandle {
    /// Opens a connection with `record` and validates it with one status query.
    ///
    /// Both the open and the query run on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if the device is unreachable, answers with
    /// an empty payload, or reports an error; `Error::Worker` if the device
    /// library panicked.
    pub async fn connect<C>(connector: Arc<C>, record: &CredentialRecord) -> Result<Self>
    where
        C: Connector + ?Sized,
    {
        let params = ConnectParams::from(record);
        let device_id: Arc<str> = Arc::from(record.device_id.as_str());

        tracing::debug!(
            device_id = %device_id,
            host = %params.host,
            version = params.version,
            "Connecting to device"
        );

        let transport = offload(move || {
            let transport = connector.open(&params)?;
            let status = StatusResponse::new(transport.status()?);
            status.ensure_healthy()?;
            Ok(transport)
        })
        .await?;

        tracing::debug!(device_id = %device_id, "Device connection validated");

        Ok(Self {
            device_id,
            transport,
        })
    }

    /// Returns the device identifier this handle is bound to.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Reads the device status.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` on transport failure and `Error::Worker` if
    /// the device library panicked. Error payloads are returned as `Ok` and
    /// left for the caller to interpret.
    pub async fn query_status(&self) -> Result<StatusResponse> {
        let transport = Arc::clone(&self.transport);
        let raw = offload(move || transport.status()).await?;
        Ok(StatusResponse::new(raw))
    }

    /// Writes one data point.
    ///
    /// The device's reply is not interpreted; a command that silently failed
    /// shows up on the next status query.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` on transport failure and `Error::Worker` if
    /// the device library panicked.
    pub async fn set_data_point(&self, dp: DataPoint, value: Value) -> Result<()> {
        let transport = Arc::clone(&self.transport);
        let index = dp.index();

        tracing::debug!(device_id = %self.device_id, dp = index, value = %value, "Setting data point");

        let reply = offload(move || transport.set_status(index, value)).await?;

        tracing::trace!(device_id = %self.device_id, dp = index, reply = %reply, "Set-status reply");
        Ok(())
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}
