// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Grid Connect integration.
//!
//! The hierarchy mirrors how failures are handled by the host:
//!
//! - [`ConnectionError`] covers everything the device (or the transport in
//!   front of it) can do wrong. The config flow reports it as
//!   `cannot_connect`, activation turns it into [`Error::NotReady`].
//! - [`ValueError`] is returned by the constructors and parsers in
//!   [`types`](crate::types). The config flow turns it into per-field form
//!   errors before any I/O happens.
//! - [`Error`] is the top-level type returned by the public API.

use thiserror::Error;

use crate::entry::EntryId;
use crate::integration::Platform;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Talking to the device failed.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// A config entry for this device already exists.
    #[error("device {device_id} is already configured")]
    DuplicateDevice {
        /// The device identifier that collided.
        device_id: String,
    },

    /// Activation could not reach the device. The host should retry later.
    #[error("device not ready: {0}")]
    NotReady(#[source] ConnectionError),

    /// Some entity platforms refused to unload; the entry stays active.
    #[error("entry {entry_id} partially unloaded, failed platforms: {failed:?}")]
    PlatformTeardownPartial {
        /// The entry being deactivated.
        entry_id: EntryId,
        /// Platforms that reported an unload failure.
        failed: Vec<Platform>,
    },

    /// The entry is not known to the store or the handle registry.
    #[error("config entry not found")]
    EntryNotFound,

    /// The entry already has a live device handle.
    #[error("config entry {0} is already active")]
    AlreadyActive(EntryId),

    /// The worker running a blocking device call panicked or was cancelled.
    #[error("blocking device call failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl Error {
    /// Returns true if the host may retry the failed operation later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady(_) | Self::PlatformTeardownPartial { .. })
    }
}

/// Errors reported by the device or its transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The device could not be reached at all.
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// The device answered with an empty payload.
    #[error("empty response from device")]
    EmptyResponse,

    /// The payload carried an error indicator.
    #[error("device reported an error: {0}")]
    DeviceReported(String),
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The protocol version is not one of the supported ones.
    #[error("unsupported protocol version: {0}")]
    InvalidProtocolVersion(String),

    /// A data-point index is not a positive integer.
    #[error("invalid data point index: {0}")]
    InvalidDataPoint(String),

    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
