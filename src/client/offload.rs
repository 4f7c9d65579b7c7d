// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dispatch of blocking device calls to the worker pool.

use crate::error::{ConnectionError, Result};

/// Runs a blocking device call on tokio's blocking pool and awaits it.
///
/// A panic inside `call` surfaces as `Error::Worker`; a device failure as
/// `Error::Connection`.
pub(crate) async fn offload<T, F>(call: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, ConnectionError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(call).await??)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn returns_value_from_worker() {
        let value = offload(|| Ok(42)).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn maps_device_failure_to_connection_error() {
        let result: Result<()> = offload(|| Err(ConnectionError::EmptyResponse)).await;
        assert!(matches!(
            result,
            Err(Error::Connection(ConnectionError::EmptyResponse))
        ));
    }

    #[tokio::test]
    async fn maps_panic_to_worker_error() {
        let result: Result<()> = offload(|| panic!("device library crashed")).await;
        assert!(matches!(result, Err(Error::Worker(e)) if e.is_panic()));
    }

    #[tokio::test]
    async fn runs_off_the_calling_thread() {
        let caller = std::thread::current().id();
        let worker = offload(|| Ok(std::thread::current().id())).await.unwrap();
        assert_ne!(caller, worker);
    }
}
