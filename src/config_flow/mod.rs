// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-step setup flow.
//!
//! The user fills in the credential form; the flow checks the fields, proves
//! the credentials against the device with one status query, and stores a
//! [`ConfigEntry`] keyed by the device identifier.
//!
//! ```text
//! AwaitingInput --(valid, reachable, new device)--> Validated
//!   ^         |
//!   +---------+ (field errors, cannot_connect, unknown)
//! ```

mod form;

pub use form::{
    BASE_ERROR_KEY, FieldKind, FlowError, FormErrors, FormField, FormSchema, UserInput,
};

use std::sync::Arc;

use crate::client::{Connector, DeviceHandle};
use crate::entry::{ConfigEntry, ConfigEntryStore, CredentialRecord};
use crate::error::{Error, Result};

/// Step id of the credential form.
pub const STEP_USER: &str = "user";

/// Where a flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStep {
    /// The form is shown and waiting for (corrected) input.
    AwaitingInput,
    /// An entry was created; the flow is over.
    Validated,
}

/// Why a flow ended without creating an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortReason {
    /// An entry for this device already exists.
    AlreadyConfigured,
    /// The flow already created its entry.
    FlowFinished,
}

impl AbortReason {
    /// Returns the reason as the host's translation key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyConfigured => "already_configured",
            Self::FlowFinished => "flow_finished",
        }
    }
}

/// What the host should do after a flow step.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowResult {
    /// Show (or re-show) the form.
    ShowForm {
        /// Step the form belongs to.
        step_id: &'static str,
        /// Fields to render.
        schema: FormSchema,
        /// Errors from the previous submission.
        errors: FormErrors,
    },
    /// An entry was created and stored.
    CreateEntry {
        /// The stored entry.
        entry: ConfigEntry,
    },
    /// The flow ended without creating anything.
    Abort {
        /// Why.
        reason: AbortReason,
    },
}

impl FlowResult {
    fn form(errors: FormErrors) -> Self {
        Self::ShowForm {
            step_id: STEP_USER,
            schema: FormSchema::user(),
            errors,
        }
    }

    /// Returns the form errors, if the form is being shown.
    #[must_use]
    pub fn errors(&self) -> Option<&FormErrors> {
        match self {
            Self::ShowForm { errors, .. } => Some(errors),
            Self::CreateEntry { .. } | Self::Abort { .. } => None,
        }
    }
}

/// One run of the setup flow.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use grid_connect::client::{MemoryConnector, MemoryDevice};
/// use grid_connect::config_flow::{ConfigFlow, FlowResult, UserInput};
/// use grid_connect::entry::MemoryEntryStore;
///
/// # #[tokio::main]
/// # async fn main() {
/// let connector = Arc::new(MemoryConnector::new());
/// connector.add_device("10.0.0.2", MemoryDevice::new("bf01", "localkey"));
/// let store = Arc::new(MemoryEntryStore::new());
///
/// let mut flow = ConfigFlow::new(connector, Arc::clone(&store));
/// let result = flow
///     .step_user(Some(UserInput::new("Kettle", "10.0.0.2", "bf01", "localkey")))
///     .await;
///
/// match result {
///     FlowResult::CreateEntry { entry } => assert_eq!(entry.title, "Kettle"),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// assert_eq!(store.len(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigFlow<C: ?Sized, S: ?Sized> {
    connector: Arc<C>,
    store: Arc<S>,
    step: FlowStep,
}

impl<C, S> ConfigFlow<C, S>
where
    C: Connector + ?Sized,
    S: ConfigEntryStore + ?Sized,
{
    /// Starts a flow.
    #[must_use]
    pub fn new(connector: Arc<C>, store: Arc<S>) -> Self {
        Self {
            connector,
            store,
            step: FlowStep::AwaitingInput,
        }
    }

    /// Returns where the flow stands.
    #[must_use]
    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// Handles the credential step.
    ///
    /// With no input, shows the empty form. With input, validates the fields
    /// (no device I/O on field errors), then connects once with the candidate
    /// credentials. A reachable device that is not configured yet gets a new
    /// entry titled with the user's name.
    pub async fn step_user(&mut self, input: Option<UserInput>) -> FlowResult {
        if self.step == FlowStep::Validated {
            return FlowResult::Abort {
                reason: AbortReason::FlowFinished,
            };
        }

        let Some(input) = input else {
            return FlowResult::form(FormErrors::new());
        };

        let record = match input.validate() {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(?errors, "Credential form rejected");
                return FlowResult::form(errors);
            }
        };

        if let Err(e) = self.validate_connection(&record).await {
            let code = if let Error::Connection(_) = e {
                tracing::error!(
                    device_id = %record.device_id,
                    error = %e,
                    "Connection test failed"
                );
                FlowError::CannotConnect
            } else {
                tracing::error!(
                    device_id = %record.device_id,
                    error = ?e,
                    "Unexpected error during setup"
                );
                FlowError::Unknown
            };
            return FlowResult::form(FormErrors::from([(BASE_ERROR_KEY, code)]));
        }

        if self.store.find_by_unique_id(&record.device_id).is_some() {
            tracing::debug!(device_id = %record.device_id, "Device already configured");
            return FlowResult::Abort {
                reason: AbortReason::AlreadyConfigured,
            };
        }

        let entry = ConfigEntry::new(record);
        match self.store.insert(entry.clone()) {
            Ok(()) => {
                self.step = FlowStep::Validated;
                tracing::info!(
                    entry_id = %entry.entry_id,
                    title = %entry.title,
                    "Config entry created"
                );
                FlowResult::CreateEntry { entry }
            }
            Err(Error::DuplicateDevice { .. }) => FlowResult::Abort {
                reason: AbortReason::AlreadyConfigured,
            },
            Err(e) => {
                tracing::error!(error = ?e, "Storing config entry failed");
                FlowResult::form(FormErrors::from([(BASE_ERROR_KEY, FlowError::Unknown)]))
            }
        }
    }

    /// Connects with the candidate credentials; the handle is dropped again.
    async fn validate_connection(&self, record: &CredentialRecord) -> Result<()> {
        let handle = DeviceHandle::connect(Arc::clone(&self.connector), record).await?;
        tracing::debug!(device_id = %handle.device_id(), "Credentials validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Fault, MemoryConnector, MemoryDevice};
    use crate::entry::MemoryEntryStore;

    fn setup() -> (Arc<MemoryConnector>, Arc<MemoryDevice>, Arc<MemoryEntryStore>) {
        let connector = Arc::new(MemoryConnector::new());
        let device = connector.add_device("10.0.0.2", MemoryDevice::new("bf01", "localkey"));
        (connector, device, Arc::new(MemoryEntryStore::new()))
    }

    fn input() -> UserInput {
        UserInput::new("Kettle", "10.0.0.2", "bf01", "localkey")
    }

    #[tokio::test]
    async fn no_input_shows_empty_form() {
        let (connector, _device, store) = setup();
        let mut flow = ConfigFlow::new(connector, store);

        match flow.step_user(None).await {
            FlowResult::ShowForm {
                step_id,
                schema,
                errors,
            } => {
                assert_eq!(step_id, STEP_USER);
                assert_eq!(schema, FormSchema::user());
                assert!(errors.is_empty());
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(flow.step(), FlowStep::AwaitingInput);
    }

    #[tokio::test]
    async fn valid_input_creates_entry() {
        let (connector, _device, store) = setup();
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let result = flow.step_user(Some(input().with_protocol_version("3.4"))).await;

        let FlowResult::CreateEntry { entry } = result else {
            panic!("unexpected result: {result:?}");
        };
        assert_eq!(entry.unique_id, "bf01");
        assert_eq!(entry.title, "Kettle");
        assert_eq!(store.get(entry.entry_id), Some(entry));
        assert_eq!(flow.step(), FlowStep::Validated);
    }

    #[tokio::test]
    async fn unreachable_device_is_cannot_connect() {
        let (connector, device, store) = setup();
        device.inject_fault(Fault::Unreachable);
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let result = flow.step_user(Some(input())).await;

        assert_eq!(
            result.errors().and_then(|e| e.get(BASE_ERROR_KEY)),
            Some(&FlowError::CannotConnect)
        );
        assert!(store.is_empty());
        assert_eq!(flow.step(), FlowStep::AwaitingInput);
    }

    #[tokio::test]
    async fn wrong_key_is_cannot_connect() {
        let (connector, _device, store) = setup();
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let result = flow
            .step_user(Some(UserInput::new("Kettle", "10.0.0.2", "bf01", "wrong")))
            .await;

        assert_eq!(
            result.errors().and_then(|e| e.get(BASE_ERROR_KEY)),
            Some(&FlowError::CannotConnect)
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn library_panic_is_unknown() {
        let (connector, device, store) = setup();
        device.inject_fault(Fault::Crash);
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let result = flow.step_user(Some(input())).await;

        assert_eq!(
            result.errors().and_then(|e| e.get(BASE_ERROR_KEY)),
            Some(&FlowError::Unknown)
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn field_errors_skip_device_io() {
        let (connector, device, store) = setup();
        let mut flow = ConfigFlow::new(Arc::clone(&connector), store);

        let result = flow
            .step_user(Some(input().with_protocol_version("9.9")))
            .await;

        assert_eq!(
            result.errors().and_then(|e| e.get("protocol_version")),
            Some(&FlowError::InvalidProtocolVersion)
        );
        assert_eq!(connector.open_count(), 0);
        assert_eq!(device.status_count(), 0);
    }

    #[tokio::test]
    async fn retry_after_failure_succeeds() {
        let (connector, device, store) = setup();
        device.inject_fault(Fault::EmptyReply);
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let first = flow.step_user(Some(input())).await;
        assert!(first.errors().is_some());

        device.clear_fault();
        let second = flow.step_user(Some(input())).await;
        assert!(matches!(second, FlowResult::CreateEntry { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn second_flow_for_same_device_aborts() {
        let (connector, _device, store) = setup();

        let mut first = ConfigFlow::new(Arc::clone(&connector), Arc::clone(&store));
        assert!(matches!(
            first.step_user(Some(input())).await,
            FlowResult::CreateEntry { .. }
        ));

        let mut second = ConfigFlow::new(connector, Arc::clone(&store));
        let result = second
            .step_user(Some(UserInput::new("Other name", "10.0.0.2", "bf01", "localkey")))
            .await;

        assert_eq!(
            result,
            FlowResult::Abort {
                reason: AbortReason::AlreadyConfigured
            }
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn finished_flow_cannot_be_reused() {
        let (connector, _device, store) = setup();
        let mut flow = ConfigFlow::new(connector, store);
        flow.step_user(Some(input())).await;

        let result = flow.step_user(None).await;

        assert_eq!(
            result,
            FlowResult::Abort {
                reason: AbortReason::FlowFinished
            }
        );
    }
}
