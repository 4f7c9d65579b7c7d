// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The credential form: schema, raw input, and per-field validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::{CredentialRecord, LocalKey};
use crate::types::{DataPoint, ProtocolVersion};

/// Key under which errors not tied to one field are reported.
pub const BASE_ERROR_KEY: &str = "base";

/// Error codes shown next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowError {
    /// A required field was left blank.
    Required,
    /// The protocol version is not one of the offered options.
    InvalidProtocolVersion,
    /// A data-point index is not a positive integer.
    InvalidDataPoint,
    /// The device could not be reached or rejected the credentials.
    CannotConnect,
    /// Anything else; the details are in the log.
    Unknown,
}

impl FlowError {
    /// Returns the code as the host's translation key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidProtocolVersion => "invalid_protocol_version",
            Self::InvalidDataPoint => "invalid_data_point",
            Self::CannotConnect => "cannot_connect",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors keyed by field name, or by [`BASE_ERROR_KEY`].
pub type FormErrors = BTreeMap<&'static str, FlowError>;

/// How a form field is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Free text that must not be echoed.
    Secret,
    /// One of a fixed set of options.
    Select(Vec<&'static str>),
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Field name, also the key in [`UserInput`].
    pub name: &'static str,
    /// Whether the field must be filled in.
    pub required: bool,
    /// Value pre-filled when the form is first shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    /// Rendering hint.
    pub kind: FieldKind,
}

impl FormField {
    fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            default: None,
            kind,
        }
    }

    fn optional(name: &'static str, default: Option<&'static str>, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            default,
            kind,
        }
    }
}

/// Description of a form, as shown by the host.
///
/// # Examples
///
/// ```
/// use grid_connect::config_flow::{FieldKind, FormSchema};
///
/// let schema = FormSchema::user();
/// let version = schema.field("protocol_version").unwrap();
/// assert_eq!(version.default, Some("3.3"));
/// assert_eq!(version.kind, FieldKind::Select(vec!["3.1", "3.3", "3.4"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    /// Fields in display order.
    pub fields: Vec<FormField>,
}

impl FormSchema {
    /// Returns the schema of the single credential step.
    #[must_use]
    pub fn user() -> Self {
        let versions = ProtocolVersion::ALL.iter().map(ProtocolVersion::as_str).collect();
        Self {
            fields: vec![
                FormField::required("name", FieldKind::Text),
                FormField::required("host", FieldKind::Text),
                FormField::required("device_id", FieldKind::Text),
                FormField::required("local_key", FieldKind::Secret),
                FormField::optional(
                    "protocol_version",
                    Some(ProtocolVersion::default().as_str()),
                    FieldKind::Select(versions),
                ),
                FormField::optional("dps_switch", Some("1"), FieldKind::Text),
                FormField::optional("dps_brightness", None, FieldKind::Text),
                FormField::optional("dps_color_temp", None, FieldKind::Text),
            ],
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Raw values submitted through the credential form.
///
/// Everything is text, exactly as the host collected it; [`validate`]
/// turns it into a [`CredentialRecord`].
///
/// [`validate`]: Self::validate
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserInput {
    /// Display name.
    pub name: String,
    /// Device host name or IP address.
    pub host: String,
    /// Device identifier.
    pub device_id: String,
    /// Pre-shared local key.
    pub local_key: LocalKey,
    /// Protocol version; "3.3" when omitted.
    pub protocol_version: Option<String>,
    /// Switch data point; "1" when omitted.
    pub dps_switch: Option<String>,
    /// Brightness data point.
    pub dps_brightness: Option<String>,
    /// Color temperature data point.
    pub dps_color_temp: Option<String>,
}

impl UserInput {
    /// Creates input with the four required fields.
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
            ..Self::default()
        }
    }

    /// Sets the protocol version field.
    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = Some(version.into());
        self
    }

    /// Sets the switch data-point field.
    #[must_use]
    pub fn with_dps_switch(mut self, dp: impl Into<String>) -> Self {
        self.dps_switch = Some(dp.into());
        self
    }

    /// Sets the light data-point fields.
    #[must_use]
    pub fn with_light_dps(
        mut self,
        brightness: impl Into<String>,
        color_temp: Option<&str>,
    ) -> Self {
        self.dps_brightness = Some(brightness.into());
        self.dps_color_temp = color_temp.map(str::to_string);
        self
    }

    /// Checks every field and builds the credential record.
    ///
    /// Text fields are trimmed; blank optional fields count as omitted.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its [`FlowError`] code.
    pub fn validate(&self) -> Result<CredentialRecord, FormErrors> {
        let mut errors = FormErrors::new();

        let name = required(&mut errors, "name", &self.name);
        let host = required(&mut errors, "host", &self.host);
        let device_id = required(&mut errors, "device_id", &self.device_id);
        if self.local_key.is_blank() {
            errors.insert("local_key", FlowError::Required);
        }
        let local_key = LocalKey::new(self.local_key.expose_secret().trim());

        let protocol_version = optional::<ProtocolVersion>(
            &mut errors,
            "protocol_version",
            self.protocol_version.as_deref(),
            FlowError::InvalidProtocolVersion,
        )
        .unwrap_or_default();
        let dps_switch = data_point(&mut errors, "dps_switch", self.dps_switch.as_deref())
            .unwrap_or_default();
        let dps_brightness =
            data_point(&mut errors, "dps_brightness", self.dps_brightness.as_deref());
        let dps_color_temp =
            data_point(&mut errors, "dps_color_temp", self.dps_color_temp.as_deref());

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CredentialRecord {
            name,
            host,
            device_id,
            local_key,
            protocol_version,
            dps_switch,
            dps_brightness,
            dps_color_temp,
        })
    }
}

fn required(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, FlowError::Required);
    }
    value.to_string()
}

/// Parses a non-blank optional field, recording `invalid` when it fails.
fn optional<T: FromStr>(
    errors: &mut FormErrors,
    field: &'static str,
    value: Option<&str>,
    invalid: FlowError,
) -> Option<T> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.insert(field, invalid);
            None
        }
    }
}

fn data_point(
    errors: &mut FormErrors,
    field: &'static str,
    value: Option<&str>,
) -> Option<DataPoint> {
    optional(errors, field, value, FlowError::InvalidDataPoint)
}
