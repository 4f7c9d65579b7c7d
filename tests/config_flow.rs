// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the setup flow against simulated devices.

use std::sync::Arc;

use grid_connect::client::{Fault, MemoryConnector, MemoryDevice};
use grid_connect::config_flow::{
    AbortReason, BASE_ERROR_KEY, ConfigFlow, FlowError, FlowResult, FlowStep, UserInput,
};
use grid_connect::entry::{ConfigEntry, ConfigEntryStore, MemoryEntryStore};
use grid_connect::types::{DataPoint, ProtocolVersion};
use serde_json::json;

const HOST: &str = "192.168.1.40";
const DEVICE_ID: &str = "bf12ab34cd56ef7890";
const LOCAL_KEY: &str = "0123456789abcdef";

fn fixture() -> (Arc<MemoryConnector>, Arc<MemoryDevice>, Arc<MemoryEntryStore>) {
    let connector = Arc::new(MemoryConnector::new());
    let device = connector.add_device(HOST, MemoryDevice::new(DEVICE_ID, LOCAL_KEY));
    (connector, device, Arc::new(MemoryEntryStore::new()))
}

fn valid_input() -> UserInput {
    UserInput::new("Kettle", HOST, DEVICE_ID, LOCAL_KEY)
}

fn base_error(result: &FlowResult) -> Option<FlowError> {
    result
        .errors()
        .and_then(|errors| errors.get(BASE_ERROR_KEY))
        .copied()
}

// ============================================================================
// Successful setup
// ============================================================================

mod success {
    use super::*;

    #[tokio::test]
    async fn persists_exactly_one_record() {
        let (connector, _device, store) = fixture();
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let result = flow.step_user(Some(valid_input())).await;

        let FlowResult::CreateEntry { entry } = result else {
            panic!("expected an entry, got {result:?}");
        };
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_unique_id(DEVICE_ID), Some(entry.clone()));
        assert_eq!(entry.data.device_id, DEVICE_ID);
        assert_eq!(entry.data.protocol_version, ProtocolVersion::V33);
        assert_eq!(flow.step(), FlowStep::Validated);
    }

    #[tokio::test]
    async fn connects_exactly_once() {
        let (connector, device, store) = fixture();
        let mut flow = ConfigFlow::new(Arc::clone(&connector), store);

        flow.step_user(Some(valid_input())).await;

        assert_eq!(connector.open_count(), 1);
        assert_eq!(device.status_count(), 1);
    }

    #[tokio::test]
    async fn light_fields_are_stored() {
        let (connector, _device, store) = fixture();
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let input = valid_input()
            .with_protocol_version("3.4")
            .with_light_dps("2", Some("3"));
        let result = flow.step_user(Some(input)).await;

        let FlowResult::CreateEntry { entry } = result else {
            panic!("expected an entry, got {result:?}");
        };
        assert_eq!(entry.data.protocol_version, ProtocolVersion::V34);
        assert_eq!(entry.data.dps_brightness, Some(DataPoint::BRIGHTNESS));
        assert_eq!(entry.data.dps_color_temp, Some(DataPoint::COLOR_TEMP));
    }

    #[tokio::test]
    async fn stored_entry_uses_documented_keys() {
        let (connector, _device, store) = fixture();
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));
        flow.step_user(Some(valid_input())).await;

        let entry = store.find_by_unique_id(DEVICE_ID).unwrap();
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["version"], 1);
        assert_eq!(json["title"], "Kettle");
        assert_eq!(json["data"]["host"], HOST);
        assert_eq!(json["data"]["local_key"], LOCAL_KEY);
        assert_eq!(json["data"]["protocol_version"], "3.3");
        assert_eq!(json["data"]["dps_switch"], "1");
        assert!(json["data"].get("dps_brightness").is_none());

        let restored: ConfigEntry = serde_json::from_value(json).unwrap();
        assert_eq!(restored, entry);
    }

    #[tokio::test]
    async fn debug_output_never_shows_the_key() {
        let (connector, _device, store) = fixture();
        let input = valid_input();
        assert!(!format!("{input:?}").contains(LOCAL_KEY));

        let mut flow = ConfigFlow::new(connector, store);
        let result = flow.step_user(Some(input)).await;

        assert!(matches!(result, FlowResult::CreateEntry { .. }));
        assert!(!format!("{result:?}").contains(LOCAL_KEY));
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn transport_failure_is_cannot_connect() {
        for fault in [
            Fault::Unreachable,
            Fault::EmptyReply,
            Fault::ErrorReply("Network Error: Device Unreachable".to_string()),
        ] {
            let (connector, device, store) = fixture();
            device.inject_fault(fault.clone());
            let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

            let result = flow.step_user(Some(valid_input())).await;

            assert_eq!(base_error(&result), Some(FlowError::CannotConnect), "{fault:?}");
            assert!(store.is_empty(), "{fault:?}");
        }
    }

    #[tokio::test]
    async fn non_mapping_status_is_cannot_connect() {
        for raw in [json!(42), json!(true), json!("ok"), json!([1])] {
            let (connector, device, store) = fixture();
            device.inject_fault(Fault::RawReply(raw.clone()));
            let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

            let result = flow.step_user(Some(valid_input())).await;

            assert_eq!(base_error(&result), Some(FlowError::CannotConnect), "{raw}");
            assert!(store.is_empty(), "{raw}");
        }
    }

    #[tokio::test]
    async fn unknown_host_is_cannot_connect() {
        let (connector, _device, store) = fixture();
        let mut flow = ConfigFlow::new(connector, Arc::clone(&store));

        let result = flow
            .step_user(Some(UserInput::new("Kettle", "192.168.1.99", DEVICE_ID, LOCAL_KEY)))
            .await;

        assert_eq!(base_error(&result), Some(FlowError::CannotConnect));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn schema_errors_never_touch_the_device() {
        let (connector, device, store) = fixture();
        let mut flow = ConfigFlow::new(Arc::clone(&connector), Arc::clone(&store));

        let result = flow
            .step_user(Some(UserInput::new("", HOST, DEVICE_ID, LOCAL_KEY).with_dps_switch("x")))
            .await;

        let errors = result.errors().unwrap();
        assert_eq!(errors.get("name"), Some(&FlowError::Required));
        assert_eq!(errors.get("dps_switch"), Some(&FlowError::InvalidDataPoint));
        assert!(errors.get(BASE_ERROR_KEY).is_none());
        assert_eq!(connector.open_count(), 0);
        assert_eq!(device.status_count(), 0);
        assert!(store.is_empty());
    }
}

// ============================================================================
// Uniqueness
// ============================================================================

mod uniqueness {
    use super::*;

    #[tokio::test]
    async fn second_setup_of_same_device_aborts() {
        let (connector, _device, store) = fixture();

        let mut first = ConfigFlow::new(Arc::clone(&connector), Arc::clone(&store));
        assert!(matches!(
            first.step_user(Some(valid_input())).await,
            FlowResult::CreateEntry { .. }
        ));

        let mut second = ConfigFlow::new(connector, Arc::clone(&store));
        let result = second
            .step_user(Some(UserInput::new("Kettle again", HOST, DEVICE_ID, LOCAL_KEY)))
            .await;

        assert_eq!(
            result,
            FlowResult::Abort {
                reason: AbortReason::AlreadyConfigured
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].title, "Kettle");
    }

    #[tokio::test]
    async fn different_devices_get_separate_entries() {
        let (connector, _device, store) = fixture();
        connector.add_device("192.168.1.41", MemoryDevice::new("bf99", LOCAL_KEY));

        let mut first = ConfigFlow::new(Arc::clone(&connector), Arc::clone(&store));
        first.step_user(Some(valid_input())).await;
        let mut second = ConfigFlow::new(connector, Arc::clone(&store));
        second
            .step_user(Some(UserInput::new("Lamp", "192.168.1.41", "bf99", LOCAL_KEY)))
            .await;

        assert_eq!(store.len(), 2);
    }
}
