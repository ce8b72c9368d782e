/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    boot::Boot, impl_entity, impl_resource, Certificate, Entity, Link, LinkCollection, Manager,
    PowerState, ResetType, Resource, ResourceStatus, TrustedComponent,
};
use crate::{action::ActionTarget, collection, model::ActionInfo, task::TaskMonitor, RedfishError};

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessorSummary {
    pub count: Option<i64>,
    pub logical_processor_count: Option<i64>,
    pub model: Option<String>,
    pub status: Option<ResourceStatus>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct MemorySummary {
    #[serde(rename = "TotalSystemMemoryGiB")]
    pub total_system_memory_gib: Option<f64>,
    pub status: Option<ResourceStatus>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TrustedModule {
    pub firmware_version: Option<String>,
    pub interface_type: Option<String>,
    pub status: Option<ResourceStatus>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PowerRestorePolicy {
    AlwaysOn,
    AlwaysOff,
    LastState,
}

/// https://redfish.dmtf.org/schemas/v1/ComputerSystem.v1_20_1.json
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerSystem {
    #[serde(flatten)]
    pub entity: Entity,
    pub asset_tag: Option<String>,
    pub bios_version: Option<String>,
    pub boot: Option<Boot>,
    pub host_name: Option<String>,
    #[serde(rename = "IndicatorLED")]
    pub indicator_led: Option<String>,
    pub location_indicator_active: Option<bool>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub part_number: Option<String>,
    pub power_cycle_delay_seconds: Option<f64>,
    pub power_off_delay_seconds: Option<f64>,
    pub power_on_delay_seconds: Option<f64>,
    pub power_mode: Option<String>,
    pub power_restore_policy: Option<PowerRestorePolicy>,
    pub power_state: Option<PowerState>,
    pub processor_summary: Option<ProcessorSummary>,
    pub memory_summary: Option<MemorySummary>,
    #[serde(rename = "SKU")]
    pub sku: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<ResourceStatus>,
    pub system_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trusted_modules: Vec<TrustedModule>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,

    #[serde(skip)]
    reset: ActionTarget,
    #[serde(skip)]
    set_default_boot_order: ActionTarget,
    #[serde(skip)]
    boot_options: Link,
    #[serde(skip)]
    certificates: Link,
    #[serde(skip)]
    chassis: LinkCollection,
    #[serde(skip)]
    managed_by: LinkCollection,
    #[serde(skip)]
    trusted_components: LinkCollection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerSystemLinks {
    #[serde(default)]
    actions: SystemActions,
    #[serde(default)]
    links: SystemLinkSet,
    #[serde(default)]
    certificates: Link,
    #[serde(default)]
    boot: SystemBootLinks,
}

#[derive(Debug, Default, Deserialize)]
struct SystemActions {
    #[serde(rename = "#ComputerSystem.Reset", default)]
    reset: ActionTarget,
    #[serde(rename = "#ComputerSystem.SetDefaultBootOrder", default)]
    set_default_boot_order: ActionTarget,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SystemLinkSet {
    #[serde(default)]
    chassis: LinkCollection,
    #[serde(default)]
    managed_by: LinkCollection,
    #[serde(default)]
    trusted_components: LinkCollection,
}

// Boot.BootOptions is a navigation link nested in an otherwise plain object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SystemBootLinks {
    #[serde(default)]
    boot_options: Link,
}

impl Resource for ComputerSystem {
    const WRITABLE: &'static [&'static str] = &[
        "AssetTag",
        "HostName",
        "IndicatorLED",
        "LocationIndicatorActive",
        "PowerCycleDelaySeconds",
        "PowerMode",
        "PowerOffDelaySeconds",
        "PowerOnDelaySeconds",
        "PowerRestorePolicy",
        "Boot.AutomaticRetryAttempts",
        "Boot.AutomaticRetryConfig",
        "Boot.BootNext",
        "Boot.BootOrder",
        "Boot.BootSourceOverrideEnabled",
        "Boot.BootSourceOverrideMode",
        "Boot.BootSourceOverrideTarget",
        "Boot.HttpBootUri",
        "Boot.TrustedModuleRequiredToBoot",
        "Boot.UefiTargetBootSourceOverride",
    ];

    type Links = ComputerSystemLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: ComputerSystemLinks) {
        self.reset = links.actions.reset;
        self.set_default_boot_order = links.actions.set_default_boot_order;
        self.boot_options = links.boot.boot_options;
        self.certificates = links.certificates;
        self.chassis = links.links.chassis;
        self.managed_by = links.links.managed_by;
        self.trusted_components = links.links.trusted_components;
    }
}

impl ComputerSystem {
    /// Resets the system. Services that advertise no reset types get the
    /// request unchecked.
    pub fn reset(&self, reset_type: ResetType) -> Result<Option<TaskMonitor>, RedfishError> {
        if !self.reset.is_supported() {
            return Err(RedfishError::UnsupportedAction {
                action: "Reset".to_string(),
                resource: self.entity.odata_id.clone(),
            });
        }
        self.reset
            .check_parameter(&self.entity, "Reset", "ResetType", &reset_type.to_string())?;
        self.reset
            .invoke(&self.entity, "Reset", &json!({"ResetType": reset_type}))
    }

    pub fn supported_reset_types(&self) -> Result<Vec<ResetType>, RedfishError> {
        Ok(self
            .reset
            .supported_values(&self.entity, "Reset", "ResetType")?
            .iter()
            .filter_map(|v| v.parse().ok())
            .collect())
    }

    pub fn reset_action_info(&self) -> Result<&ActionInfo, RedfishError> {
        self.reset.action_info(&self.entity, "Reset")
    }

    pub fn set_default_boot_order(&self) -> Result<Option<TaskMonitor>, RedfishError> {
        self.set_default_boot_order.invoke(
            &self.entity,
            "SetDefaultBootOrder",
            &serde_json::Map::new(),
        )
    }

    pub fn boot_options(&self) -> Result<Vec<BootOption>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.boot_options.as_str())
    }

    pub fn certificates(&self) -> Result<Vec<Certificate>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.certificates.as_str())
    }

    pub fn managed_by(&self) -> Result<Vec<Manager>, RedfishError> {
        collection::get_objects(self.entity.client()?, &self.managed_by.uris())
    }

    pub fn trusted_components(&self) -> Result<Vec<TrustedComponent>, RedfishError> {
        collection::get_objects(self.entity.client()?, &self.trusted_components.uris())
    }

    pub fn chassis_uris(&self) -> Vec<String> {
        self.chassis.uris()
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct BootOption {
    #[serde(flatten)]
    pub entity: Entity,
    pub boot_option_enabled: Option<bool>,
    pub boot_option_reference: Option<String>,
    pub display_name: Option<String>,
    pub uefi_device_path: Option<String>,
}

impl_resource!(BootOption);

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use reqwest::{Method, StatusCode};
    use serde_json::Value;

    use super::*;
    use crate::{
        decode,
        model::boot::{BootSourceOverrideEnabled, BootSourceOverrideTarget},
        network::Response,
        test_client::TestClient,
        update::{patch_body, UpdateOutcome},
        Client,
    };

    const SYSTEM: &str = include_str!("testdata/system.json");
    const URI: &str = "/redfish/v1/Systems/437XR1138R2";

    fn fetch(tc: &Arc<TestClient>) -> ComputerSystem {
        tc.on_get(URI, SYSTEM);
        let client: Client = tc.clone();
        decode::get_object(&client, URI).unwrap()
    }

    #[test]
    fn test_system_parser() {
        let tc = Arc::new(TestClient::new());
        let s = fetch(&tc);
        assert_eq!(s.power_state, Some(PowerState::On));
        assert_eq!(s.processor_summary.as_ref().unwrap().count, Some(2));
        assert_eq!(s.chassis_uris(), vec!["/redfish/v1/Chassis/1U"]);
        let boot = s.boot.as_ref().unwrap();
        assert_eq!(boot.boot_order, vec!["Boot0001", "Boot0002"]);
        assert_eq!(
            boot.boot_source_override_target,
            Some(BootSourceOverrideTarget::None)
        );
        assert_eq!(s.entity.oem, Some(serde_json::json!({"Contoso": {"PowerOnHours": 3816}})));
    }

    // Nested writable settings are sent under their parent, and nothing else
    // under it.
    #[test]
    fn test_boot_override_patch() {
        let tc = Arc::new(TestClient::new());
        let mut s = fetch(&tc);
        tc.on(Method::PATCH, URI, Response::new(StatusCode::NO_CONTENT));
        let boot = s.boot.as_mut().unwrap();
        boot.set_override(BootSourceOverrideTarget::Pxe, BootSourceOverrideEnabled::Once);
        s.asset_tag = Some("rack-7".to_string());
        s.bios_version = Some("not writable".to_string());

        assert!(matches!(s.update().unwrap(), UpdateOutcome::Applied));
        assert_eq!(
            tc.calls_for(&Method::PATCH)[0].body,
            Some(serde_json::json!({
                "AssetTag": "rack-7",
                "Boot": {"BootSourceOverrideEnabled": "Once", "BootSourceOverrideTarget": "Pxe"}
            }))
        );
        assert!(patch_body(&s).unwrap().is_empty());
    }

    #[test]
    fn test_boot_order_whole_array() {
        let tc = Arc::new(TestClient::new());
        let mut s = fetch(&tc);
        s.boot.as_mut().unwrap().boot_order.reverse();
        assert_eq!(
            Value::Object(patch_body(&s).unwrap()),
            serde_json::json!({"Boot": {"BootOrder": ["Boot0002", "Boot0001"]}})
        );
    }

    // No inline list: the ActionInfo decides.
    #[test]
    fn test_reset_with_action_info() {
        let tc = Arc::new(TestClient::new());
        let s = fetch(&tc);
        tc.on_get(
            "/redfish/v1/Systems/437XR1138R2/ResetActionInfo",
            include_str!("testdata/action_info.json"),
        );
        tc.on(
            Method::POST,
            "/redfish/v1/Systems/437XR1138R2/Actions/ComputerSystem.Reset",
            Response::new(StatusCode::NO_CONTENT),
        );
        assert_eq!(
            s.supported_reset_types().unwrap(),
            vec![ResetType::GracefulRestart, ResetType::ForceRestart]
        );
        assert!(s.reset(ResetType::On).is_err());
        assert!(s.reset(ResetType::ForceRestart).unwrap().is_none());
        assert_eq!(tc.calls_for(&Method::POST).len(), 1);
        assert_eq!(tc.calls_for(&Method::GET).len(), 2);
    }

    #[test]
    fn test_boot_options() {
        let tc = Arc::new(TestClient::new());
        let s = fetch(&tc);
        tc.on_get(
            "/redfish/v1/Systems/437XR1138R2/BootOptions",
            r#"{"Members": [{"@odata.id": "/redfish/v1/Systems/437XR1138R2/BootOptions/1",
                             "Id": "1", "Name": "Network", "BootOptionReference": "Boot0001",
                             "DisplayName": "PXE IPv4", "BootOptionEnabled": true}]}"#,
        );
        let options = s.boot_options().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].entity.name, "Network");
        assert_eq!(options[0].boot_option_reference.as_deref(), Some("Boot0001"));
    }

    #[test]
    fn test_writable_round_trip() {
        crate::update::assert_writable_round_trip::<ComputerSystem>(serde_json::json!({
            "@odata.id": "/redfish/v1/Systems/1",
            "Id": "1",
            "AssetTag": "rack-7",
            "HostName": "node7",
            "IndicatorLED": "Blinking",
            "LocationIndicatorActive": true,
            "PowerCycleDelaySeconds": 2.5,
            "PowerMode": "Balanced",
            "PowerOffDelaySeconds": 0.5,
            "PowerOnDelaySeconds": 1.5,
            "PowerRestorePolicy": "LastState",
            "Boot": {
                "AutomaticRetryAttempts": 3,
                "AutomaticRetryConfig": "RetryAttempts",
                "BootNext": "Boot0003",
                "BootOrder": ["Boot0003", "Boot0001"],
                "BootSourceOverrideEnabled": "Once",
                "BootSourceOverrideMode": "UEFI",
                "BootSourceOverrideTarget": "UefiHttp",
                "HttpBootUri": "http://10.0.0.1/boot.efi",
                "TrustedModuleRequiredToBoot": "Required",
                "UefiTargetBootSourceOverride": "PciRoot(0x0)"
            }
        }));
    }
}
