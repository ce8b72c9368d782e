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
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    impl_entity, Certificate, ComputerSystem, Entity, Link, LinkCollection, PowerState, ResetType,
    Resource, ResourceStatus, VirtualMedia,
};
use crate::{
    action::ActionTarget, collection, decode, model::ActionInfo, task::TaskMonitor, RedfishError,
};

/// https://redfish.dmtf.org/schemas/v1/Manager.v1_19_0.json
/// A BMC, enclosure manager or other management controller.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manager {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "AutoDSTEnabled")]
    pub auto_dst_enabled: Option<bool>,
    pub date_time: Option<String>,
    pub date_time_local_offset: Option<String>,
    pub date_time_source: Option<DateTimeSource>,
    pub firmware_version: Option<String>,
    pub last_reset_time: Option<String>,
    pub location_indicator_active: Option<bool>,
    pub manager_type: Option<ManagerType>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub part_number: Option<String>,
    pub power_state: Option<PowerState>,
    pub ready_to_remove: Option<bool>,
    pub serial_number: Option<String>,
    pub service_identification: Option<String>,
    pub service_use_notification: Option<String>,
    pub status: Option<ResourceStatus>,
    pub time_zone_name: Option<String>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,
    pub command_shell: Option<ConsoleService>,
    pub graphical_console: Option<ConsoleService>,
    pub serial_console: Option<ConsoleService>,

    #[serde(skip)]
    reset: ActionTarget,
    #[serde(skip)]
    reset_to_defaults: ActionTarget,
    #[serde(skip)]
    force_failover: ActionTarget,
    #[serde(skip)]
    links: ManagerLinkSet,
    #[serde(skip)]
    certificates: Link,
    #[serde(skip)]
    ethernet_interfaces: Link,
    #[serde(skip)]
    log_services: Link,
    #[serde(skip)]
    network_protocol: Link,
    #[serde(skip)]
    virtual_media: Link,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ConsoleService {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connect_types_supported: Vec<String>,
    pub max_concurrent_sessions: Option<i64>,
    pub service_enabled: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ManagerType {
    ManagementController,
    EnclosureManager,
    #[serde(rename = "BMC")]
    Bmc,
    RackManager,
    AuxiliaryController,
    Service,
    FabricManager,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeSource {
    #[serde(rename = "RTC")]
    Rtc,
    Firmware,
    Host,
    #[serde(rename = "NTP")]
    Ntp,
    #[serde(rename = "PTP")]
    Ptp,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ResetToDefaultsType {
    ResetAll,
    PreserveNetworkAndUsers,
    PreserveNetwork,
}

impl fmt::Display for ResetToDefaultsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerLinks {
    #[serde(default)]
    actions: ManagerActions,
    #[serde(default)]
    links: ManagerLinkSet,
    #[serde(default)]
    certificates: Link,
    #[serde(default)]
    ethernet_interfaces: Link,
    #[serde(default)]
    log_services: Link,
    #[serde(default)]
    network_protocol: Link,
    #[serde(default)]
    virtual_media: Link,
}

#[derive(Debug, Default, Deserialize)]
struct ManagerActions {
    #[serde(rename = "#Manager.Reset", default)]
    reset: ActionTarget,
    #[serde(rename = "#Manager.ResetToDefaults", default)]
    reset_to_defaults: ActionTarget,
    #[serde(rename = "#Manager.ForceFailover", default)]
    force_failover: ActionTarget,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ManagerLinkSet {
    #[serde(default)]
    managed_by: LinkCollection,
    #[serde(default)]
    manager_for_chassis: LinkCollection,
    #[serde(default)]
    manager_for_servers: LinkCollection,
    #[serde(default)]
    manager_for_managers: LinkCollection,
    #[serde(default)]
    manager_in_chassis: Link,
}

impl Resource for Manager {
    const WRITABLE: &'static [&'static str] = &[
        "AutoDSTEnabled",
        "DateTime",
        "DateTimeLocalOffset",
        "DateTimeSource",
        "LocationIndicatorActive",
        "ReadyToRemove",
        "ServiceIdentification",
        "ServiceUseNotification",
        "TimeZoneName",
    ];

    type Links = ManagerLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: ManagerLinks) {
        self.reset = links.actions.reset;
        self.reset_to_defaults = links.actions.reset_to_defaults;
        self.force_failover = links.actions.force_failover;
        self.links = links.links;
        self.certificates = links.certificates;
        self.ethernet_interfaces = links.ethernet_interfaces;
        self.log_services = links.log_services;
        self.network_protocol = links.network_protocol;
        self.virtual_media = links.virtual_media;
    }
}

impl Manager {
    /// Resets the manager. The reset type is checked against what the
    /// manager advertises, inline or through its ActionInfo, before anything
    /// is sent.
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

    /// Reset types the manager accepts. Values this crate does not know are
    /// left out. Empty when the manager does not say.
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

    pub fn reset_to_defaults(
        &self,
        reset_type: ResetToDefaultsType,
    ) -> Result<Option<TaskMonitor>, RedfishError> {
        self.reset_to_defaults.check_parameter(
            &self.entity,
            "ResetToDefaults",
            "ResetType",
            &reset_type.to_string(),
        )?;
        self.reset_to_defaults.invoke(
            &self.entity,
            "ResetToDefaults",
            &json!({"ResetType": reset_type}),
        )
    }

    pub fn reset_to_defaults_action_info(&self) -> Result<&ActionInfo, RedfishError> {
        self.reset_to_defaults
            .action_info(&self.entity, "ResetToDefaults")
    }

    /// Makes `new_manager` the active one of a redundant pair.
    pub fn force_failover(&self, new_manager: &str) -> Result<Option<TaskMonitor>, RedfishError> {
        self.force_failover.invoke(
            &self.entity,
            "ForceFailover",
            &json!({"NewManager": Link::new(new_manager)}),
        )
    }

    pub fn managed_by(&self) -> Result<Vec<Manager>, RedfishError> {
        collection::get_objects(self.entity.client()?, &self.links.managed_by.uris())
    }

    pub fn manager_for_servers(&self) -> Result<Vec<ComputerSystem>, RedfishError> {
        collection::get_objects(self.entity.client()?, &self.links.manager_for_servers.uris())
    }

    pub fn manager_for_server_uris(&self) -> Vec<String> {
        self.links.manager_for_servers.uris()
    }

    pub fn manager_for_chassis_uris(&self) -> Vec<String> {
        self.links.manager_for_chassis.uris()
    }

    pub fn manager_for_manager_uris(&self) -> Vec<String> {
        self.links.manager_for_managers.uris()
    }

    pub fn manager_in_chassis_uri(&self) -> Option<&str> {
        self.links.manager_in_chassis.uri()
    }

    pub fn certificates(&self) -> Result<Vec<Certificate>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.certificates.as_str())
    }

    pub fn virtual_media(&self) -> Result<Vec<VirtualMedia>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.virtual_media.as_str())
    }

    pub fn ethernet_interfaces_uri(&self) -> Option<&str> {
        self.ethernet_interfaces.uri()
    }

    pub fn log_services_uri(&self) -> Option<&str> {
        self.log_services.uri()
    }

    pub fn network_protocol_uri(&self) -> Option<&str> {
        self.network_protocol.uri()
    }
}

/// Fetches a Manager.
pub fn get_manager(client: &crate::Client, uri: &str) -> Result<Manager, RedfishError> {
    decode::get_object(client, uri)
}
