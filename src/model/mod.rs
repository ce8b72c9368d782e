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
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod account_service;
pub mod action_info;
pub mod boot;
pub mod certificate;
pub mod data_storage_los_capabilities;
pub mod link;
pub mod manager;
pub mod resource;
pub mod service_root;
pub mod session;
pub mod system;
pub mod task;
pub mod trusted_component;
pub mod virtual_media;

pub use account_service::{AccountService, ManagerAccount};
pub use action_info::ActionInfo;
pub use certificate::Certificate;
pub use data_storage_los_capabilities::DataStorageLoSCapabilities;
pub use link::{Link, LinkCollection};
pub use manager::Manager;
pub use resource::{Entity, NoLinks, Resource};
pub(crate) use resource::{impl_entity, impl_resource};
pub use service_root::ServiceRoot;
pub use session::Session;
pub use system::ComputerSystem;
pub use task::Task;
pub use trusted_component::TrustedComponent;
pub use virtual_media::VirtualMedia;

#[derive(Debug)]
pub struct InvalidValueError(pub String);

impl std::error::Error for InvalidValueError {}

impl fmt::Display for InvalidValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Resource.ResetType, shared by the Reset action of systems, managers and chassis.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetType {
    On,
    ForceOff,
    GracefulShutdown,
    GracefulRestart,
    ForceRestart,
    Nmi,
    ForceOn,
    PushPowerButton,
    PowerCycle,
    Suspend,
    Pause,
    Resume,
    FullPowerCycle,
}

impl fmt::Display for ResetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for ResetType {
    type Err = InvalidValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| InvalidValueError(format!("Invalid ResetType value: {s}")))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
    PoweringOff,
    PoweringOn,
    Paused,
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceStatus {
    pub health: Option<ResourceHealth>,
    pub health_rollup: Option<ResourceHealth>,
    pub state: Option<ResourceState>,
}

/// Health of a resource or of the operation a task represents.
/// Defined in Resource_v1.xml
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq, Eq)]
pub enum ResourceHealth {
    #[serde(rename = "OK")]
    #[default]
    Ok,
    Warning,
    Critical,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ResourceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Defined in Resource_v1.xml
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub enum ResourceState {
    Enabled,
    Disabled,
    Degraded,
    Standby,
    StandbyOffline,
    StandbySpare,
    InTest,
    Starting,
    Absent,
    UnavailableOffline,
    Deferring,
    Quiesced,
    Updating,
    Qualified,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// https://redfish.dmtf.org/schemas/v1/Message.v1_1_2.json
/// One entry of `@Message.ExtendedInfo`, or of a Task's `Messages`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub message_args: Vec<String>,
    #[serde(default)]
    pub message_id: String,
    pub resolution: Option<String>,
    pub severity: Option<String>,
    pub message_severity: Option<ResourceHealth>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reset_type_from_str() {
        assert_eq!("GracefulRestart".parse::<ResetType>().unwrap(), ResetType::GracefulRestart);
        assert_eq!(ResetType::ForceOff.to_string(), "ForceOff");
        assert!("Explode".parse::<ResetType>().is_err());
    }

    #[test]
    fn test_unknown_state() {
        let s: ResourceStatus =
            serde_json::from_str(r#"{"Health": "OK", "State": "Sleeping"}"#).unwrap();
        assert_eq!(s.health, Some(ResourceHealth::Ok));
        assert_eq!(s.state, Some(ResourceState::Unknown));
        assert_eq!(s.health_rollup, None);
    }

    // A Health value from a newer schema does not fail the resource.
    #[test]
    fn test_unknown_health() {
        let s: ResourceStatus =
            serde_json::from_str(r#"{"Health": "Degraded", "HealthRollup": "Warning"}"#).unwrap();
        assert_eq!(s.health, Some(ResourceHealth::Unknown));
        assert_eq!(s.health_rollup, Some(ResourceHealth::Warning));

        let m: Message = serde_json::from_str(
            r#"{"MessageId": "Base.1.8.Success", "Message": "ok", "MessageSeverity": "Informational"}"#,
        )
        .unwrap();
        assert_eq!(m.message_severity, Some(ResourceHealth::Unknown));
    }
}
