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

use super::{impl_entity, Entity, Link, NoLinks, Resource};

/// https://redfish.dmtf.org/schemas/swordfish/v1/DataStorageLoSCapabilities.v1_3_0.json
/// Data storage line of service options a storage service offers.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataStorageLoSCapabilities {
    #[serde(flatten)]
    pub entity: Entity,
    /// Absent and 0 are different: 0 means no recovery sources are allowed.
    pub maximum_recoverable_capacity_source_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_access_capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_lines_of_service: Vec<Link>,
    #[serde(
        rename = "SupportedLinesOfService@odata.count",
        skip_serializing
    )]
    pub supported_lines_of_service_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_provisioning_policies: Vec<ProvisioningPolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_recovery_time_objectives: Vec<String>,
    pub supports_space_efficiency: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningPolicy {
    Fixed,
    Thin,
}

impl Resource for DataStorageLoSCapabilities {
    const WRITABLE: &'static [&'static str] = &[
        "MaximumRecoverableCapacitySourceCount",
        "SupportedAccessCapabilities",
        "SupportedLinesOfService",
        "SupportedProvisioningPolicies",
        "SupportedRecoveryTimeObjectives",
        "SupportsSpaceEfficiency",
    ];

    type Links = NoLinks;

    impl_entity!();
}

impl DataStorageLoSCapabilities {
    pub fn supported_lines_of_service_uris(&self) -> Vec<String> {
        self.supported_lines_of_service
            .iter()
            .filter_map(Link::uri)
            .map(str::to_string)
            .collect()
    }
}
