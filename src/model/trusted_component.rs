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

use super::{impl_entity, Certificate, Entity, Link, LinkCollection, Resource, ResourceStatus};
use crate::{action::ActionOutcome, action::ActionTarget, collection, RedfishError};

/// https://redfish.dmtf.org/schemas/v1/TrustedComponent.v1_3_1.json
/// A TPM, or other root of trust, found under Chassis/<id>/TrustedComponents.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustedComponent {
    #[serde(flatten)]
    pub entity: Entity,
    pub firmware_version: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub part_number: Option<String>,
    #[serde(rename = "SKU")]
    pub sku: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<ResourceStatus>,
    #[serde(rename = "TPM")]
    pub tpm: Option<Tpm>,
    pub trusted_component_type: Option<TrustedComponentType>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,

    #[serde(skip)]
    certificates: Link,
    #[serde(skip)]
    tpm_get_event_log: ActionTarget,
    #[serde(skip)]
    active_software_image: Link,
    #[serde(skip)]
    component_integrity: LinkCollection,
    #[serde(skip)]
    components_protected: LinkCollection,
    #[serde(skip)]
    integrated_into: Link,
    #[serde(skip)]
    owner: Link,
    #[serde(skip)]
    software_images: LinkCollection,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TrustedComponentType {
    Discrete,
    Integrated,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Tpm {
    #[serde(rename = "CapabilitiesVendorID")]
    pub capabilities_vendor_id: Option<String>,
    #[serde(rename = "HardwareInterfaceVendorID")]
    pub hardware_interface_vendor_id: Option<String>,
}

/// Body of TrustedComponent.TPMGetEventLog.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TpmEventLog {
    /// Base64 encoded TCG event log.
    #[serde(default)]
    pub event_log: String,
    pub oem: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustedComponentLinks {
    #[serde(default)]
    actions: TrustedComponentActions,
    #[serde(default)]
    links: TrustedComponentLinkSet,
    #[serde(default)]
    certificates: Link,
}

#[derive(Debug, Default, Deserialize)]
struct TrustedComponentActions {
    #[serde(rename = "#TrustedComponent.TPMGetEventLog", default)]
    tpm_get_event_log: ActionTarget,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrustedComponentLinkSet {
    #[serde(default)]
    active_software_image: Link,
    #[serde(default)]
    component_integrity: LinkCollection,
    #[serde(default)]
    components_protected: LinkCollection,
    #[serde(default)]
    integrated_into: Link,
    #[serde(default)]
    owner: Link,
    #[serde(default)]
    software_images: LinkCollection,
}

impl Resource for TrustedComponent {
    type Links = TrustedComponentLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: TrustedComponentLinks) {
        self.certificates = links.certificates;
        self.tpm_get_event_log = links.actions.tpm_get_event_log;
        self.active_software_image = links.links.active_software_image;
        self.component_integrity = links.links.component_integrity;
        self.components_protected = links.links.components_protected;
        self.integrated_into = links.links.integrated_into;
        self.owner = links.links.owner;
        self.software_images = links.links.software_images;
    }
}

impl TrustedComponent {
    pub fn certificates_uri(&self) -> Option<&str> {
        self.certificates.uri()
    }

    /// Device identity certificates. Empty when the component has none.
    pub fn certificates(&self) -> Result<Vec<Certificate>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.certificates.as_str())
    }

    pub fn tpm_get_event_log(&self) -> Result<ActionOutcome<TpmEventLog>, RedfishError> {
        self.tpm_get_event_log.invoke_for(
            &self.entity,
            "TPMGetEventLog",
            &serde_json::Map::new(),
        )
    }

    pub fn active_software_image_uri(&self) -> Option<&str> {
        self.active_software_image.uri()
    }

    pub fn component_integrity_uris(&self) -> Vec<String> {
        self.component_integrity.uris()
    }

    pub fn components_protected_uris(&self) -> Vec<String> {
        self.components_protected.uris()
    }

    pub fn integrated_into_uri(&self) -> Option<&str> {
        self.integrated_into.uri()
    }

    pub fn owner_uri(&self) -> Option<&str> {
        self.owner.uri()
    }

    pub fn software_image_uris(&self) -> Vec<String> {
        self.software_images.uris()
    }
}
