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

use super::{impl_entity, Certificate, Entity, Link, Resource, ResourceStatus};
use crate::{action::ActionTarget, collection, model::ActionInfo, task::TaskMonitor, RedfishError};

/// https://redfish.dmtf.org/schemas/v1/VirtualMedia.v1_6_3.json
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualMedia {
    #[serde(flatten)]
    pub entity: Entity,
    pub connected_via: Option<String>,
    pub eject_policy: Option<EjectPolicy>,
    pub eject_timeout: Option<String>,
    pub image: Option<String>,
    pub image_name: Option<String>,
    pub inserted: Option<bool>,
    /// Vendors disagree on the values; passed through as sent.
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_types: Vec<String>,
    pub password: Option<String>,
    pub status: Option<ResourceStatus>,
    pub transfer_method: Option<TransferMethod>,
    pub transfer_protocol_type: Option<String>,
    pub user_name: Option<String>,
    pub verify_certificate: Option<bool>,
    pub write_protected: Option<bool>,

    #[serde(skip)]
    eject_media: ActionTarget,
    #[serde(skip)]
    insert_media: ActionTarget,
    #[serde(skip)]
    certificates: Link,
    #[serde(skip)]
    client_certificates: Link,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EjectPolicy {
    OnPowerOff,
    Session,
    Timed,
    AfterUse,
    Persistent,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TransferMethod {
    Stream,
    Upload,
}

/// Parameters of VirtualMedia.InsertMedia. Only `image` is required.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InsertMediaParameters {
    pub image: String,
    pub inserted: Option<bool>,
    /// Some services want it, some reject it. Sent only when set.
    pub media_type: Option<String>,
    pub password: Option<String>,
    pub transfer_method: Option<TransferMethod>,
    pub transfer_protocol_type: Option<String>,
    pub user_name: Option<String>,
    pub write_protected: Option<bool>,
}

impl InsertMediaParameters {
    pub fn new(image: &str) -> Self {
        InsertMediaParameters {
            image: image.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualMediaLinks {
    #[serde(default)]
    actions: VirtualMediaActions,
    #[serde(default)]
    certificates: Link,
    #[serde(default)]
    client_certificates: Link,
}

#[derive(Debug, Default, Deserialize)]
struct VirtualMediaActions {
    #[serde(rename = "#VirtualMedia.EjectMedia", default)]
    eject_media: ActionTarget,
    #[serde(rename = "#VirtualMedia.InsertMedia", default)]
    insert_media: ActionTarget,
}

impl Resource for VirtualMedia {
    const WRITABLE: &'static [&'static str] = &[
        "EjectPolicy",
        "EjectTimeout",
        "Image",
        "Inserted",
        "MediaType",
        "Password",
        "TransferMethod",
        "TransferProtocolType",
        "UserName",
        "VerifyCertificate",
        "WriteProtected",
    ];

    type Links = VirtualMediaLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: VirtualMediaLinks) {
        self.eject_media = links.actions.eject_media;
        self.insert_media = links.actions.insert_media;
        self.certificates = links.certificates;
        self.client_certificates = links.client_certificates;
    }
}

impl VirtualMedia {
    pub fn supports_media_insert(&self) -> bool {
        self.insert_media.is_supported()
    }

    pub fn supports_media_eject(&self) -> bool {
        self.eject_media.is_supported()
    }

    pub fn insert_media(
        &self,
        params: &InsertMediaParameters,
    ) -> Result<Option<TaskMonitor>, RedfishError> {
        self.insert_media
            .invoke(&self.entity, "InsertMedia", params)
    }

    pub fn insert_media_action_info(&self) -> Result<&ActionInfo, RedfishError> {
        self.insert_media.action_info(&self.entity, "InsertMedia")
    }

    pub fn eject_media(&self) -> Result<Option<TaskMonitor>, RedfishError> {
        self.eject_media
            .invoke(&self.entity, "EjectMedia", &serde_json::Map::new())
    }

    pub fn eject_media_action_info(&self) -> Result<&ActionInfo, RedfishError> {
        self.eject_media.action_info(&self.entity, "EjectMedia")
    }

    pub fn certificates_uri(&self) -> Option<&str> {
        self.certificates.uri()
    }

    /// Certificates used to verify the image server. Empty when not advertised.
    pub fn certificates(&self) -> Result<Vec<Certificate>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.certificates.as_str())
    }

    pub fn client_certificates_uri(&self) -> Option<&str> {
        self.client_certificates.uri()
    }

    pub fn client_certificates(&self) -> Result<Vec<Certificate>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.client_certificates.as_str())
    }
}
