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

use super::{impl_entity, Entity, Link, Resource};

/// https://redfish.dmtf.org/schemas/v1/ServiceRoot.v1_16_0.json
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRoot {
    #[serde(flatten)]
    pub entity: Entity,
    pub product: Option<String>,
    #[serde(default)]
    pub redfish_version: String,
    pub vendor: Option<String>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,

    #[serde(skip)]
    links: ServiceRootLinks,
}

/// Top level services, and the session collection from `Links.Sessions`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRootLinks {
    #[serde(default)]
    account_service: Link,
    #[serde(default)]
    certificate_service: Link,
    #[serde(default)]
    chassis: Link,
    #[serde(default)]
    event_service: Link,
    #[serde(default)]
    managers: Link,
    #[serde(default)]
    session_service: Link,
    #[serde(default)]
    systems: Link,
    #[serde(default)]
    tasks: Link,
    #[serde(default)]
    update_service: Link,
    #[serde(default)]
    links: SessionsLink,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SessionsLink {
    #[serde(default)]
    sessions: Link,
}

impl Resource for ServiceRoot {
    type Links = ServiceRootLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: ServiceRootLinks) {
        self.links = links;
    }
}

impl ServiceRoot {
    /// Vendor provided by Redfish ServiceRoot
    pub fn vendor_string(&self) -> Option<String> {
        // If there is no "Vendor" key in ServiceRoot, look for an "Oem" entry. It will have a
        // single key which is the vendor name.
        self.vendor.clone().or_else(|| {
            self.entity
                .oem
                .as_ref()
                .and_then(|oem| oem.as_object())
                .and_then(|oem| oem.keys().next().cloned())
        })
    }

    pub fn account_service_uri(&self) -> Option<&str> {
        self.links.account_service.uri()
    }

    pub fn certificate_service_uri(&self) -> Option<&str> {
        self.links.certificate_service.uri()
    }

    pub fn chassis_uri(&self) -> Option<&str> {
        self.links.chassis.uri()
    }

    pub fn event_service_uri(&self) -> Option<&str> {
        self.links.event_service.uri()
    }

    pub fn managers_uri(&self) -> Option<&str> {
        self.links.managers.uri()
    }

    pub fn session_service_uri(&self) -> Option<&str> {
        self.links.session_service.uri()
    }

    /// The session collection. Older services only link the session
    /// service, whose collection sits at `Sessions` below it.
    pub fn sessions_uri(&self) -> Option<String> {
        if let Some(uri) = self.links.links.sessions.uri() {
            return Some(uri.to_string());
        }
        self.session_service_uri()
            .map(|s| format!("{}/Sessions", s.trim_end_matches('/')))
    }

    pub fn systems_uri(&self) -> Option<&str> {
        self.links.systems.uri()
    }

    pub fn tasks_uri(&self) -> Option<&str> {
        self.links.tasks.uri()
    }

    pub fn update_service_uri(&self) -> Option<&str> {
        self.links.update_service.uri()
    }
}
