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

/// https://redfish.dmtf.org/schemas/v1/Session.v1_7_2.json
/// A member of SessionService/Sessions. The token itself is only ever
/// returned in the X-Auth-Token header of the POST that created it.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    #[serde(flatten)]
    pub entity: Entity,
    pub user_name: Option<String>,
    #[serde(rename = "ClientOriginIPAddress")]
    pub client_origin_ip_address: Option<String>,
    pub context: Option<String>,
    pub created_time: Option<String>,
    pub expiration_time: Option<String>,
    pub session_type: Option<SessionType>,
    pub oem_session_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip)]
    outbound_connection: Link,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    HostConsole,
    ManagerConsole,
    #[serde(rename = "IPMI")]
    Ipmi,
    #[serde(rename = "KVMIP")]
    Kvmip,
    #[serde(rename = "OEM")]
    Oem,
    Redfish,
    VirtualMedia,
    WebUI,
    OutboundConnection,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionLinks {
    #[serde(rename = "Links", default)]
    links: SessionLinksInner,
}

#[derive(Debug, Default, Deserialize)]
struct SessionLinksInner {
    #[serde(rename = "OutboundConnection", default)]
    outbound_connection: Link,
}

impl Resource for Session {
    type Links = SessionLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: SessionLinks) {
        self.outbound_connection = links.links.outbound_connection;
    }
}

impl Session {
    /// The outbound connection this session was opened for, if any.
    pub fn outbound_connection_uri(&self) -> Option<&str> {
        self.outbound_connection.uri()
    }
}
