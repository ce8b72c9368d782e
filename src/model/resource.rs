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
use reqwest::header::{HeaderMap, HeaderValue, IF_MATCH};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{value::RawValue, Value};

use crate::{
    action::{self, ActionOutcome},
    model::Message,
    network::{Client, Response},
    update::{self, UpdateOutcome},
    RedfishError,
};

// Every Redfish resource carries the same identity properties. We keep them in
// Entity, flattened into each resource type, together with what the engine
// needs to write the resource back: the client it came from, the body it was
// decoded from and its ETag.
//
//                  for Resource        for Resource-Collection
// @odata.id   -    mandatory           mandatory
// @odata.type -    mandatory           mandatory
// @odata.etag -    optional            optional
// @odata.context   optional            optional
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "@odata.id", default)]
    pub odata_id: String,
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    #[serde(rename = "@odata.context")]
    pub odata_context: Option<String>,
    /// Taken from the ETag response header when the service sends one, else
    /// from `@odata.etag` in the body.
    #[serde(rename = "@odata.etag")]
    pub etag: Option<String>,
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Vendor extensions, kept as sent.
    #[serde(rename = "Oem")]
    pub oem: Option<Value>,
    #[serde(rename = "@Message.ExtendedInfo", default, skip_serializing_if = "Vec::is_empty")]
    pub extended_info: Vec<Message>,

    #[serde(skip)]
    client: Option<Client>,
    #[serde(skip)]
    raw: Option<Box<RawValue>>,
    #[serde(skip)]
    disable_etag_match: bool,
    #[serde(skip)]
    strip_etag_quotes: bool,
}

impl Entity {
    /// The client this resource was fetched with.
    pub fn client(&self) -> Result<&Client, RedfishError> {
        self.client.as_ref().ok_or_else(|| RedfishError::NotAttached {
            url: self.odata_id.clone(),
        })
    }

    pub fn set_client(&mut self, client: Client) {
        self.client = Some(client);
    }

    /// The body this resource was last decoded from, or last written back.
    pub fn raw_data(&self) -> Option<&str> {
        self.raw.as_deref().map(RawValue::get)
    }

    pub(crate) fn set_raw_data(&mut self, raw: Box<RawValue>) {
        self.raw = Some(raw);
    }

    /// Stops this one resource from sending `If-Match`, whatever the client says.
    pub fn disable_etag_match(&mut self, disable: bool) {
        self.disable_etag_match = disable;
    }

    /// Sends `If-Match` without the surrounding quotes. Some BMCs only match
    /// the bare tag.
    pub fn strip_etag_quotes(&mut self, strip: bool) {
        self.strip_etag_quotes = strip;
    }

    pub fn is_etag_match_disabled(&self) -> bool {
        self.disable_etag_match
            || self
                .client
                .as_ref()
                .is_some_and(|c| c.is_etag_match_disabled())
    }

    /// Headers to send with any request that modifies this resource.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.is_etag_match_disabled() {
            return headers;
        }
        if let Some(v) = self
            .etag
            .as_deref()
            .map(|e| if self.strip_etag_quotes { e.trim_matches('"') } else { e })
            .filter(|e| !e.is_empty())
            .and_then(|e| HeaderValue::from_str(e).ok())
        {
            headers.insert(IF_MATCH, v);
        }
        headers
    }

    /// POSTs to `uri` with this resource's preconditions. Non-2XX is an error.
    pub fn post(&self, uri: &str, payload: &Value) -> Result<Response, RedfishError> {
        self.client()?
            .post(uri, payload, &self.headers())?
            .error_for_status(uri)
    }

    /// Like [`Entity::post`], but a 202 comes back as the task monitor.
    pub fn post_with_task(
        &self,
        uri: &str,
        payload: &Value,
    ) -> Result<ActionOutcome<Response>, RedfishError> {
        action::post_action(self.client()?, uri, payload, &self.headers())
    }
}

/// Payload-free sidecar for resources without links or actions.
#[derive(Debug, Default, Deserialize)]
pub struct NoLinks {}

/// What every resource type provides so the engine can decode, follow and
/// write it.
///
/// Decoding is two passes over the same body. The type itself is the public
/// surface. [`Resource::Links`] is a separate shape naming the `Links`,
/// `Actions` and navigation properties; [`Resource::resolve_links`] moves what
/// it found into the resource's private fields.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Properties the service accepts in a PATCH. Nested settings use dotted
    /// paths.
    const WRITABLE: &'static [&'static str] = &[];

    type Links: DeserializeOwned + Default;

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    fn resolve_links(&mut self, _links: Self::Links) {}

    fn odata_id(&self) -> &str {
        &self.entity().odata_id
    }

    fn client(&self) -> Result<&Client, RedfishError> {
        self.entity().client()
    }

    /// PATCHes the writable properties that changed since the last fetch.
    fn update(&mut self) -> Result<UpdateOutcome, RedfishError>
    where
        Self: Sized,
    {
        update::update_resource(self)
    }
}

// Implements the Entity accessors of Resource. Sidecar and links are given
// per type.
macro_rules! impl_entity {
    () => {
        fn entity(&self) -> &$crate::model::Entity {
            &self.entity
        }

        fn entity_mut(&mut self) -> &mut $crate::model::Entity {
            &mut self.entity
        }
    };
}
pub(crate) use impl_entity;

// Resource for types with nothing writable and no sidecar.
macro_rules! impl_resource {
    ($t:ty) => {
        impl $crate::model::Resource for $t {
            type Links = $crate::model::NoLinks;

            fn entity(&self) -> &$crate::model::Entity {
                &self.entity
            }

            fn entity_mut(&mut self) -> &mut $crate::model::Entity {
                &mut self.entity
            }
        }
    };
}
pub(crate) use impl_resource;
