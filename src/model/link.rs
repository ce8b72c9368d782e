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

use serde::{ser::SerializeMap, Deserialize, Serialize};
use serde_json::Value;

/// A URI pointing at another resource.
///
/// Redfish services write links as `{"@odata.id": "/redfish/v1/..."}`, older or
/// OEM payloads as `{"href": "..."}`, and occasionally as a bare string. All of
/// them decode to the same URI. Anything else decodes to an empty link, which
/// means "absent"; decoding a link never fails.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link(String);

impl Link {
    pub fn new(uri: impl Into<String>) -> Self {
        Link(uri.into())
    }

    pub fn from_value(v: &Value) -> Self {
        let uri = match v {
            Value::String(s) => Some(s.as_str()),
            Value::Object(m) => m
                .get("@odata.id")
                .or_else(|| m.get("href"))
                .and_then(Value::as_str),
            _ => None,
        };
        Link(uri.unwrap_or_default().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The link as `Some(uri)`, or `None` when it is absent.
    pub fn uri(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }

    /// Last path segment, which by convention is the target's `Id`.
    pub fn last_segment(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Link {
    fn from(uri: String) -> Self {
        Link(uri)
    }
}

impl From<&str> for Link {
    fn from(uri: &str) -> Self {
        Link(uri.to_string())
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        Ok(Link::from_value(&v))
    }
}

impl Serialize for Link {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("@odata.id", &self.0)?;
        map.end()
    }
}

/// An ordered list of links.
///
/// Decodes both from a plain array (`"ManagerForServers": [{...}, {...}]`) and
/// from a collection body with `Members`, `Members@odata.count` and
/// `Members@odata.nextLink`. Member order is kept as sent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkCollection {
    pub members: Vec<Link>,
    pub count: Option<i64>,
    /// Next page of the collection, if the service paginates.
    pub next_link: Option<String>,
}

impl LinkCollection {
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Array(items) => LinkCollection {
                members: items.iter().map(Link::from_value).collect(),
                ..Default::default()
            },
            Value::Object(m) => LinkCollection {
                members: m
                    .get("Members")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(Link::from_value).collect())
                    .unwrap_or_default(),
                count: m.get("Members@odata.count").and_then(Value::as_i64),
                next_link: m
                    .get("Members@odata.nextLink")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            },
            _ => LinkCollection::default(),
        }
    }

    /// Member URIs in order, with absent links dropped.
    pub fn uris(&self) -> Vec<String> {
        self.members
            .iter()
            .filter(|l| !l.is_empty())
            .map(|l| l.as_str().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<'de> Deserialize<'de> for LinkCollection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        Ok(LinkCollection::from_value(&v))
    }
}
