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

// jsonmap.rs
// Helpers for pulling values out of Redfish JSON bodies, and for reading and
// writing nested properties by dotted path ("Boot.BootSourceOverrideTarget").

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::RedfishError;

// missing_key_error creates a RedfishError::MissingKey error.
fn missing_key_error(key: &str, url: &str) -> RedfishError {
    RedfishError::MissingKey {
        key: key.to_string(),
        url: url.to_string(),
    }
}

// invalid_type_error creates a RedfishError::InvalidKeyType error.
fn invalid_type_error(key: &str, expected_type: &str, url: &str) -> RedfishError {
    RedfishError::InvalidKeyType {
        key: key.to_string(),
        expected_type: expected_type.to_string(),
        url: url.to_string(),
    }
}

// get_str extracts a string value from a JSON map, returning appropriate
// errors if the key is missing or the value is not a string.
pub fn get_str<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    url: &str,
) -> Result<&'a str, RedfishError> {
    map.get(key)
        .ok_or_else(|| missing_key_error(key, url))?
        .as_str()
        .ok_or_else(|| invalid_type_error(key, "string", url))
}

// extract removes a key from a map and deserializes the value to type T.
// Returns an error if the key is missing or deserialization fails.
pub fn extract<T>(map: &mut Map<String, Value>, key: &str, url: &str) -> Result<T, RedfishError>
where
    T: DeserializeOwned,
{
    let json = map.remove(key).ok_or_else(|| missing_key_error(key, url))?;
    serde_json::from_value::<T>(json).map_err(|_| invalid_type_error(key, type_name::<T>(), url))
}

// extract_opt is extract for optional properties: absent or null is Ok(None).
pub fn extract_opt<T>(
    map: &mut Map<String, Value>,
    key: &str,
    url: &str,
) -> Result<Option<T>, RedfishError>
where
    T: DeserializeOwned,
{
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(json) => serde_json::from_value::<T>(json)
            .map(Some)
            .map_err(|_| invalid_type_error(key, type_name::<T>(), url)),
    }
}

// lookup_path walks a dotted path through nested objects. A missing key at
// any level, or a non-object on the way, means the property is absent.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |v, key| v.as_object()?.get(key))
}

// insert_path sets a dotted path, creating intermediate objects as needed.
// Anything that is not an object on the way is replaced by one.
pub fn insert_path(target: &mut Value, path: &str, new: Value) {
    let mut keys = path.split('.').peekable();
    let mut cur = target;
    while let Some(key) = keys.next() {
        if !cur.is_object() {
            *cur = Value::Object(Map::new());
        }
        let Value::Object(map) = cur else {
            return;
        };
        if keys.peek().is_none() {
            map.insert(key.to_string(), new);
            return;
        }
        cur = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

// merge applies every leaf of patch on top of target, recursing into objects.
// Arrays and scalars in patch replace what target has.
pub fn merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(t), Value::Object(p)) => {
            for (k, v) in p {
                let nested = v.is_object() && t.get(k).is_some_and(Value::is_object);
                if !nested {
                    t.insert(k.clone(), v.clone());
                } else if let Some(existing) = t.get_mut(k) {
                    merge(existing, v);
                }
            }
        }
        (t, p) => *t = p.clone(),
    }
}
