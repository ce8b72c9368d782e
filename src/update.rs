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
use reqwest::{Method, StatusCode};
use serde_json::{value::RawValue, Map, Value};
use tracing::debug;

use crate::{
    jsonmap,
    model::Resource,
    network::Response,
    task::TaskMonitor,
    RedfishError,
};

/// Result of writing a resource back.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Nothing writable changed. No request was made.
    Unchanged,
    /// The service applied the change.
    Applied,
    /// The service accepted the change and is applying it in a task.
    Pending(TaskMonitor),
}

/// Sends a PATCH with every writable property of `resource` that differs
/// from what it was decoded from.
///
/// Read-only properties are never sent even if they were modified locally.
/// A property that was present and is now absent is not sent either; PATCH
/// cannot delete properties. On success the retained raw body is refreshed,
/// so a second call without further changes sends nothing.
///
/// The ETag is replaced by the one the service returns, from the `ETag`
/// header or the returned resource. When the service returns neither, the
/// old ETag is dropped instead of being sent again, so the next write goes
/// without `If-Match`. Refetch the resource first to keep the precondition.
pub fn update_resource<T: Resource>(resource: &mut T) -> Result<UpdateOutcome, RedfishError> {
    let body = patch_body(resource)?;
    if body.is_empty() {
        debug!("no writable changes for {}", resource.odata_id());
        return Ok(UpdateOutcome::Unchanged);
    }
    submit(resource, Method::PATCH, Value::Object(body))
}

/// Sends a PUT with the full writable subset of `resource`, for the few
/// resources whose service requires replacement rather than PATCH.
pub fn replace_resource<T: Resource>(resource: &mut T) -> Result<UpdateOutcome, RedfishError> {
    let body = writable_subset(resource)?;
    submit(resource, Method::PUT, Value::Object(body))
}

/// Every writable property of `resource` that is set, nested by path.
pub fn writable_subset<T: Resource>(resource: &T) -> Result<Map<String, Value>, RedfishError> {
    let current = to_json(resource)?;
    Ok(diff(&current, &Value::Object(Map::new()), T::WRITABLE))
}

/// DELETEs the resource. Any 2XX, including 204, is success.
pub fn delete_resource<T: Resource>(resource: &T) -> Result<(), RedfishError> {
    let entity = resource.entity();
    let uri = entity.odata_id.as_str();
    let response = entity.client()?.delete(uri, &entity.headers())?;
    if response.status == StatusCode::PRECONDITION_FAILED {
        return Err(stale(uri, response));
    }
    response.error_for_status(uri)?;
    Ok(())
}

/// The PATCH body `update_resource` would send, without sending it.
pub fn patch_body<T: Resource>(resource: &T) -> Result<Map<String, Value>, RedfishError> {
    let current = to_json(resource)?;
    let original = match resource.entity().raw_data() {
        // Decoding the snapshot into T again applies the same defaults and
        // field mapping to both sides.
        Some(raw) => {
            let baseline: T = serde_json::from_str(raw).map_err(|e| {
                RedfishError::JsonDeserializeError {
                    url: resource.odata_id().to_string(),
                    body: raw.to_string(),
                    source: e,
                }
            })?;
            to_json(&baseline)?
        }
        None => Value::Object(Map::new()),
    };
    Ok(diff(&current, &original, T::WRITABLE))
}

/// Compares `current` with `original` at each writable path.
///
/// A path is written when it is present in `current` and not structurally
/// equal to `original`. Absent, `null` and zero are all distinct; arrays are
/// compared, and sent, whole.
pub fn diff(current: &Value, original: &Value, writable: &[&str]) -> Map<String, Value> {
    let mut body = Value::Object(Map::new());
    for path in writable {
        let Some(new) = jsonmap::lookup_path(current, path) else {
            continue;
        };
        if jsonmap::lookup_path(original, path) == Some(new) {
            continue;
        }
        jsonmap::insert_path(&mut body, path, new.clone());
    }
    match body {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

// Checks that `body`, which sets every writable path of T, survives
// decode, writable subset, decode again, unchanged on those paths.
#[cfg(test)]
pub(crate) fn assert_writable_round_trip<T: Resource>(body: Value) {
    for path in T::WRITABLE {
        assert!(jsonmap::lookup_path(&body, path).is_some(), "{path} missing from the test body");
    }
    let resource: T = serde_json::from_value(body.clone()).unwrap();
    let subset = Value::Object(writable_subset(&resource).unwrap());
    for path in T::WRITABLE {
        assert_eq!(
            jsonmap::lookup_path(&subset, path),
            jsonmap::lookup_path(&body, path),
            "{path}"
        );
    }
    let again: T = serde_json::from_value(subset.clone()).unwrap();
    assert_eq!(Value::Object(writable_subset(&again).unwrap()), subset);
}

fn to_json<T: Resource>(resource: &T) -> Result<Value, RedfishError> {
    serde_json::to_value(resource).map_err(|e| RedfishError::JsonSerializeError {
        url: resource.odata_id().to_string(),
        object_debug: std::any::type_name::<T>().to_string(),
        source: e,
    })
}

fn stale(uri: &str, response: Response) -> RedfishError {
    RedfishError::StalenessError {
        url: uri.to_string(),
        error: Box::new(response.into_service_error(uri)),
    }
}

fn submit<T: Resource>(
    resource: &mut T,
    method: Method,
    body: Value,
) -> Result<UpdateOutcome, RedfishError> {
    let entity = resource.entity();
    let uri = entity.odata_id.clone();
    let client = entity.client()?.clone();
    let headers = entity.headers();

    let response = if method == Method::PUT {
        client.put(&uri, &body, &headers)?
    } else {
        client.patch(&uri, &body, &headers)?
    };
    match response.status {
        StatusCode::ACCEPTED => {
            let monitor = TaskMonitor::from_response(&uri, &response)?;
            debug!("{method} {uri} continues in task {}", monitor.uri);
            return Ok(UpdateOutcome::Pending(monitor));
        }
        StatusCode::PRECONDITION_FAILED => return Err(stale(&uri, response)),
        _ => {}
    }
    let response = response.error_for_status(&uri)?;
    refresh(resource, &uri, &body, &response)?;
    Ok(UpdateOutcome::Applied)
}

// Some services answer a PATCH with the updated resource, some with only
// @Message.ExtendedInfo, some with nothing. Only a body that is the resource
// itself replaces the snapshot; otherwise what was sent is merged into it.
fn refresh<T: Resource>(
    resource: &mut T,
    uri: &str,
    sent: &Value,
    response: &Response,
) -> Result<(), RedfishError> {
    let returned: Option<Value> = if response.has_body() {
        serde_json::from_slice::<Value>(&response.body)
            .ok()
            .filter(|v| v.get("@odata.id").is_some())
    } else {
        None
    };
    let snapshot = match returned {
        Some(v) => v,
        None => {
            let mut v = match resource.entity().raw_data() {
                Some(raw) => serde_json::from_str(raw).unwrap_or(Value::Object(Map::new())),
                None => Value::Object(Map::new()),
            };
            jsonmap::merge(&mut v, sent);
            // The old tag no longer describes the resource.
            if let Value::Object(m) = &mut v {
                m.remove("@odata.etag");
            }
            v
        }
    };
    let raw = RawValue::from_string(snapshot.to_string()).map_err(|e| {
        RedfishError::JsonSerializeError {
            url: uri.to_string(),
            object_debug: format!("{snapshot:?}"),
            source: e,
        }
    })?;
    let entity = resource.entity_mut();
    entity.set_raw_data(raw);
    entity.etag = response
        .etag()
        .map(str::to_string)
        .or_else(|| snapshot.get("@odata.etag").and_then(Value::as_str).map(str::to_string));
    if entity.etag.is_none() {
        debug!("{uri}: no ETag after write, next write goes without If-Match");
    }
    Ok(())
}
