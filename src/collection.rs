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
use std::collections::HashSet;

use reqwest::header::{HeaderMap, HeaderValue, IF_MATCH};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    decode, jsonmap,
    model::{Link, Resource},
    network::Client,
    CollectionError, RedfishError,
};

const NEXT_LINK: &str = "Members@odata.nextLink";

// Walks every page of the collection at `uri` in order. Members are returned
// as sent, keyed by their link, with duplicates across pages removed.
fn fetch_members(client: &Client, uri: &str) -> Result<Vec<(String, Value)>, RedfishError> {
    let mut members = Vec::new();
    let mut seen_members = HashSet::new();
    let mut seen_pages = HashSet::new();
    let mut next = Some(uri.to_string());

    while let Some(page_uri) = next.take() {
        if !seen_pages.insert(page_uri.clone()) {
            debug!("{uri}: page {page_uri} already visited, stopping");
            break;
        }
        let mut page: Map<String, Value> = client
            .get(&page_uri)?
            .error_for_status(&page_uri)?
            .json(&page_uri)?;
        let page_members: Vec<Value> = jsonmap::extract(&mut page, "Members", &page_uri)?;
        for member in page_members {
            let link = Link::from_value(&member);
            let Some(member_uri) = link.uri() else {
                continue;
            };
            if seen_members.insert(member_uri.to_string()) {
                members.push((member_uri.to_string(), member));
            }
        }
        next = page
            .get(NEXT_LINK)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }
    debug!("{uri}: {} members", members.len());
    Ok(members)
}

/// URIs of the members of a collection, in the order the service lists them.
/// An empty `uri` is an empty collection.
pub fn get_collection(client: &Client, uri: &str) -> Result<Vec<String>, RedfishError> {
    if uri.is_empty() {
        return Ok(Vec::new());
    }
    Ok(fetch_members(client, uri)?
        .into_iter()
        .map(|(member_uri, _)| member_uri)
        .collect())
}

/// Every member of a collection, decoded as `T`.
///
/// Members the service already expanded inline are decoded from the
/// collection body; the rest are fetched one by one. The first failure aborts.
pub fn get_collection_objects<T: Resource>(
    client: &Client,
    uri: &str,
) -> Result<Vec<T>, RedfishError> {
    if uri.is_empty() {
        return Ok(Vec::new());
    }
    fetch_members(client, uri)?
        .into_iter()
        .map(|(member_uri, member)| {
            if is_expanded(&member) {
                decode::decode_value(client, &member_uri, &member)
            } else {
                decode::get_object(client, &member_uri)
            }
        })
        .collect()
}

/// Like [`get_collection_objects`], but a member that fails does not stop the
/// others. Returns the members that decoded, in order, and the failures keyed
/// by member link. Only a failure to read the collection itself is an `Err`.
pub fn get_collection_objects_partial<T: Resource>(
    client: &Client,
    uri: &str,
) -> Result<(Vec<T>, Option<CollectionError>), RedfishError> {
    if uri.is_empty() {
        return Ok((Vec::new(), None));
    }
    let mut objects = Vec::new();
    let mut errors = CollectionError {
        url: uri.to_string(),
        failures: Vec::new(),
    };
    for (member_uri, member) in fetch_members(client, uri)? {
        let decoded = if is_expanded(&member) {
            decode::decode_value(client, &member_uri, &member)
        } else {
            decode::get_object(client, &member_uri)
        };
        match decoded {
            Ok(object) => objects.push(object),
            Err(e) => {
                warn!("{uri}: member {member_uri} failed: {e}");
                errors.failures.push((member_uri, e));
            }
        }
    }
    Ok((objects, (!errors.is_empty()).then_some(errors)))
}

/// Fetches each of `uris` in order.
pub fn get_objects<T: Resource>(client: &Client, uris: &[String]) -> Result<Vec<T>, RedfishError> {
    uris.iter()
        .filter(|u| !u.is_empty())
        .map(|u| decode::get_object(client, u))
        .collect()
}

/// ETag of the collection itself, from the header or from `@odata.etag`.
pub fn collection_etag(client: &Client, uri: &str) -> Result<Option<String>, RedfishError> {
    let response = client.get(uri)?.error_for_status(uri)?;
    if let Some(etag) = response.etag() {
        return Ok(Some(etag.to_string()));
    }
    let body: Value = response.json(uri)?;
    Ok(body
        .get("@odata.etag")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

/// POSTs a new member into the collection at `uri` and returns it.
///
/// Some services want `If-Match` with the collection's ETag on creation, so
/// unless ETag matching is disabled the collection is fetched first. The new
/// member is decoded from the response body, or fetched from `Location` when
/// the body is empty.
pub fn create_member<T: Resource>(
    client: &Client,
    uri: &str,
    payload: &Value,
    disable_etag_match: bool,
) -> Result<T, RedfishError> {
    let mut headers = HeaderMap::new();
    if !disable_etag_match && !client.is_etag_match_disabled() {
        if let Some(v) = collection_etag(client, uri)?
            .as_deref()
            .and_then(|e| HeaderValue::from_str(e).ok())
        {
            headers.insert(IF_MATCH, v);
        }
    }
    let response = client.post(uri, payload, &headers)?.error_for_status(uri)?;
    if response.has_body() {
        return decode::decode_response(client, uri, response);
    }
    match response.location() {
        Some(location) => decode::get_object(client, &crate::session::normalize_location(location)),
        None => Err(RedfishError::NoContent {
            url: uri.to_string(),
        }),
    }
}

fn is_expanded(member: &Value) -> bool {
    member.as_object().is_some_and(|m| m.contains_key("Id"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;

    use super::*;
    use crate::{model::Session, test_client::TestClient};

    const PAGE1: &str = r##"{
        "@odata.id": "/redfish/v1/SessionService/Sessions",
        "Name": "Sessions",
        "Members@odata.count": 3,
        "Members": [
            {"@odata.id": "/redfish/v1/SessionService/Sessions/1"},
            {"@odata.id": "/redfish/v1/SessionService/Sessions/2"}
        ],
        "Members@odata.nextLink": "/redfish/v1/SessionService/Sessions?$skip=2"
    }"##;

    const PAGE2: &str = r##"{
        "@odata.id": "/redfish/v1/SessionService/Sessions",
        "Members": [
            {"@odata.id": "/redfish/v1/SessionService/Sessions/2"},
            {"href": "/redfish/v1/SessionService/Sessions/3"}
        ]
    }"##;

    fn session(id: &str) -> String {
        format!(
            r#"{{"@odata.id": "/redfish/v1/SessionService/Sessions/{id}", "Id": "{id}", "Name": "Session", "UserName": "u{id}"}}"#
        )
    }

    #[test]
    fn test_paging_in_order_without_duplicates() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/redfish/v1/SessionService/Sessions", PAGE1);
        tc.on_get("/redfish/v1/SessionService/Sessions?$skip=2", PAGE2);
        let client: Client = tc.clone();
        assert_eq!(
            get_collection(&client, "/redfish/v1/SessionService/Sessions").unwrap(),
            vec![
                "/redfish/v1/SessionService/Sessions/1",
                "/redfish/v1/SessionService/Sessions/2",
                "/redfish/v1/SessionService/Sessions/3",
            ]
        );
        assert_eq!(tc.calls().len(), 2);
    }

    #[test]
    fn test_objects() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/redfish/v1/SessionService/Sessions", PAGE1);
        tc.on_get("/redfish/v1/SessionService/Sessions?$skip=2", PAGE2);
        for id in ["1", "2", "3"] {
            tc.on_get(&format!("/redfish/v1/SessionService/Sessions/{id}"), &session(id));
        }
        let client: Client = tc.clone();
        let sessions: Vec<Session> =
            get_collection_objects(&client, "/redfish/v1/SessionService/Sessions").unwrap();
        let ids: Vec<&str> = sessions.iter().map(|s| s.entity.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(tc.calls_for(&Method::GET).len(), 5);
    }

    #[test]
    fn test_expanded_members_not_fetched() {
        let tc = Arc::new(TestClient::new());
        tc.on_get(
            "/redfish/v1/SessionService/Sessions",
            &format!(r#"{{"Members": [{}, {}]}}"#, session("1"), session("2")),
        );
        let client: Client = tc.clone();
        let sessions: Vec<Session> =
            get_collection_objects(&client, "/redfish/v1/SessionService/Sessions").unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].user_name.as_deref(), Some("u2"));
        assert!(sessions[0].entity.raw_data().is_some());
        assert_eq!(tc.calls().len(), 1);
    }

    #[test]
    fn test_empty() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/c", r#"{"Members": [], "Members@odata.count": 0}"#);
        let client: Client = tc.clone();
        assert!(get_collection(&client, "").unwrap().is_empty());
        assert!(get_collection_objects::<Session>(&client, "").unwrap().is_empty());
        assert!(tc.calls().is_empty());
        assert!(get_collection(&client, "/c").unwrap().is_empty());
    }

    // A nextLink pointing back at a visited page ends the walk.
    #[test]
    fn test_next_link_loop() {
        let tc = Arc::new(TestClient::new());
        tc.on_get(
            "/c",
            r#"{"Members": [{"@odata.id": "/c/1"}], "Members@odata.nextLink": "/c"}"#,
        );
        let client: Client = tc.clone();
        assert_eq!(get_collection(&client, "/c").unwrap(), vec!["/c/1"]);
        assert_eq!(tc.calls().len(), 1);
    }

    #[test]
    fn test_member_failure_aborts() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/c", r#"{"Members": [{"@odata.id": "/c/1"}, {"@odata.id": "/c/2"}]}"#);
        tc.on_get("/c/1", &session("1"));
        let client: Client = tc;
        let err = get_collection_objects::<Session>(&client, "/c").unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }

    // Failed members are reported by link, the rest still come back in order.
    #[test]
    fn test_partial_members() {
        let tc = Arc::new(TestClient::new());
        tc.on_get(
            "/c",
            r#"{"Members": [{"@odata.id": "/c/1"}, {"@odata.id": "/c/2"}, {"@odata.id": "/c/3"}, {"@odata.id": "/c/4"}]}"#,
        );
        tc.on_get("/c/1", &session("1"));
        tc.on_get("/c/3", r#"{"@odata.id": "/c/3", "Id": 3"#);
        tc.on_get("/c/4", &session("4"));
        let client: Client = tc.clone();

        let (sessions, errors) = get_collection_objects_partial::<Session>(&client, "/c").unwrap();
        let ids: Vec<&str> = sessions.iter().map(|s| s.entity.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        let errors = errors.unwrap();
        assert_eq!(errors.url, "/c");
        let failed: Vec<&str> = errors.failures.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(failed, vec!["/c/2", "/c/3"]);
        assert_eq!(
            errors.get("/c/2").and_then(RedfishError::status),
            Some(reqwest::StatusCode::NOT_FOUND)
        );
        assert!(matches!(
            errors.get("/c/3"),
            Some(RedfishError::JsonDeserializeError { .. })
        ));
        assert_eq!(tc.calls().len(), 5);

        tc.on_get("/d", r#"{"Members": [{"@odata.id": "/c/1"}]}"#);
        let (sessions, errors) = get_collection_objects_partial::<Session>(&client, "/d").unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(errors.is_none());
        assert!(get_collection_objects_partial::<Session>(&client, "/missing").is_err());
    }

    #[test]
    fn test_missing_members() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/c", r#"{"Name": "not a collection"}"#);
        let client: Client = tc;
        assert!(matches!(
            get_collection(&client, "/c"),
            Err(RedfishError::MissingKey { .. })
        ));
    }
}
