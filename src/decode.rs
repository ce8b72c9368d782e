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
use serde_json::{value::RawValue, Value};
use tracing::debug;

use crate::{
    model::Resource,
    network::{Client, Response},
    RedfishError,
};

/// GETs `uri` and decodes the body into `T`.
pub fn get_object<T: Resource>(client: &Client, uri: &str) -> Result<T, RedfishError> {
    let response = client.get(uri)?.error_for_status(uri)?;
    decode_response(client, uri, response)
}

/// Decodes a successful response body into `T` and attaches the client, the
/// raw body and the ETag.
pub fn decode_response<T: Resource>(
    client: &Client,
    uri: &str,
    response: Response,
) -> Result<T, RedfishError> {
    if !response.has_body() {
        return Err(RedfishError::NoContent {
            url: uri.to_string(),
        });
    }
    let mut resource: T = decode_bytes(uri, &response.body)?;
    let entity = resource.entity_mut();
    entity.set_client(client.clone());
    if let Some(etag) = response.etag() {
        entity.etag = Some(etag.to_string());
    }
    Ok(resource)
}

/// Decodes an object that was already inlined in another body, such as an
/// expanded collection member.
pub fn decode_value<T: Resource>(
    client: &Client,
    uri: &str,
    value: &Value,
) -> Result<T, RedfishError> {
    let body = serde_json::to_vec(value).map_err(|e| RedfishError::JsonSerializeError {
        url: uri.to_string(),
        object_debug: format!("{value:?}"),
        source: e,
    })?;
    let mut resource: T = decode_bytes(uri, &body)?;
    resource.entity_mut().set_client(client.clone());
    Ok(resource)
}

/// Both decode passes, with no client involved. The body is kept as the
/// resource's raw data.
pub fn decode_bytes<T: Resource>(uri: &str, body: &[u8]) -> Result<T, RedfishError> {
    let json_err = |e| RedfishError::JsonDeserializeError {
        url: uri.to_string(),
        body: String::from_utf8_lossy(body).into_owned(),
        source: e,
    };
    let mut resource: T = serde_json::from_slice(body).map_err(json_err)?;
    let links: T::Links = serde_json::from_slice(body).map_err(json_err)?;
    resource.resolve_links(links);
    let raw: Box<RawValue> = serde_json::from_slice(body).map_err(json_err)?;
    resource.entity_mut().set_raw_data(raw);
    debug!(
        "decoded {} at {}",
        std::any::type_name::<T>().rsplit("::").next().unwrap_or_default(),
        uri
    );
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};

    use super::*;
    use crate::{model::Certificate, test_client::TestClient};

    const CERT: &str = include_str!("model/testdata/certificate.json");

    #[test]
    fn test_get_object() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/redfish/v1/Managers/1/NetworkProtocol/HTTPS/Certificates/1", CERT);
        let client: Client = tc.clone();
        let cert: Certificate =
            get_object(&client, "/redfish/v1/Managers/1/NetworkProtocol/HTTPS/Certificates/1")
                .unwrap();
        assert_eq!(cert.entity.id, "1");
        let raw: Value = serde_json::from_str(cert.entity.raw_data().unwrap()).unwrap();
        assert_eq!(raw, serde_json::from_str::<Value>(CERT).unwrap());
        assert!(cert.entity.client().is_ok());
        assert_eq!(tc.calls().len(), 1);
    }

    // The ETag header wins over @odata.etag in the body.
    #[test]
    fn test_etag_from_header() {
        let tc = Arc::new(TestClient::new());
        tc.on(
            Method::GET,
            "/c",
            Response::new(StatusCode::OK)
                .with_header("ETag", "\"header-etag\"")
                .with_body(r#"{"@odata.id": "/c", "Id": "c", "@odata.etag": "\"body-etag\""}"#),
        );
        tc.on_get("/d", r#"{"@odata.id": "/d", "Id": "d", "@odata.etag": "\"body-etag\""}"#);
        let client: Client = tc;
        let c: Certificate = get_object(&client, "/c").unwrap();
        assert_eq!(c.entity.etag.as_deref(), Some("\"header-etag\""));
        let d: Certificate = get_object(&client, "/d").unwrap();
        assert_eq!(d.entity.etag.as_deref(), Some("\"body-etag\""));
    }

    #[test]
    fn test_http_error() {
        let tc = Arc::new(TestClient::new());
        tc.on(
            Method::GET,
            "/missing",
            Response::new(StatusCode::NOT_FOUND).with_body("no such resource"),
        );
        let client: Client = tc;
        let err = get_object::<Certificate>(&client, "/missing").unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "404: no such resource");
    }

    #[test]
    fn test_malformed_and_empty() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/bad", "{\"Id\": ");
        tc.on(Method::GET, "/empty", Response::new(StatusCode::OK));
        let client: Client = tc;
        assert!(matches!(
            get_object::<Certificate>(&client, "/bad"),
            Err(RedfishError::JsonDeserializeError { .. })
        ));
        assert!(matches!(
            get_object::<Certificate>(&client, "/empty"),
            Err(RedfishError::NoContent { .. })
        ));
    }

    // Navigation properties that are absent or malformed come out empty.
    #[test]
    fn test_absent_links_are_empty() {
        let cert: Certificate =
            decode_bytes("/x", br#"{"@odata.id": "/x", "Id": "x", "Links": {"Issuer": 7}}"#).unwrap();
        assert!(cert.issuer_uri().is_none());
        assert!(cert.subject_uris().is_empty());
        assert!(cert.entity.client().is_err());
    }
}
