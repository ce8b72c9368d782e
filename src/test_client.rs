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
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use reqwest::{header::HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::{
    network::{HttpClient, Response},
    RedfishError,
};

/// One request seen by a [`TestClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct TestCall {
    pub method: Method,
    pub uri: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

/// An in-memory [`HttpClient`] for tests.
///
/// Responses are scripted per method and URI. Several responses for the same
/// request are returned in order; the last one keeps being returned. Anything
/// unscripted gets a Redfish 404. Every request is recorded.
#[derive(Debug, Default)]
pub struct TestClient {
    responses: Mutex<HashMap<(Method, String), VecDeque<Response>>>,
    calls: Mutex<Vec<TestCall>>,
    disable_etag_match: bool,
}

impl TestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_etag_match_disabled(mut self) -> Self {
        self.disable_etag_match = true;
        self
    }

    pub fn on(&self, method: Method, uri: &str, response: Response) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry((method, uri.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Scripts `200 OK` with a JSON body for GET `uri`.
    pub fn on_get(&self, uri: &str, body: &str) {
        self.on(
            Method::GET,
            uri,
            Response::new(StatusCode::OK)
                .with_header("Content-Type", "application/json")
                .with_body(body),
        );
    }

    pub fn calls(&self) -> Vec<TestCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn calls_for(&self, method: &Method) -> Vec<TestCall> {
        self.calls()
            .into_iter()
            .filter(|c| &c.method == method)
            .collect()
    }

    fn respond(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        headers: &HeaderMap,
    ) -> Result<Response, RedfishError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(TestCall {
                method: method.clone(),
                uri: uri.to_string(),
                body: body.cloned(),
                headers: headers.clone(),
            });
        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        let scripted = responses
            .get_mut(&(method, uri.to_string()))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            });
        Ok(scripted.unwrap_or_else(|| not_found(uri)))
    }
}

fn not_found(uri: &str) -> Response {
    let body = serde_json::json!({
        "error": {
            "code": "Base.1.8.ResourceMissingAtURI",
            "message": format!("The resource at the URI '{uri}' was not found."),
        }
    });
    Response::new(StatusCode::NOT_FOUND).with_body(body.to_string())
}

impl HttpClient for TestClient {
    fn get(&self, uri: &str) -> Result<Response, RedfishError> {
        self.respond(Method::GET, uri, None, &HeaderMap::new())
    }

    fn post(
        &self,
        uri: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<Response, RedfishError> {
        self.respond(Method::POST, uri, Some(body), headers)
    }

    fn patch(
        &self,
        uri: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<Response, RedfishError> {
        self.respond(Method::PATCH, uri, Some(body), headers)
    }

    fn put(&self, uri: &str, body: &Value, headers: &HeaderMap) -> Result<Response, RedfishError> {
        self.respond(Method::PUT, uri, Some(body), headers)
    }

    fn delete(&self, uri: &str, headers: &HeaderMap) -> Result<Response, RedfishError> {
        self.respond(Method::DELETE, uri, None, headers)
    }

    fn is_etag_match_disabled(&self) -> bool {
        self.disable_etag_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_order() {
        let tc = TestClient::new();
        tc.on(Method::POST, "/a", Response::new(StatusCode::ACCEPTED));
        tc.on(Method::POST, "/a", Response::new(StatusCode::OK));
        let body = serde_json::json!({});
        let h = HeaderMap::new();
        assert_eq!(tc.post("/a", &body, &h).unwrap().status, StatusCode::ACCEPTED);
        assert_eq!(tc.post("/a", &body, &h).unwrap().status, StatusCode::OK);
        assert_eq!(tc.post("/a", &body, &h).unwrap().status, StatusCode::OK);
        assert_eq!(tc.calls_for(&Method::POST).len(), 3);
    }

    #[test]
    fn test_unscripted_is_404() {
        let tc = TestClient::new();
        let r = tc.get("/nope").unwrap();
        assert_eq!(r.status, StatusCode::NOT_FOUND);
        let err = r.error_for_status("/nope").unwrap_err();
        assert_eq!(
            err.service_error().unwrap().code,
            "Base.1.8.ResourceMissingAtURI"
        );
    }
}
