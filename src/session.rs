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

use reqwest::{header::HeaderMap, Url};
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    network::{Client, X_AUTH_TOKEN},
    RedfishError,
};

/// A Redfish session. Hand `token` to the HTTP client for later requests and
/// DELETE `session_uri` to log out.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
    /// Path and query of the session resource, relative to the service.
    pub session_uri: String,
    pub username: String,
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"<redacted>")
            .field("session_uri", &self.session_uri)
            .field("username", &self.username)
            .finish()
    }
}

/// POSTs credentials to the session collection at `uri`.
pub fn create_session(
    client: &Client,
    uri: &str,
    username: &str,
    password: &str,
) -> Result<AuthToken, RedfishError> {
    let body = json!({"UserName": username, "Password": password});
    let response = client
        .post(uri, &body, &HeaderMap::new())?
        .error_for_status(uri)?;

    let token = response
        .header(X_AUTH_TOKEN)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RedfishError::MissingHeader {
            header: X_AUTH_TOKEN.to_string(),
            url: uri.to_string(),
        })?
        .to_string();

    // Some services only put the new session in the body.
    let session_uri = match response.location() {
        Some(location) => normalize_location(location),
        None => response
            .json::<Value>(uri)
            .ok()
            .and_then(|v| v.get("@odata.id").and_then(Value::as_str).map(str::to_string))
            .ok_or_else(|| RedfishError::MissingHeader {
                header: "Location".to_string(),
                url: uri.to_string(),
            })?,
    };
    debug!("created session {session_uri} for {username}");
    Ok(AuthToken {
        token,
        session_uri,
        username: username.to_string(),
    })
}

/// DELETEs the session. Any 2XX is success.
pub fn delete_session(client: &Client, session_uri: &str) -> Result<(), RedfishError> {
    client
        .delete(session_uri, &HeaderMap::new())?
        .error_for_status(session_uri)?;
    debug!("deleted session {session_uri}");
    Ok(())
}

/// Reduces an absolute `Location` to path and query. Anything that does not
/// parse as an absolute URL is taken to be a path already.
pub fn normalize_location(location: &str) -> String {
    match Url::parse(location) {
        Ok(url) => match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_string(),
        },
        Err(_) => location.to_string(),
    }
}
