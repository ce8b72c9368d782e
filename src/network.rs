/*
 * SPDX-FileCopyrightText: Copyright (c) 2023 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
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
use std::{fmt, sync::Arc, time::Duration};

use reqwest::{
    blocking::Client as ReqwestClient, blocking::ClientBuilder as ReqwestClientBuilder,
    header::HeaderMap, header::HeaderName, header::HeaderValue, header::ACCEPT,
    header::CONTENT_TYPE, header::ETAG, header::LOCATION, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub use crate::RedfishError;
use crate::ServiceError;

pub const REDFISH_ENDPOINT: &str = "/redfish/v1/";
pub const X_AUTH_TOKEN: &str = "X-Auth-Token";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// The operations the engine needs from an HTTP client.
///
/// Implementations add their own credentials (Basic auth, session token) and
/// return every response, whatever its status. The engine decides what a
/// status means. Implementations are shared between threads through
/// [`Client`], so they must be immutable or internally synchronized.
pub trait HttpClient: Send + Sync + fmt::Debug {
    fn get(&self, uri: &str) -> Result<Response, RedfishError>;

    fn post(&self, uri: &str, body: &Value, headers: &HeaderMap)
        -> Result<Response, RedfishError>;

    fn patch(
        &self,
        uri: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<Response, RedfishError>;

    fn put(&self, uri: &str, body: &Value, headers: &HeaderMap) -> Result<Response, RedfishError>;

    fn delete(&self, uri: &str, headers: &HeaderMap) -> Result<Response, RedfishError>;

    /// When true no `If-Match` header is sent on writes.
    fn is_etag_match_disabled(&self) -> bool {
        false
    }
}

/// Shared handle every resource keeps to the client it was fetched with.
pub type Client = Arc<dyn HttpClient>;

/// A fully read HTTP response.
///
/// The body is read to the end by the client before it is handed to the
/// engine, so the underlying connection is already released. Dropping the
/// Response frees the buffer.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Response {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header. Names or values that are not valid HTTP are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(n), Ok(v)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(n, v);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
    }

    pub fn etag(&self) -> Option<&str> {
        self.headers
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
    }

    /// False for empty and whitespace-only bodies.
    pub fn has_body(&self) -> bool {
        self.body.iter().any(|b| !b.is_ascii_whitespace())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RedfishError> {
        serde_json::from_slice(&self.body).map_err(|e| RedfishError::JsonDeserializeError {
            url: url.to_string(),
            body: self.text(),
            source: e,
        })
    }

    /// Turns any non-2XX response into an HTTPError carrying the parsed
    /// Redfish error and the raw body. Every engine path goes through here.
    pub fn error_for_status(self, url: &str) -> Result<Response, RedfishError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.into_service_error(url).into())
        }
    }

    pub fn into_service_error(self, url: &str) -> ServiceError {
        ServiceError::new(Some(self.status), url, &self.body)
    }
}

#[derive(Debug)]
pub struct RedfishClientPoolBuilder {
    timeout: Duration,
    accept_invalid_certs: bool,
    disable_etag_match: bool,
}

impl RedfishClientPoolBuilder {
    /// Prevents the Redfish Client from accepting self signed certificates
    /// and other invalid certificates.
    ///
    /// By default self signed certificates will be accepted, since BMCs usually
    /// use those.
    pub fn reject_invalid_certs(mut self) -> RedfishClientPoolBuilder {
        self.accept_invalid_certs = false;
        self
    }

    /// Overwrites the timeout that will be applied to every request
    pub fn timeout(mut self, timeout: Duration) -> RedfishClientPoolBuilder {
        self.timeout = timeout;
        self
    }

    /// Clients created from this pool will not send `If-Match` on writes.
    /// Some BMCs reject requests that carry it.
    pub fn disable_etag_match(mut self) -> RedfishClientPoolBuilder {
        self.disable_etag_match = true;
        self
    }

    /// Builds a Redfish Client Network Configuration
    pub fn build(&self) -> Result<RedfishClientPool, RedfishError> {
        let http_client = ReqwestClientBuilder::new()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.timeout)
            .build()
            .map_err(|e| RedfishError::NetworkError {
                url: String::new(),
                source: e.into(),
            })?;
        Ok(RedfishClientPool {
            http_client,
            disable_etag_match: self.disable_etag_match,
        })
    }
}

/// The endpoint that the redfish client connects to
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP address of BMC
    pub host: String,
    /// BMC port. If absent the scheme's default port is used
    pub port: Option<u16>,
    /// BMC username, for HTTP Basic authentication
    pub user: Option<String>,
    /// BMC password
    pub password: Option<String>,
    /// Talk plain HTTP instead of HTTPS. Only mockup servers want this.
    pub insecure_http: bool,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("insecure_http", &self.insecure_http)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RedfishClientPool {
    http_client: ReqwestClient,
    disable_etag_match: bool,
}

impl RedfishClientPool {
    /// Returns Builder for configuring a Redfish HTTP connection pool
    pub fn builder() -> RedfishClientPoolBuilder {
        RedfishClientPoolBuilder {
            timeout: DEFAULT_TIMEOUT,
            // BMCs often have a self-signed cert, so usually this has to be true
            accept_invalid_certs: true,
            disable_etag_match: false,
        }
    }

    /// Creates a client for one endpoint. No request is made.
    pub fn create_client(&self, endpoint: Endpoint) -> Arc<RedfishHttpClient> {
        let auth = match &endpoint.user {
            Some(user) => Auth::Basic {
                user: user.clone(),
                password: endpoint.password.clone(),
            },
            None => Auth::None,
        };
        Arc::new(RedfishHttpClient {
            endpoint,
            http_client: self.http_client.clone(),
            auth,
            disable_etag_match: self.disable_etag_match,
        })
    }
}

#[derive(Clone)]
enum Auth {
    None,
    Basic {
        user: String,
        password: Option<String>,
    },
    Session(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => write!(f, "None"),
            Auth::Basic { user, .. } => write!(f, "Basic({user})"),
            Auth::Session(_) => write!(f, "Session"),
        }
    }
}

/// A blocking HTTP client which targets a single Redfish endpoint
#[derive(Debug, Clone)]
pub struct RedfishHttpClient {
    endpoint: Endpoint,
    http_client: ReqwestClient,
    auth: Auth,
    disable_etag_match: bool,
}

impl RedfishHttpClient {
    /// A copy of this client that authenticates with a session token
    /// instead of Basic credentials.
    pub fn with_session(&self, token: &str) -> Arc<RedfishHttpClient> {
        Arc::new(RedfishHttpClient {
            auth: Auth::Session(token.to_string()),
            ..self.clone()
        })
    }

    /// A copy of this client that sends no credentials.
    pub fn without_auth(&self) -> Arc<RedfishHttpClient> {
        Arc::new(RedfishHttpClient {
            auth: Auth::None,
            ..self.clone()
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Absolute URL for a service path. Absolute URLs pass through unchanged.
    pub fn url_for(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return uri.to_string();
        }
        let scheme = if self.endpoint.insecure_http {
            "http"
        } else {
            "https"
        };
        let sep = if uri.starts_with('/') { "" } else { "/" };
        match self.endpoint.port {
            Some(p) => format!("{scheme}://{}:{p}{sep}{uri}", self.endpoint.host),
            None => format!("{scheme}://{}{sep}{uri}", self.endpoint.host),
        }
    }

    // All the HTTP requests happen from here.
    fn req(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        headers: &HeaderMap,
    ) -> Result<Response, RedfishError> {
        let url = self.url_for(uri);
        let body_enc = match body {
            Some(b) => Some(serde_json::to_string(b).map_err(|e| {
                RedfishError::JsonSerializeError {
                    url: url.clone(),
                    object_debug: format!("{b:?}"),
                    source: e,
                }
            })?),
            None => None,
        };
        // Session creation and account writes carry credentials
        let loggable = match body {
            Some(Value::Object(m)) if m.contains_key("Password") => "<redacted>",
            _ => body_enc.as_deref().unwrap_or_default(),
        };
        debug!("TX {} {} {}", method, url, loggable);

        let mut req_b = self
            .http_client
            .request(method, &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(b) = body_enc {
            req_b = req_b
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(b);
        }
        req_b = match &self.auth {
            Auth::None => req_b,
            Auth::Basic { user, password } => req_b.basic_auth(user, password.as_ref()),
            Auth::Session(token) => req_b.header(X_AUTH_TOKEN, token.as_str()),
        };
        req_b = req_b.headers(headers.clone());

        let response = req_b.send().map_err(|e| RedfishError::NetworkError {
            url: url.clone(),
            source: e.into(),
        })?;
        let status = response.status();
        let resp_headers = response.headers().clone();
        // read the body even if not status 2XX, because BMCs give useful error messages as JSON
        let body = response
            .bytes()
            .map_err(|e| RedfishError::NetworkError {
                url: url.clone(),
                source: e.into(),
            })?
            .to_vec();
        if body.is_empty() {
            debug!("RX {status}");
        } else {
            debug!("RX {status} {}", String::from_utf8_lossy(&body));
        }
        Ok(Response {
            status,
            headers: resp_headers,
            body,
        })
    }
}

impl HttpClient for RedfishHttpClient {
    fn get(&self, uri: &str) -> Result<Response, RedfishError> {
        self.req(Method::GET, uri, None, &HeaderMap::new())
    }

    fn post(
        &self,
        uri: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<Response, RedfishError> {
        self.req(Method::POST, uri, Some(body), headers)
    }

    fn patch(
        &self,
        uri: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<Response, RedfishError> {
        self.req(Method::PATCH, uri, Some(body), headers)
    }

    fn put(&self, uri: &str, body: &Value, headers: &HeaderMap) -> Result<Response, RedfishError> {
        self.req(Method::PUT, uri, Some(body), headers)
    }

    fn delete(&self, uri: &str, headers: &HeaderMap) -> Result<Response, RedfishError> {
        self.req(Method::DELETE, uri, None, headers)
    }

    fn is_etag_match_disabled(&self) -> bool {
        self.disable_etag_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(port: Option<u16>, insecure_http: bool) -> Arc<RedfishHttpClient> {
        let pool = RedfishClientPool::builder().build().unwrap();
        pool.create_client(Endpoint {
            host: "10.0.0.5".to_string(),
            port,
            user: Some("root".to_string()),
            password: Some("calvin".to_string()),
            insecure_http,
        })
    }

    #[test]
    fn test_url_for() {
        let c = client(None, false);
        assert_eq!(
            c.url_for("/redfish/v1/Managers"),
            "https://10.0.0.5/redfish/v1/Managers"
        );
        assert_eq!(c.url_for("redfish/v1"), "https://10.0.0.5/redfish/v1");
        assert_eq!(
            c.url_for("https://other/redfish/v1/"),
            "https://other/redfish/v1/"
        );
        let c = client(Some(8000), true);
        assert_eq!(
            c.url_for(REDFISH_ENDPOINT),
            "http://10.0.0.5:8000/redfish/v1/"
        );
    }

    // Credentials never end up in Debug output.
    #[test]
    fn test_debug_hides_secrets() {
        let c = client(None, false);
        let s = c.with_session("s3cr3t-token");
        assert!(!format!("{c:?}").contains("calvin"));
        assert!(!format!("{:?}", c.endpoint()).contains("calvin"));
        assert!(format!("{:?}", c.endpoint()).contains("<redacted>"));
        assert!(!format!("{s:?}").contains("s3cr3t-token"));
    }

    #[test]
    fn test_etag_match_toggle() {
        let pool = RedfishClientPool::builder().build().unwrap();
        let c = pool.create_client(Endpoint::default());
        assert!(!c.is_etag_match_disabled());
        let pool = RedfishClientPool::builder()
            .disable_etag_match()
            .build()
            .unwrap();
        let c = pool.create_client(Endpoint::default());
        assert!(c.is_etag_match_disabled());
        assert!(c.with_session("t").is_etag_match_disabled());
    }

    #[test]
    fn test_response_helpers() {
        let r = Response::new(StatusCode::CREATED)
            .with_header("Location", "/redfish/v1/AccountService/Accounts/3")
            .with_header("ETag", "W/\"12\"")
            .with_body("  \n");
        assert_eq!(r.location(), Some("/redfish/v1/AccountService/Accounts/3"));
        assert_eq!(r.etag(), Some("W/\"12\""));
        assert!(!r.has_body());
        assert!(r.error_for_status("/x").is_ok());

        let r = Response::new(StatusCode::PRECONDITION_FAILED).with_body("stale");
        let err = r.error_for_status("/x").unwrap_err();
        assert_eq!(err.to_string(), "412: stale");
    }
}
