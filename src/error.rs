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
use std::{borrow::Cow, fmt};

use reqwest::StatusCode;
use serde::Deserialize;

use crate::model::Message;

#[derive(thiserror::Error, Debug)]
pub enum RedfishError {
    #[error("Network error talking to BMC at {url}. {source}")]
    NetworkError {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    HTTPError(Box<ServiceError>),

    #[error("Resource at {url} changed on the service, refetch before writing. {error}")]
    StalenessError {
        url: String,
        error: Box<ServiceError>,
    },

    #[error("Could not deserialize response from {url}. Body: {body}. {source}")]
    JsonDeserializeError {
        url: String,
        body: String,
        source: serde_json::Error,
    },

    #[error("Could not serialize request body for {url}. Obj: {object_debug}. {source}")]
    JsonSerializeError {
        url: String,
        object_debug: String,
        source: serde_json::Error,
    },

    #[error("Remote returned empty body at {url}")]
    NoContent { url: String },

    #[error("Missing header {header} in response from {url}")]
    MissingHeader { header: String, url: String },

    #[error("Resource {url} is not attached to a client")]
    NotAttached { url: String },

    #[error("Action {action} is not supported by {resource}")]
    UnsupportedAction { action: String, resource: String },

    #[error("Action {action} on {resource} does not advertise an ActionInfo")]
    ActionInfoMissing { action: String, resource: String },

    #[error("{parameter} '{value}' is not allowed by {resource}. Allowed: {allowed:?}")]
    ValidationError {
        parameter: String,
        value: String,
        allowed: Vec<String>,
        resource: String,
    },

    #[error(transparent)]
    Collection(Box<CollectionError>),

    #[error("Invalid Retry-After header. {0}")]
    RetryAfter(#[from] RetryAfterError),

    #[error("Missing key {key} in JSON at {url}")]
    MissingKey { key: String, url: String },

    #[error("Key {key} should be {expected_type} at {url}")]
    InvalidKeyType {
        key: String,
        expected_type: String,
        url: String,
    },
}

impl RedfishError {
    /// HTTP status of the response that caused this error, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RedfishError::HTTPError(e) => e.status,
            RedfishError::StalenessError { error, .. } => error.status,
            _ => None,
        }
    }

    /// The parsed Redfish error body, for HTTP level failures.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            RedfishError::HTTPError(e) => Some(e),
            RedfishError::StalenessError { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, RedfishError::StalenessError { .. })
    }
}

impl From<CollectionError> for RedfishError {
    fn from(e: CollectionError) -> Self {
        RedfishError::Collection(Box::new(e))
    }
}

impl From<ServiceError> for RedfishError {
    fn from(e: ServiceError) -> Self {
        RedfishError::HTTPError(Box::new(e))
    }
}

/// Failures of the Retry-After helper.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryAfterError {
    #[error("value is empty")]
    IsEmpty,

    #[error("number of seconds is negative")]
    IsNegative,

    #[error("{0:?} is neither an HTTP-date nor a number of seconds")]
    Neither(String),
}

/// Members of a collection that could not be fetched or decoded, keyed by
/// their link.
#[derive(Debug, Default)]
pub struct CollectionError {
    pub url: String,
    pub failures: Vec<(String, RedfishError)>,
}

impl CollectionError {
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// The error recorded for `member`, if it failed.
    pub fn get(&self, member: &str) -> Option<&RedfishError> {
        self.failures
            .iter()
            .find(|(uri, _)| uri == member)
            .map(|(_, e)| e)
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of the members of {} failed:", self.failures.len(), self.url)?;
        for (uri, e) in &self.failures {
            write!(f, " [{uri}: {e}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for CollectionError {}

/// A non-2XX response, with the Redfish error object parsed out of the body
/// when there is one. The raw body is always kept.
#[derive(Debug, Clone, Default)]
pub struct ServiceError {
    pub status: Option<StatusCode>,
    pub url: String,
    /// MessageId of the top level error, empty when the body is not a Redfish error.
    pub code: String,
    pub message: String,
    pub extended_info: Vec<Message>,
    pub raw_body: Vec<u8>,
}

// {"error": {"code": "...", "message": "...", "@Message.ExtendedInfo": [...]}}
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Deserialize)]
struct ErrorObject {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(rename = "@Message.ExtendedInfo", default)]
    extended_info: Vec<Message>,
}

impl ServiceError {
    pub fn new(status: Option<StatusCode>, url: &str, body: &[u8]) -> Self {
        let raw_body = body.to_vec();
        let text = String::from_utf8_lossy(body).into_owned();
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let e = envelope.error;
                ServiceError {
                    status,
                    url: url.to_string(),
                    code: e.code,
                    message: if e.message.is_empty() { text } else { e.message },
                    extended_info: e.extended_info,
                    raw_body,
                }
            }
            Err(_) => ServiceError {
                status,
                url: url.to_string(),
                code: String::new(),
                message: text,
                extended_info: Vec::new(),
                raw_body,
            },
        }
    }

    pub fn raw_body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw_body)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{}: {}", status.as_u16(), self.raw_body_text()),
            None => write!(f, "{}", self.raw_body_text()),
        }
    }
}

impl std::error::Error for ServiceError {}

#[cfg(test)]
mod tests {
    use super::*;

    const BAD_REQUEST: &str = r##"{
        "error": {
            "code": "Base.1.8.GeneralError",
            "message": "A general error has occurred. See ExtendedInfo for more information.",
            "@Message.ExtendedInfo": [
                {
                    "@odata.type": "#Message.v1_0_0.Message",
                    "MessageId": "Base.1.8.PropertyValueNotInList",
                    "Message": "The value Bogus for the property ResetType is not in the list of acceptable values.",
                    "MessageArgs": ["Bogus", "ResetType"],
                    "Severity": "Warning",
                    "Resolution": "Choose a value from the enumeration list."
                }
            ]
        }
    }"##;

    // Redfish error objects have their code, message and extended info parsed.
    #[test]
    fn test_parse_redfish_error() {
        let e = ServiceError::new(
            Some(StatusCode::BAD_REQUEST),
            "/redfish/v1/Managers/1",
            BAD_REQUEST.as_bytes(),
        );
        assert_eq!(e.code, "Base.1.8.GeneralError");
        assert!(e.message.starts_with("A general error"));
        assert_eq!(e.extended_info.len(), 1);
        assert_eq!(e.extended_info[0].message_id, "Base.1.8.PropertyValueNotInList");
        assert_eq!(e.extended_info[0].message_args, vec!["Bogus", "ResetType"]);
        assert_eq!(e.raw_body, BAD_REQUEST.as_bytes());
    }

    // Bodies that are not Redfish errors keep the raw text as the message.
    #[test]
    fn test_non_redfish_body() {
        let e = ServiceError::new(Some(StatusCode::BAD_GATEWAY), "/x", b"upstream timed out");
        assert_eq!(e.code, "");
        assert_eq!(e.message, "upstream timed out");
        assert!(e.extended_info.is_empty());
    }

    #[test]
    fn test_display() {
        let e = ServiceError::new(Some(StatusCode::NOT_FOUND), "/x", b"not here");
        assert_eq!(e.to_string(), "404: not here");
        let e = ServiceError::new(None, "/x", b"not here");
        assert_eq!(e.to_string(), "not here");

        let err: RedfishError = ServiceError::new(Some(StatusCode::NOT_FOUND), "/x", b"gone").into();
        assert_eq!(err.to_string(), "404: gone");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_stale());
    }

    #[test]
    fn test_collection_error() {
        let mut e = CollectionError {
            url: "/c".to_string(),
            ..Default::default()
        };
        assert!(e.is_empty());
        e.failures.push((
            "/c/2".to_string(),
            ServiceError::new(Some(StatusCode::NOT_FOUND), "/c/2", b"gone").into(),
        ));
        assert_eq!(e.get("/c/2").and_then(RedfishError::status), Some(StatusCode::NOT_FOUND));
        assert!(e.get("/c/1").is_none());
        assert_eq!(e.to_string(), "1 of the members of /c failed: [/c/2: 404: gone]");
        let err: RedfishError = e.into();
        assert!(matches!(err, RedfishError::Collection(_)));
    }

    #[test]
    fn test_retry_after_messages() {
        let e = RetryAfterError::Neither("soon".to_string());
        assert!(e.to_string().contains("neither"));
    }
}
