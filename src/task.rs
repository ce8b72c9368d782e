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
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::{
    decode,
    model::Task,
    network::{Client, Response},
    RedfishError, RetryAfterError,
};

/// Handle to an operation the service accepted with 202 and runs in the
/// background. The caller polls it at their own pace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMonitor {
    /// Task monitor URI, from the `Location` header.
    pub uri: String,
    /// Earliest time the service wants to be asked again.
    pub retry_after: Option<DateTime<Utc>>,
}

/// One observation of a task monitor.
#[derive(Debug)]
pub enum TaskPoll {
    /// Still running. The body, when the service sends one, is the Task.
    Running {
        task: Option<Task>,
        retry_after: Option<DateTime<Utc>>,
    },
    /// The operation completed. This is the response of the original
    /// request, which may or may not have a body.
    Finished(Response),
}

impl TaskMonitor {
    pub fn new(uri: &str) -> Self {
        TaskMonitor {
            uri: uri.to_string(),
            retry_after: None,
        }
    }

    /// Builds the monitor from a 202 response to a request sent to `url`.
    pub fn from_response(url: &str, response: &Response) -> Result<Self, RedfishError> {
        let uri = response
            .location()
            .ok_or_else(|| RedfishError::MissingHeader {
                header: "Location".to_string(),
                url: url.to_string(),
            })?;
        Ok(TaskMonitor {
            uri: uri.to_string(),
            retry_after: retry_after_of(url, response),
        })
    }

    /// GETs the monitor URI once.
    pub fn poll(&self, client: &Client) -> Result<TaskPoll, RedfishError> {
        let response = client.get(&self.uri)?;
        if response.status == StatusCode::ACCEPTED {
            let retry_after = retry_after_of(&self.uri, &response);
            let task = if response.has_body() {
                match decode::decode_response::<Task>(client, &self.uri, response) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        debug!("task monitor {} body is not a Task: {e}", self.uri);
                        None
                    }
                }
            } else {
                None
            };
            return Ok(TaskPoll::Running { task, retry_after });
        }
        Ok(TaskPoll::Finished(response.error_for_status(&self.uri)?))
    }
}

// A malformed Retry-After on an otherwise good response is not worth failing
// the request for.
fn retry_after_of(url: &str, response: &Response) -> Option<DateTime<Utc>> {
    let value = response.header("Retry-After")?;
    match parse_retry_after(value) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("ignoring Retry-After from {url}: {e}");
            None
        }
    }
}

/// Parses a Retry-After header value, either delay-seconds or an HTTP-date,
/// into the absolute time it names.
pub fn parse_retry_after(value: &str) -> Result<DateTime<Utc>, RetryAfterError> {
    parse_retry_after_at(value, Utc::now())
}

/// [`parse_retry_after`] relative to a given `now`.
pub fn parse_retry_after_at(
    value: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, RetryAfterError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RetryAfterError::IsEmpty);
    }
    if let Ok(secs) = value.parse::<i64>() {
        if secs < 0 {
            return Err(RetryAfterError::IsNegative);
        }
        // Delays past what chrono can represent saturate.
        return Ok(TimeDelta::try_seconds(secs)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC));
    }
    // Too many digits for i64.
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if negative {
            return Err(RetryAfterError::IsNegative);
        }
        return Ok(DateTime::<Utc>::MAX_UTC);
    }
    DateTime::parse_from_rfc2822(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| RetryAfterError::Neither(value.to_string()))
}
