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

use serde::{Deserialize, Serialize};

use super::{impl_resource, Entity, Message, ResourceHealth};

/// https://redfish.dmtf.org/schemas/v1/Task.v1_7_4.json
/// A long running operation. Returned in the body of a task monitor while the
/// operation runs, and found under TaskService/Tasks.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(flatten)]
    pub entity: Entity,
    pub task_state: Option<TaskState>,
    pub task_status: Option<ResourceHealth>,
    pub percent_complete: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub task_monitor: Option<String>,
    pub hide_payload: Option<bool>,
    pub payload: Option<TaskPayload>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

impl_resource!(Task);

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.task_state.is_some_and(TaskState::is_terminal)
    }
}

/// The request that started the task, when the service reveals it.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    #[serde(rename = "HttpHeaders", default)]
    pub http_headers: Vec<String>,
    #[serde(rename = "HttpOperation")]
    pub http_operation: Option<String>,
    #[serde(rename = "JsonBody")]
    pub json_body: Option<String>,
    #[serde(rename = "TargetUri")]
    pub target_uri: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    New,
    Starting,
    Running,
    Suspended,
    Interrupted,
    Pending,
    Stopping,
    Completed,
    Killed,
    Exception,
    Service,
    Cancelling,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Killed | TaskState::Exception | TaskState::Cancelled
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::decode_bytes;

    #[test]
    fn test_task_parser() {
        let data = include_str!("testdata/task.json");
        let task: Task = decode_bytes("/redfish/v1/TaskService/Tasks/545", data.as_bytes()).unwrap();
        assert_eq!(task.entity.id, "545");
        assert_eq!(task.task_state, Some(TaskState::Exception));
        assert_eq!(task.task_status, Some(ResourceHealth::Critical));
        assert!(task.is_terminal());
        assert_eq!(task.messages.len(), 1);
        assert_eq!(
            task.payload.unwrap().target_uri.as_deref(),
            Some("/redfish/v1/UpdateService/Actions/UpdateService.SimpleUpdate")
        );
        assert!(!TaskState::Running.is_terminal());
    }
}
