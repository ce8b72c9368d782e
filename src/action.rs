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
    collections::{BTreeMap, HashMap},
    sync::OnceLock,
};

use reqwest::{header::HeaderMap, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    decode,
    model::{ActionInfo, Entity},
    network::{Client, Response},
    task::TaskMonitor,
    RedfishError,
};

const ALLOWABLE_VALUES: &str = "@Redfish.AllowableValues";

/// How an action request completed.
#[derive(Debug)]
pub enum ActionOutcome<R> {
    /// Done. Holds the response body when the service sent one.
    Completed(Option<R>),
    /// Accepted with 202, continuing in a task.
    Pending(TaskMonitor),
}

impl<R> ActionOutcome<R> {
    pub fn task(&self) -> Option<&TaskMonitor> {
        match self {
            ActionOutcome::Pending(m) => Some(m),
            ActionOutcome::Completed(_) => None,
        }
    }
}

/// One entry of a resource's `Actions` block:
///
/// ```json
/// "#Manager.Reset": {
///     "target": "/redfish/v1/Managers/1/Actions/Manager.Reset",
///     "ResetType@Redfish.AllowableValues": ["GracefulRestart"],
///     "@Redfish.ActionInfo": "/redfish/v1/Managers/1/ResetActionInfo"
/// }
/// ```
///
/// An empty target means the resource does not support the action.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(from = "RawActionTarget")]
pub struct ActionTarget {
    pub target: String,
    pub action_info: String,
    allowable: BTreeMap<String, Vec<String>>,
    info: OnceLock<ActionInfo>,
}

#[derive(Deserialize)]
struct RawActionTarget {
    #[serde(default)]
    target: String,
    #[serde(rename = "@Redfish.ActionInfo", default)]
    action_info: String,
    #[serde(flatten)]
    rest: HashMap<String, Value>,
}

impl From<RawActionTarget> for ActionTarget {
    fn from(raw: RawActionTarget) -> Self {
        let allowable = raw
            .rest
            .into_iter()
            .filter_map(|(k, v)| {
                let param = k.strip_suffix(ALLOWABLE_VALUES)?.to_string();
                let values = v
                    .as_array()?
                    .iter()
                    .filter_map(|x| x.as_str().map(str::to_string))
                    .collect();
                Some((param, values))
            })
            .collect();
        ActionTarget {
            target: raw.target,
            action_info: raw.action_info,
            allowable,
            info: OnceLock::new(),
        }
    }
}

impl ActionTarget {
    pub fn new(target: &str) -> Self {
        ActionTarget {
            target: target.to_string(),
            ..Default::default()
        }
    }

    pub fn is_supported(&self) -> bool {
        !self.target.is_empty()
    }

    /// Values listed inline with `<param>@Redfish.AllowableValues`.
    pub fn allowable_values(&self, param: &str) -> Option<&[String]> {
        self.allowable.get(param).map(Vec::as_slice)
    }

    /// Fetches the ActionInfo companion the first time it is asked for.
    pub fn action_info(&self, entity: &Entity, action: &str) -> Result<&ActionInfo, RedfishError> {
        if let Some(info) = self.info.get() {
            return Ok(info);
        }
        if self.action_info.is_empty() {
            return Err(RedfishError::ActionInfoMissing {
                action: action.to_string(),
                resource: entity.odata_id.clone(),
            });
        }
        let info: ActionInfo = decode::get_object(entity.client()?, &self.action_info)?;
        Ok(self.info.get_or_init(|| info))
    }

    /// The values the service accepts for `param`. The inline list wins over
    /// ActionInfo. Empty means the service did not say.
    pub fn supported_values(
        &self,
        entity: &Entity,
        action: &str,
        param: &str,
    ) -> Result<Vec<String>, RedfishError> {
        if let Some(values) = self.allowable_values(param).filter(|v| !v.is_empty()) {
            return Ok(values.to_vec());
        }
        if self.action_info.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.action_info(entity, action)?.param_values(param))
    }

    /// Rejects `value` when the service advertised the allowed values for
    /// `param` and `value` is not one of them.
    pub fn check_parameter(
        &self,
        entity: &Entity,
        action: &str,
        param: &str,
        value: &str,
    ) -> Result<(), RedfishError> {
        let allowed = self.supported_values(entity, action, param)?;
        if allowed.is_empty() || allowed.iter().any(|a| a == value) {
            return Ok(());
        }
        Err(RedfishError::ValidationError {
            parameter: param.to_string(),
            value: value.to_string(),
            allowed,
            resource: entity.odata_id.clone(),
        })
    }

    /// POSTs `payload` to the target. Returns the task monitor when the
    /// service answers 202; any response body is ignored.
    pub fn invoke<P: Serialize>(
        &self,
        entity: &Entity,
        action: &str,
        payload: &P,
    ) -> Result<Option<TaskMonitor>, RedfishError> {
        match self.submit(entity, action, payload)? {
            ActionOutcome::Pending(m) => Ok(Some(m)),
            ActionOutcome::Completed(_) => Ok(None),
        }
    }

    /// Like [`ActionTarget::invoke`], decoding the response body as `R`.
    pub fn invoke_for<P: Serialize, R: DeserializeOwned>(
        &self,
        entity: &Entity,
        action: &str,
        payload: &P,
    ) -> Result<ActionOutcome<R>, RedfishError> {
        Ok(match self.submit(entity, action, payload)? {
            ActionOutcome::Pending(m) => ActionOutcome::Pending(m),
            ActionOutcome::Completed(None) => ActionOutcome::Completed(None),
            ActionOutcome::Completed(Some(r)) => {
                ActionOutcome::Completed(Some(r.json(&self.target)?))
            }
        })
    }

    fn submit<P: Serialize>(
        &self,
        entity: &Entity,
        action: &str,
        payload: &P,
    ) -> Result<ActionOutcome<Response>, RedfishError> {
        if !self.is_supported() {
            return Err(RedfishError::UnsupportedAction {
                action: action.to_string(),
                resource: entity.odata_id.clone(),
            });
        }
        let body = serde_json::to_value(payload).map_err(|e| RedfishError::JsonSerializeError {
            url: self.target.clone(),
            object_debug: action.to_string(),
            source: e,
        })?;
        debug!("{action} on {}", entity.odata_id);
        post_action(entity.client()?, &self.target, &body, &entity.headers())
    }
}

/// POSTs to an action target and sorts out the three ways it can go well.
/// Any non-2XX is an HTTPError.
pub fn post_action(
    client: &Client,
    target: &str,
    body: &Value,
    headers: &HeaderMap,
) -> Result<ActionOutcome<Response>, RedfishError> {
    let response = client.post(target, body, headers)?;
    if response.status == StatusCode::ACCEPTED {
        return Ok(ActionOutcome::Pending(TaskMonitor::from_response(
            target, &response,
        )?));
    }
    let response = response.error_for_status(target)?;
    if response.has_body() {
        Ok(ActionOutcome::Completed(Some(response)))
    } else {
        Ok(ActionOutcome::Completed(None))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::test_client::TestClient;

    const RESET: &str = r##"{
        "target": "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset",
        "ResetType@Redfish.AllowableValues": ["On", "ForceOff"],
        "@Redfish.ActionInfo": "/redfish/v1/Systems/1/ResetActionInfo"
    }"##;

    const ACTION_INFO: &str = r##"{
        "@odata.id": "/redfish/v1/Systems/1/ResetActionInfo",
        "Id": "ResetActionInfo",
        "Name": "Reset Action Info",
        "Parameters": [
            {"Name": "ResetType", "Required": true, "DataType": "String",
             "AllowableValues": ["On", "GracefulShutdown"]}
        ]
    }"##;

    fn entity(tc: &Arc<TestClient>) -> Entity {
        let mut e: Entity =
            serde_json::from_value(json!({"@odata.id": "/redfish/v1/Systems/1", "Id": "1"})).unwrap();
        e.set_client(tc.clone());
        e
    }

    #[test]
    fn test_decode_target() {
        let t: ActionTarget = serde_json::from_str(RESET).unwrap();
        assert!(t.is_supported());
        assert_eq!(t.action_info, "/redfish/v1/Systems/1/ResetActionInfo");
        assert_eq!(
            t.allowable_values("ResetType"),
            Some(&["On".to_string(), "ForceOff".to_string()][..])
        );
        assert_eq!(t.allowable_values("Other"), None);

        let t: ActionTarget = serde_json::from_str("{}").unwrap();
        assert!(!t.is_supported());
    }

    #[test]
    fn test_unsupported() {
        let tc = Arc::new(TestClient::new());
        let err = ActionTarget::default()
            .invoke(&entity(&tc), "Reset", &json!({}))
            .unwrap_err();
        assert!(matches!(err, RedfishError::UnsupportedAction { .. }));
        assert!(tc.calls().is_empty());
    }

    // The inline list is used without fetching ActionInfo.
    #[test]
    fn test_inline_allowable_values() {
        let tc = Arc::new(TestClient::new());
        let e = entity(&tc);
        let t: ActionTarget = serde_json::from_str(RESET).unwrap();
        assert!(t.check_parameter(&e, "Reset", "ResetType", "On").is_ok());
        let err = t
            .check_parameter(&e, "Reset", "ResetType", "GracefulShutdown")
            .unwrap_err();
        assert!(matches!(err, RedfishError::ValidationError { ref allowed, .. } if allowed.len() == 2));
        assert!(tc.calls().is_empty());
    }

    // Without an inline list, ActionInfo is fetched once and kept.
    #[test]
    fn test_action_info_memoized() {
        let tc = Arc::new(TestClient::new());
        tc.on_get("/redfish/v1/Systems/1/ResetActionInfo", ACTION_INFO);
        let e = entity(&tc);
        let t = ActionTarget {
            action_info: "/redfish/v1/Systems/1/ResetActionInfo".to_string(),
            ..ActionTarget::new("/redfish/v1/Systems/1/Actions/ComputerSystem.Reset")
        };
        assert!(t.check_parameter(&e, "Reset", "ResetType", "GracefulShutdown").is_ok());
        assert!(t.check_parameter(&e, "Reset", "ResetType", "ForceOff").is_err());
        assert_eq!(
            t.supported_values(&e, "Reset", "ResetType").unwrap(),
            vec!["On", "GracefulShutdown"]
        );
        assert_eq!(tc.calls_for(&Method::GET).len(), 1);
    }

    #[test]
    fn test_nothing_advertised() {
        let tc = Arc::new(TestClient::new());
        let e = entity(&tc);
        let t = ActionTarget::new("/a");
        assert!(t.check_parameter(&e, "Reset", "ResetType", "Anything").is_ok());
        assert!(matches!(
            t.action_info(&e, "Reset"),
            Err(RedfishError::ActionInfoMissing { .. })
        ));
        assert!(tc.calls().is_empty());
    }

    #[test]
    fn test_outcomes() {
        let tc = Arc::new(TestClient::new());
        tc.on(Method::POST, "/empty", Response::new(StatusCode::NO_CONTENT));
        tc.on(
            Method::POST,
            "/body",
            Response::new(StatusCode::OK).with_body(r#"{"CSRString": "abc"}"#),
        );
        tc.on(
            Method::POST,
            "/async",
            Response::new(StatusCode::ACCEPTED)
                .with_header("Location", "/redfish/v1/TaskService/Tasks/42")
                .with_body("not json at all"),
        );
        tc.on(
            Method::POST,
            "/bad",
            Response::new(StatusCode::BAD_REQUEST).with_body("bad parameter"),
        );
        let client: Client = tc.clone();
        let h = HeaderMap::new();

        assert!(matches!(
            post_action(&client, "/empty", &json!({}), &h).unwrap(),
            ActionOutcome::Completed(None)
        ));
        match post_action(&client, "/body", &json!({}), &h).unwrap() {
            ActionOutcome::Completed(Some(r)) => assert_eq!(r.text(), r#"{"CSRString": "abc"}"#),
            other => panic!("unexpected {other:?}"),
        }
        let pending = post_action(&client, "/async", &json!({}), &h).unwrap();
        assert_eq!(
            pending.task(),
            Some(&TaskMonitor::new("/redfish/v1/TaskService/Tasks/42"))
        );
        let err = post_action(&client, "/bad", &json!({}), &h).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_invoke_forwards_etag() {
        let tc = Arc::new(TestClient::new());
        tc.on(Method::POST, "/a", Response::new(StatusCode::NO_CONTENT));
        let mut e = entity(&tc);
        e.etag = Some("\"7\"".to_string());
        let t = ActionTarget::new("/a");
        assert_eq!(t.invoke(&e, "Reset", &json!({"ResetType": "On"})).unwrap(), None);
        let calls = tc.calls();
        assert_eq!(calls[0].body, Some(json!({"ResetType": "On"})));
        assert_eq!(calls[0].headers.get("If-Match").unwrap(), "\"7\"");
    }
}
