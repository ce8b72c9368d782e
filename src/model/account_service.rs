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
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{impl_entity, Entity, Link, Resource, ResourceStatus};
use crate::{action::ActionTarget, collection, task::TaskMonitor, update, RedfishError};

/// https://redfish.dmtf.org/schemas/v1/AccountService.v1_15_0.json
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountService {
    #[serde(flatten)]
    pub entity: Entity,
    pub account_lockout_counter_reset_after: Option<i64>,
    pub account_lockout_counter_reset_enabled: Option<bool>,
    pub account_lockout_duration: Option<i64>,
    pub account_lockout_threshold: Option<i64>,
    pub auth_failure_logging_threshold: Option<i64>,
    pub enforce_password_history_count: Option<i64>,
    #[serde(rename = "HTTPBasicAuth")]
    pub http_basic_auth: Option<BasicAuthState>,
    pub local_account_auth: Option<LocalAccountAuth>,
    pub max_password_length: Option<i64>,
    pub min_password_length: Option<i64>,
    pub password_expiration_days: Option<i64>,
    pub require_change_password_action: Option<bool>,
    pub service_enabled: Option<bool>,
    pub status: Option<ResourceStatus>,
    #[serde(default, skip_serializing)]
    pub supported_account_types: Vec<String>,

    #[serde(skip)]
    accounts: Link,
    #[serde(skip)]
    roles: Link,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum BasicAuthState {
    Enabled,
    Unadvertised,
    Disabled,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LocalAccountAuth {
    Enabled,
    Disabled,
    Fallback,
    LocalFirst,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountServiceLinks {
    #[serde(default)]
    accounts: Link,
    #[serde(default)]
    roles: Link,
}

impl Resource for AccountService {
    const WRITABLE: &'static [&'static str] = &[
        "AccountLockoutCounterResetAfter",
        "AccountLockoutCounterResetEnabled",
        "AccountLockoutDuration",
        "AccountLockoutThreshold",
        "AuthFailureLoggingThreshold",
        "EnforcePasswordHistoryCount",
        "HTTPBasicAuth",
        "LocalAccountAuth",
        "MaxPasswordLength",
        "MinPasswordLength",
        "PasswordExpirationDays",
        "RequireChangePasswordAction",
        "ServiceEnabled",
    ];

    type Links = AccountServiceLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: AccountServiceLinks) {
        self.accounts = links.accounts;
        self.roles = links.roles;
    }
}

impl AccountService {
    pub fn accounts_uri(&self) -> Option<&str> {
        self.accounts.uri()
    }

    pub fn roles_uri(&self) -> Option<&str> {
        self.roles.uri()
    }

    pub fn accounts(&self) -> Result<Vec<ManagerAccount>, RedfishError> {
        collection::get_collection_objects(self.entity.client()?, self.accounts.as_str())
    }

    pub fn account_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<ManagerAccount>, RedfishError> {
        Ok(self
            .accounts()?
            .into_iter()
            .find(|a| a.user_name.as_deref() == Some(user_name)))
    }

    /// Creates an enabled account. When ETag matching is on, the collection's
    /// ETag is sent as `If-Match`.
    pub fn create_account(
        &self,
        user_name: &str,
        password: &str,
        role_id: &str,
    ) -> Result<ManagerAccount, RedfishError> {
        let Some(uri) = self.accounts.uri() else {
            return Err(RedfishError::MissingKey {
                key: "Accounts".to_string(),
                url: self.entity.odata_id.clone(),
            });
        };
        let payload = json!({
            "UserName": user_name,
            "Password": password,
            "RoleId": role_id,
            "Enabled": true,
        });
        collection::create_member(
            self.entity.client()?,
            uri,
            &payload,
            self.entity.is_etag_match_disabled(),
        )
    }

    /// Sets a new password on the account named `user_name` with a PATCH.
    pub fn change_password(&self, user_name: &str, new_password: &str) -> Result<(), RedfishError> {
        let Some(mut account) = self.account_by_user_name(user_name)? else {
            return Err(RedfishError::MissingKey {
                key: user_name.to_string(),
                url: self.accounts.to_string(),
            });
        };
        account.password = Some(new_password.to_string());
        account.update().map(|_| ())
    }
}

/// https://redfish.dmtf.org/schemas/v1/ManagerAccount.v1_12_0.json
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerAccount {
    #[serde(flatten)]
    pub entity: Entity,
    pub account_expiration: Option<String>,
    pub account_types: Option<Vec<String>>,
    pub email_address: Option<String>,
    pub enabled: Option<bool>,
    pub locked: Option<bool>,
    #[serde(rename = "OEMAccountTypes")]
    pub oem_account_types: Option<Vec<String>>,
    pub one_time_passcode_delivery_address: Option<String>,
    /// Always null when read.
    pub password: Option<String>,
    pub password_change_required: Option<bool>,
    pub password_expiration: Option<String>,
    pub phone_number: Option<String>,
    pub role_id: Option<String>,
    pub user_name: Option<String>,

    #[serde(skip)]
    change_password: ActionTarget,
    #[serde(skip)]
    role: Link,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerAccountLinks {
    #[serde(default)]
    actions: ManagerAccountActions,
    #[serde(default)]
    links: ManagerAccountLinkSet,
}

#[derive(Debug, Default, Deserialize)]
struct ManagerAccountActions {
    #[serde(rename = "#ManagerAccount.ChangePassword", default)]
    change_password: ActionTarget,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ManagerAccountLinkSet {
    #[serde(default)]
    role: Link,
}

impl Resource for ManagerAccount {
    const WRITABLE: &'static [&'static str] = &[
        "AccountExpiration",
        "AccountTypes",
        "EmailAddress",
        "Enabled",
        "Locked",
        "OEMAccountTypes",
        "OneTimePasscodeDeliveryAddress",
        "Password",
        "PasswordChangeRequired",
        "PasswordExpiration",
        "PhoneNumber",
        "RoleId",
        "UserName",
    ];

    type Links = ManagerAccountLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: ManagerAccountLinks) {
        self.change_password = links.actions.change_password;
        self.role = links.links.role;
    }
}

impl ManagerAccount {
    pub fn role_uri(&self) -> Option<&str> {
        self.role.uri()
    }

    pub fn supports_change_password(&self) -> bool {
        self.change_password.is_supported()
    }

    /// ManagerAccount.ChangePassword. `session_password` is the password of
    /// the account the current session belongs to.
    pub fn change_password(
        &self,
        new_password: &str,
        session_password: &str,
    ) -> Result<Option<TaskMonitor>, RedfishError> {
        self.change_password.invoke(
            &self.entity,
            "ChangePassword",
            &json!({
                "NewPassword": new_password,
                "SessionAccountPassword": session_password,
            }),
        )
    }

    pub fn delete(&self) -> Result<(), RedfishError> {
        update::delete_resource(self)
    }
}

impl Ord for ManagerAccount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.entity.id.cmp(&other.entity.id)
    }
}

impl PartialOrd for ManagerAccount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ManagerAccount {
    fn eq(&self, other: &ManagerAccount) -> bool {
        self.entity.id == other.entity.id
    }
}

impl Eq for ManagerAccount {}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use reqwest::{header::IF_MATCH, Method, StatusCode};

    use super::*;
    use crate::{decode, network::Response, test_client::TestClient, update, Client};

    const SERVICE: &str = include_str!("testdata/account_service.json");
    const ACCOUNT: &str = include_str!("testdata/manager_account.json");
    const SERVICE_URI: &str = "/redfish/v1/AccountService";
    const ACCOUNTS: &str = "/redfish/v1/AccountService/Accounts";
    const ACCOUNT_URI: &str = "/redfish/v1/AccountService/Accounts/2";

    fn fetch(tc: &Arc<TestClient>) -> AccountService {
        tc.on_get(SERVICE_URI, SERVICE);
        let client: Client = tc.clone();
        decode::get_object(&client, SERVICE_URI).unwrap()
    }

    fn accounts_collection() -> String {
        json!({
            "@odata.id": ACCOUNTS,
            "@odata.etag": "\"accounts-7\"",
            "Members": [{"@odata.id": ACCOUNT_URI}],
            "Members@odata.count": 1
        })
        .to_string()
    }

    #[test]
    fn test_account_service_parser() {
        let tc = Arc::new(TestClient::new());
        let svc = fetch(&tc);
        assert_eq!(svc.accounts_uri(), Some(ACCOUNTS));
        assert_eq!(svc.roles_uri(), Some("/redfish/v1/AccountService/Roles"));
        assert_eq!(svc.http_basic_auth, Some(BasicAuthState::Enabled));
        assert_eq!(svc.min_password_length, Some(8));
    }

    #[test]
    fn test_account_parser() {
        let account: ManagerAccount = decode::decode_bytes(ACCOUNT_URI, ACCOUNT.as_bytes()).unwrap();
        assert_eq!(account.user_name.as_deref(), Some("operator"));
        assert_eq!(account.role_id.as_deref(), Some("Operator"));
        assert_eq!(account.role_uri(), Some("/redfish/v1/AccountService/Roles/Operator"));
        assert!(account.password.is_none());
        assert!(account.supports_change_password());
    }

    // The collection ETag guards the POST, the new account comes back in the body.
    #[test]
    fn test_create_account() {
        let tc = Arc::new(TestClient::new());
        let svc = fetch(&tc);
        tc.on_get(ACCOUNTS, &accounts_collection());
        tc.on(
            Method::POST,
            ACCOUNTS,
            Response::new(StatusCode::CREATED)
                .with_header("Location", "https://10.0.0.1/redfish/v1/AccountService/Accounts/2")
                .with_body(ACCOUNT),
        );
        let account = svc.create_account("operator", "hunter2hunter2", "Operator").unwrap();
        assert_eq!(account.entity.id, "2");

        let post = &tc.calls_for(&Method::POST)[0];
        assert_eq!(post.headers.get(IF_MATCH).unwrap(), "\"accounts-7\"");
        assert_eq!(
            post.body,
            Some(json!({
                "UserName": "operator",
                "Password": "hunter2hunter2",
                "RoleId": "Operator",
                "Enabled": true
            }))
        );
    }

    // Without a body the account is fetched from Location, and with ETag
    // matching disabled the collection is never read.
    #[test]
    fn test_create_account_from_location() {
        let tc = Arc::new(TestClient::new().with_etag_match_disabled());
        let svc = fetch(&tc);
        tc.on(
            Method::POST,
            ACCOUNTS,
            Response::new(StatusCode::CREATED)
                .with_header("Location", "https://10.0.0.1/redfish/v1/AccountService/Accounts/2"),
        );
        tc.on_get(ACCOUNT_URI, ACCOUNT);
        let account = svc.create_account("operator", "hunter2hunter2", "Operator").unwrap();
        assert_eq!(account.user_name.as_deref(), Some("operator"));

        let gets: Vec<String> = tc
            .calls_for(&Method::GET)
            .into_iter()
            .map(|c| c.uri)
            .collect();
        assert_eq!(gets, vec![SERVICE_URI, ACCOUNT_URI]);
        assert!(tc.calls_for(&Method::POST)[0].headers.get(IF_MATCH).is_none());
    }

    #[test]
    fn test_create_account_no_content() {
        let tc = Arc::new(TestClient::new().with_etag_match_disabled());
        let svc = fetch(&tc);
        tc.on(Method::POST, ACCOUNTS, Response::new(StatusCode::NO_CONTENT));
        assert!(matches!(
            svc.create_account("a", "b", "Operator"),
            Err(RedfishError::NoContent { .. })
        ));
    }

    #[test]
    fn test_change_password_patch() {
        let tc = Arc::new(TestClient::new());
        let svc = fetch(&tc);
        tc.on_get(ACCOUNTS, &accounts_collection());
        tc.on_get(ACCOUNT_URI, ACCOUNT);
        tc.on(Method::PATCH, ACCOUNT_URI, Response::new(StatusCode::NO_CONTENT));
        svc.change_password("operator", "correct horse").unwrap();

        let patch = &tc.calls_for(&Method::PATCH)[0];
        assert_eq!(patch.body, Some(json!({"Password": "correct horse"})));
        assert_eq!(patch.headers.get(IF_MATCH).unwrap(), "W/\"acct-2\"");

        assert!(matches!(
            svc.change_password("nobody", "x"),
            Err(RedfishError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_change_password_action() {
        let tc = Arc::new(TestClient::new());
        tc.on_get(ACCOUNT_URI, ACCOUNT);
        tc.on(
            Method::POST,
            "/redfish/v1/AccountService/Accounts/2/Actions/ManagerAccount.ChangePassword",
            Response::new(StatusCode::NO_CONTENT),
        );
        let client: Client = tc.clone();
        let account: ManagerAccount = decode::get_object(&client, ACCOUNT_URI).unwrap();
        assert!(account.change_password("new-pass", "admin-pass").unwrap().is_none());
        assert_eq!(
            tc.calls_for(&Method::POST)[0].body,
            Some(json!({"NewPassword": "new-pass", "SessionAccountPassword": "admin-pass"}))
        );
    }

    #[test]
    fn test_delete_account() {
        let tc = Arc::new(TestClient::new());
        tc.on_get(ACCOUNT_URI, ACCOUNT);
        tc.on(Method::DELETE, ACCOUNT_URI, Response::new(StatusCode::NO_CONTENT));
        let client: Client = tc.clone();
        let account: ManagerAccount = decode::get_object(&client, ACCOUNT_URI).unwrap();
        account.delete().unwrap();
        assert_eq!(
            tc.calls_for(&Method::DELETE)[0].headers.get(IF_MATCH).unwrap(),
            "W/\"acct-2\""
        );
    }

    // An empty list is a value, so absent -> [] is a write.
    #[test]
    fn test_empty_account_types_written() {
        let body = ACCOUNT.replace(r#""AccountTypes": ["Redfish"],"#, "");
        let mut account: ManagerAccount = decode::decode_bytes(ACCOUNT_URI, body.as_bytes()).unwrap();
        assert_eq!(account.account_types, None);
        assert!(update::patch_body(&account).unwrap().is_empty());

        account.account_types = Some(vec![]);
        account.oem_account_types = Some(vec![]);
        assert_eq!(
            serde_json::Value::Object(update::patch_body(&account).unwrap()),
            json!({"AccountTypes": [], "OEMAccountTypes": []})
        );

        let account: ManagerAccount = decode::decode_bytes(ACCOUNT_URI, ACCOUNT.as_bytes()).unwrap();
        assert_eq!(account.account_types, Some(vec!["Redfish".to_string()]));
        assert_eq!(account.oem_account_types, None);
    }

    #[test]
    fn test_account_service_writable_round_trip() {
        update::assert_writable_round_trip::<AccountService>(json!({
            "@odata.id": SERVICE_URI,
            "Id": "AccountService",
            "AccountLockoutCounterResetAfter": 30,
            "AccountLockoutCounterResetEnabled": false,
            "AccountLockoutDuration": 600,
            "AccountLockoutThreshold": 3,
            "AuthFailureLoggingThreshold": 2,
            "EnforcePasswordHistoryCount": 4,
            "HTTPBasicAuth": "Unadvertised",
            "LocalAccountAuth": "Fallback",
            "MaxPasswordLength": 32,
            "MinPasswordLength": 12,
            "PasswordExpirationDays": 90,
            "RequireChangePasswordAction": true,
            "ServiceEnabled": false
        }));
    }

    #[test]
    fn test_account_writable_round_trip() {
        update::assert_writable_round_trip::<ManagerAccount>(json!({
            "@odata.id": ACCOUNT_URI,
            "Id": "2",
            "AccountExpiration": "2027-01-01T00:00:00Z",
            "AccountTypes": ["Redfish", "SNMP"],
            "EmailAddress": "ops@example.com",
            "Enabled": true,
            "Locked": false,
            "OEMAccountTypes": ["Contoso"],
            "OneTimePasscodeDeliveryAddress": "ops@example.com",
            "Password": "hunter2hunter2",
            "PasswordChangeRequired": true,
            "PasswordExpiration": "2026-12-01T00:00:00Z",
            "PhoneNumber": "+1 555 0100",
            "RoleId": "ReadOnly",
            "UserName": "ops"
        }));
    }

    // Every writable property of the service goes out in one PATCH, read only
    // ones stay behind.
    #[test]
    fn test_update_account_service() {
        let tc = Arc::new(TestClient::new());
        let mut svc = fetch(&tc);
        tc.on(Method::PATCH, SERVICE_URI, Response::new(StatusCode::NO_CONTENT));

        svc.account_lockout_counter_reset_after = Some(120);
        svc.account_lockout_counter_reset_enabled = Some(false);
        svc.account_lockout_duration = Some(300);
        svc.account_lockout_threshold = Some(10);
        svc.auth_failure_logging_threshold = Some(5);
        svc.enforce_password_history_count = Some(3);
        svc.http_basic_auth = Some(BasicAuthState::Disabled);
        svc.local_account_auth = Some(LocalAccountAuth::LocalFirst);
        svc.max_password_length = Some(64);
        svc.min_password_length = Some(10);
        svc.password_expiration_days = Some(180);
        svc.require_change_password_action = Some(true);
        svc.service_enabled = Some(false);
        svc.supported_account_types = vec!["Redfish".to_string()];
        svc.entity.description = Some("changed locally".to_string());
        assert!(matches!(svc.update().unwrap(), update::UpdateOutcome::Applied));

        let patch = &tc.calls_for(&Method::PATCH)[0];
        assert_eq!(patch.headers.get(IF_MATCH).unwrap(), "\"svc-11\"");
        assert_eq!(
            patch.body,
            Some(json!({
                "AccountLockoutCounterResetAfter": 120,
                "AccountLockoutCounterResetEnabled": false,
                "AccountLockoutDuration": 300,
                "AccountLockoutThreshold": 10,
                "AuthFailureLoggingThreshold": 5,
                "EnforcePasswordHistoryCount": 3,
                "HTTPBasicAuth": "Disabled",
                "LocalAccountAuth": "LocalFirst",
                "MaxPasswordLength": 64,
                "MinPasswordLength": 10,
                "PasswordExpirationDays": 180,
                "RequireChangePasswordAction": true,
                "ServiceEnabled": false
            }))
        );
        assert!(matches!(svc.update().unwrap(), update::UpdateOutcome::Unchanged));
    }

    #[test]
    fn test_account_ordering() {
        let mut a: ManagerAccount = decode::decode_bytes(ACCOUNT_URI, ACCOUNT.as_bytes()).unwrap();
        let mut b = a.clone();
        a.entity.id = "10".to_string();
        b.entity.id = "1".to_string();
        let mut v = vec![a, b];
        v.sort();
        assert_eq!(v[0].entity.id, "1");
    }
}
