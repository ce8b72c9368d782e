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
//! Entry point for talking to a Redfish service: the service root, the top
//! level collections hanging off it, and session login/logout.

use tracing::{debug, info};

use crate::{
    collection, decode,
    model::{AccountService, ComputerSystem, Manager, Resource, ServiceRoot, Session},
    network::{Client, RedfishHttpClient, REDFISH_ENDPOINT},
    session::{self, AuthToken},
    RedfishError,
};

const DEFAULT_SESSIONS: &str = "/redfish/v1/SessionService/Sessions";

#[derive(Debug)]
pub struct Service {
    client: Client,
    root: ServiceRoot,
    token: Option<AuthToken>,
}

impl Service {
    /// Fetches the service root with `client`.
    pub fn connect(client: Client) -> Result<Service, RedfishError> {
        let root: ServiceRoot = decode::get_object(&client, REDFISH_ENDPOINT)?;
        debug!(
            "connected to {} (Redfish {})",
            root.vendor_string().unwrap_or_default(),
            root.redfish_version
        );
        Ok(Service {
            client,
            root,
            token: None,
        })
    }

    /// Opens a session with `user` and `password` and returns a service that
    /// authenticates every request with the session token.
    pub fn login(
        http: &RedfishHttpClient,
        user: &str,
        password: &str,
    ) -> Result<Service, RedfishError> {
        let anonymous: Client = http.without_auth();
        Self::login_with(&anonymous, user, password, |token| {
            let client: Client = http.with_session(&token.token);
            client
        })
    }

    /// Session login over any [`crate::HttpClient`]. `client` reads the
    /// service root and creates the session; `authenticated` turns the new
    /// token into the client used from then on.
    pub fn login_with<F>(
        client: &Client,
        user: &str,
        password: &str,
        authenticated: F,
    ) -> Result<Service, RedfishError>
    where
        F: FnOnce(&AuthToken) -> Client,
    {
        let root: ServiceRoot = decode::get_object(client, REDFISH_ENDPOINT)?;
        let sessions = root
            .sessions_uri()
            .unwrap_or_else(|| DEFAULT_SESSIONS.to_string());
        let token = session::create_session(client, &sessions, user, password)?;
        info!("logged in as {user}, session {}", token.session_uri);
        let mut service = Service::connect(authenticated(&token))?;
        service.token = Some(token);
        Ok(service)
    }

    /// Deletes the session this service logged in with, if any.
    pub fn logout(&mut self) -> Result<(), RedfishError> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };
        session::delete_session(&self.client, &token.session_uri)?;
        info!("logged out {}", token.username);
        Ok(())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn root(&self) -> &ServiceRoot {
        &self.root
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Any resource by URI.
    pub fn get<T: Resource>(&self, uri: &str) -> Result<T, RedfishError> {
        decode::get_object(&self.client, uri)
    }

    pub fn account_service(&self) -> Result<AccountService, RedfishError> {
        let uri = self.required(self.root.account_service_uri(), "AccountService")?;
        self.get(uri)
    }

    pub fn managers(&self) -> Result<Vec<Manager>, RedfishError> {
        collection::get_collection_objects(&self.client, self.root.managers_uri().unwrap_or_default())
    }

    pub fn systems(&self) -> Result<Vec<ComputerSystem>, RedfishError> {
        collection::get_collection_objects(&self.client, self.root.systems_uri().unwrap_or_default())
    }

    pub fn sessions(&self) -> Result<Vec<Session>, RedfishError> {
        collection::get_collection_objects(
            &self.client,
            &self.root.sessions_uri().unwrap_or_default(),
        )
    }

    fn required<'a>(&self, uri: Option<&'a str>, key: &str) -> Result<&'a str, RedfishError> {
        uri.ok_or_else(|| RedfishError::MissingKey {
            key: key.to_string(),
            url: self.root.entity.odata_id.clone(),
        })
    }
}
