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
//! Client side engine for DMTF Redfish services.
//!
//! Resources are fetched over an [`HttpClient`] and decoded in two passes:
//! once into their public shape, once into a sidecar holding their links and
//! actions. A decoded resource remembers the client it came from, the body it
//! was decoded from and its ETag, which is all [`update::update_resource`]
//! needs to PATCH back only the writable properties that changed.
//!
//! ```no_run
//! use redfish_engine::{Endpoint, RedfishClientPool, Resource, Service};
//!
//! # fn main() -> Result<(), redfish_engine::RedfishError> {
//! let pool = RedfishClientPool::builder().build()?;
//! let http = pool.create_client(Endpoint {
//!     host: "10.0.0.10".to_string(),
//!     ..Default::default()
//! });
//! let mut service = Service::login(&http, "admin", "password")?;
//! for mut system in service.systems()? {
//!     if let Some(boot) = system.boot.as_mut() {
//!         boot.set_override(
//!             redfish_engine::model::boot::BootSourceOverrideTarget::Pxe,
//!             redfish_engine::model::boot::BootSourceOverrideEnabled::Once,
//!         );
//!     }
//!     system.update()?;
//! }
//! service.logout()?;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod collection;
pub mod decode;
mod error;
pub mod jsonmap;
pub mod model;
mod network;
pub mod service;
pub mod session;
pub mod task;
pub mod test_client;
pub mod update;

pub use action::{ActionOutcome, ActionTarget};
pub use collection::{
    get_collection, get_collection_objects, get_collection_objects_partial, get_objects,
};
pub use decode::get_object;
pub use error::{CollectionError, RedfishError, RetryAfterError, ServiceError};
pub use model::{Entity, Link, LinkCollection, Resource};
pub use network::{
    Client, Endpoint, HttpClient, RedfishClientPool, RedfishClientPoolBuilder, RedfishHttpClient,
    Response, REDFISH_ENDPOINT, X_AUTH_TOKEN,
};
pub use service::Service;
pub use session::AuthToken;
pub use task::{parse_retry_after, TaskMonitor, TaskPoll};
pub use update::UpdateOutcome;
