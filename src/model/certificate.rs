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
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{impl_entity, Entity, Link, LinkCollection, Resource, ResourceStatus};
use crate::{
    action::{ActionOutcome, ActionTarget},
    collection, decode,
    network::Client,
    task::TaskMonitor,
    RedfishError,
};

/// https://redfish.dmtf.org/schemas/v1/Certificate.v1_9_0.json
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Certificate {
    #[serde(flatten)]
    pub entity: Entity,
    pub certificate_string: Option<String>,
    pub certificate_type: Option<CertificateType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificate_usage_types: Vec<String>,
    pub fingerprint: Option<String>,
    pub fingerprint_hash_algorithm: Option<String>,
    pub issuer: Option<CertificateIdentifier>,
    pub subject: Option<CertificateIdentifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_usage: Vec<String>,
    /// Write only. Some services want it to unlock a PKCS12 upload.
    pub password: Option<String>,
    pub serial_number: Option<String>,
    pub signature_algorithm: Option<String>,
    pub status: Option<ResourceStatus>,
    pub uefi_signature_owner: Option<String>,
    pub valid_not_after: Option<String>,
    pub valid_not_before: Option<String>,

    #[serde(skip)]
    force_automatic_renew: ActionTarget,
    #[serde(skip)]
    rekey: ActionTarget,
    #[serde(skip)]
    renew: ActionTarget,
    #[serde(skip)]
    issuer_link: Link,
    #[serde(skip)]
    subjects: LinkCollection,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CertificateType {
    #[serde(rename = "PEM")]
    Pem,
    #[serde(rename = "PEMchain")]
    PemChain,
    #[serde(rename = "PKCS7")]
    Pkcs7,
    #[serde(rename = "PKCS12")]
    Pkcs12,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateIdentifier {
    pub common_name: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub display_string: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain_components: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateLinks {
    #[serde(default)]
    actions: CertificateActions,
    #[serde(default)]
    links: CertificateLinkSet,
}

#[derive(Debug, Default, Deserialize)]
struct CertificateActions {
    #[serde(rename = "#Certificate.ForceAutomaticRenew", default)]
    force_automatic_renew: ActionTarget,
    #[serde(rename = "#Certificate.Rekey", default)]
    rekey: ActionTarget,
    #[serde(rename = "#Certificate.Renew", default)]
    renew: ActionTarget,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CertificateLinkSet {
    #[serde(default)]
    issuer: Link,
    #[serde(default)]
    subjects: LinkCollection,
}

impl Resource for Certificate {
    const WRITABLE: &'static [&'static str] = &["Password"];

    type Links = CertificateLinks;

    impl_entity!();

    fn resolve_links(&mut self, links: CertificateLinks) {
        self.force_automatic_renew = links.actions.force_automatic_renew;
        self.rekey = links.actions.rekey;
        self.renew = links.actions.renew;
        self.issuer_link = links.links.issuer;
        self.subjects = links.links.subjects;
    }
}

/// Parameters of Certificate.Rekey. Unset fields are left to the service.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RekeyParameters {
    pub challenge_password: Option<String>,
    pub key_bit_length: Option<i64>,
    #[serde(rename = "KeyCurveId")]
    pub key_curve_id: Option<String>,
    pub key_pair_algorithm: Option<String>,
}

/// Body returned by Rekey and Renew: a CSR to be signed, and the certificate
/// it will replace.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CsrResponse {
    #[serde(rename = "CSRString", default)]
    pub csr_string: String,
    #[serde(rename = "Certificate", default)]
    pub certificate: Link,
}

impl CsrResponse {
    pub fn certificate(&self, client: &Client) -> Result<Option<Certificate>, RedfishError> {
        self.certificate
            .uri()
            .map(|uri| decode::get_object(client, uri))
            .transpose()
    }
}

impl Certificate {
    /// Certificate that issued this one.
    pub fn issuer_uri(&self) -> Option<&str> {
        self.issuer_link.uri()
    }

    pub fn subject_uris(&self) -> Vec<String> {
        self.subjects.uris()
    }

    pub fn issuer(&self) -> Result<Option<Certificate>, RedfishError> {
        self.issuer_uri()
            .map(|uri| decode::get_object(self.entity.client()?, uri))
            .transpose()
    }

    /// Certificates this one issued.
    pub fn subjects(&self) -> Result<Vec<Certificate>, RedfishError> {
        collection::get_objects(self.entity.client()?, &self.subject_uris())
    }

    pub fn valid_not_after_time(&self) -> Option<DateTime<Utc>> {
        parse_time(self.valid_not_after.as_deref())
    }

    pub fn valid_not_before_time(&self) -> Option<DateTime<Utc>> {
        parse_time(self.valid_not_before.as_deref())
    }

    pub fn supports_rekey(&self) -> bool {
        self.rekey.is_supported()
    }

    pub fn supports_renew(&self) -> bool {
        self.renew.is_supported()
    }

    /// Generates a new key pair and returns a CSR for it.
    pub fn rekey(
        &self,
        params: &RekeyParameters,
    ) -> Result<ActionOutcome<CsrResponse>, RedfishError> {
        self.rekey.invoke_for(&self.entity, "Rekey", params)
    }

    /// Returns a CSR for the existing key pair.
    pub fn renew(
        &self,
        challenge_password: Option<&str>,
    ) -> Result<ActionOutcome<CsrResponse>, RedfishError> {
        let mut body = serde_json::Map::new();
        if let Some(p) = challenge_password {
            body.insert("ChallengePassword".to_string(), p.into());
        }
        self.renew.invoke_for(&self.entity, "Renew", &body)
    }

    pub fn force_automatic_renew(&self) -> Result<Option<TaskMonitor>, RedfishError> {
        self.force_automatic_renew.invoke(
            &self.entity,
            "ForceAutomaticRenew",
            &serde_json::Map::new(),
        )
    }
}

fn parse_time(v: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(v?)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::TimeZone;
    use reqwest::{Method, StatusCode};

    use super::*;
    use crate::{decode::decode_bytes, network::Response, test_client::TestClient};

    const CERT: &str = include_str!("testdata/certificate.json");
    const URI: &str = "/redfish/v1/Managers/1/NetworkProtocol/HTTPS/Certificates/1";

    #[test]
    fn test_certificate_parser() {
        let cert: Certificate = decode_bytes(URI, CERT.as_bytes()).unwrap();
        assert_eq!(cert.entity.id, "1");
        assert_eq!(cert.entity.name, "HTTPS Certificate");
        assert_eq!(cert.certificate_type, Some(CertificateType::Pem));
        assert_eq!(
            cert.issuer.as_ref().unwrap().organization.as_deref(),
            Some("Contoso")
        );
        assert_eq!(cert.valid_not_after.as_deref(), Some("2019-09-07T13:22:05Z"));
        assert_eq!(
            cert.valid_not_after_time(),
            Some(Utc.with_ymd_and_hms(2019, 9, 7, 13, 22, 5).unwrap())
        );
        assert_eq!(cert.fingerprint_hash_algorithm.as_deref(), Some("TPM_ALG_SHA1"));
        assert_eq!(cert.key_usage, vec!["KeyEncipherment", "ServerAuthentication"]);
        assert_eq!(
            cert.issuer_uri(),
            Some("/redfish/v1/CertificateService/CertificateLocations/Root")
        );
        assert_eq!(
            cert.subject_uris(),
            vec!["/redfish/v1/Managers/1/NetworkProtocol/HTTPS/Certificates/2"]
        );
        assert!(cert.supports_rekey());
        assert!(cert.supports_renew());
    }

    #[test]
    fn test_rekey() {
        let tc = Arc::new(TestClient::new());
        tc.on_get(URI, CERT);
        tc.on(
            Method::POST,
            &format!("{URI}/Actions/Certificate.Rekey"),
            Response::new(StatusCode::OK).with_body(
                r#"{"CSRString": "-----BEGIN CERTIFICATE REQUEST-----", "Certificate": {"@odata.id": "/redfish/v1/Managers/1/NetworkProtocol/HTTPS/Certificates/1"}}"#,
            ),
        );
        let client: Client = tc.clone();
        let cert: Certificate = decode::get_object(&client, URI).unwrap();
        let params = RekeyParameters {
            key_bit_length: Some(4096),
            key_pair_algorithm: Some("TPM_ALG_RSA".to_string()),
            ..Default::default()
        };
        let ActionOutcome::Completed(Some(csr)) = cert.rekey(&params).unwrap() else {
            panic!("expected a CSR");
        };
        assert_eq!(csr.csr_string, "-----BEGIN CERTIFICATE REQUEST-----");
        assert_eq!(csr.certificate(&client).unwrap().unwrap().entity.id, "1");
        assert_eq!(
            tc.calls_for(&Method::POST)[0].body,
            Some(serde_json::json!({"KeyBitLength": 4096, "KeyPairAlgorithm": "TPM_ALG_RSA"}))
        );
    }

    #[test]
    fn test_force_automatic_renew_unsupported() {
        let tc = Arc::new(TestClient::new());
        tc.on_get(URI, CERT);
        let client: Client = tc;
        let cert: Certificate = decode::get_object(&client, URI).unwrap();
        assert!(matches!(
            cert.force_automatic_renew(),
            Err(RedfishError::UnsupportedAction { .. })
        ));
    }

    #[test]
    fn test_writable_round_trip() {
        crate::update::assert_writable_round_trip::<Certificate>(serde_json::json!({
            "@odata.id": URI,
            "Id": "1",
            "Password": "pkcs12-secret"
        }));
    }
}
