// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::debug;

use crate::constants::*;
use crate::utils::Redact;
use crate::{
    Credential, Error, HmacSignatory, NoopSignatory, NoopTransporter, RequestBuilder, Result,
    Signatory, Transporter,
};

/// Config carries all the options recognized by [`Client::new`].
#[derive(Clone, Default)]
pub struct Config {
    /// Transporter used to send requests.
    ///
    /// Supplying one skips the key check in [`Client::new`].
    pub transporter: Option<Arc<dyn Transporter>>,
    /// Signatory used to sign requests.
    ///
    /// Supplying one skips the key check in [`Client::new`].
    pub signatory: Option<Arc<dyn Signatory>>,
    /// Private key used to sign requests.
    pub private_key: Option<String>,
    /// Public key sent along with signed requests.
    pub public_key: Option<String>,
    /// Project (tenant) the client talks to.
    pub project: Option<String>,
    /// Api version, `v1` if not set.
    pub api_version: Option<String>,
    /// Host of the api, `<project>.stretchr.com` if not set.
    pub base_url: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set transporter
    pub fn with_transporter(mut self, transporter: impl Transporter) -> Self {
        self.transporter = Some(Arc::new(transporter));
        self
    }

    /// Set signatory
    pub fn with_signatory(mut self, signatory: impl Signatory) -> Self {
        self.signatory = Some(Arc::new(signatory));
        self
    }

    /// Set private_key
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Set public_key
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Set project
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set api_version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set base_url
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Returns true if a stand-in transporter or signatory is configured.
    fn has_override(&self) -> bool {
        self.transporter.is_some() || self.signatory.is_some()
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("transporter", &self.transporter)
            .field("signatory", &self.signatory)
            .field("private_key", &self.private_key.as_ref().map(Redact::from))
            .field("public_key", &self.public_key.as_ref().map(Redact::from))
            .field("project", &self.project)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Client holds the configuration shared by every request and hands out
/// fresh [`RequestBuilder`]s.
///
/// A client never changes after construction, clone it or share it freely.
///
/// ```
/// use stretchr_core::{Client, Config};
///
/// # fn main() -> stretchr_core::Result<()> {
/// let client = Client::new(
///     Config::new()
///         .with_project("project.company")
///         .with_public_key("test")
///         .with_private_key("ABC123-private"),
/// )?;
///
/// assert_eq!(
///     client.item("people", 1).collection("cars").to_url(),
///     "https://project.company.stretchr.com/api/v1/people/1/cars"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    api_version: String,
    project: Option<String>,
    credential: Option<Credential>,
    signatory: Arc<dyn Signatory>,
    transporter: Arc<dyn Transporter>,
}

impl Client {
    /// Build a client from config.
    ///
    /// `private_key`, `public_key` and `project` are all required unless a
    /// transporter or signatory is supplied, in which case missing keys are
    /// left to the signatory.
    pub fn new(cfg: Config) -> Result<Self> {
        let private_key = cfg.private_key.clone().filter(|v| !v.is_empty());
        let public_key = cfg.public_key.clone().filter(|v| !v.is_empty());
        let project = cfg.project.clone().filter(|v| !v.is_empty());

        if !cfg.has_override() {
            if private_key.is_none() {
                return Err(Error::missing_attribute("private_key"));
            }
            if public_key.is_none() {
                return Err(Error::missing_attribute("public_key"));
            }
            if project.is_none() {
                return Err(Error::missing_attribute("project"));
            }
        }

        let credential = match (public_key, private_key) {
            (Some(public_key), Some(private_key)) => Some(Credential::new(public_key, private_key)),
            _ => None,
        };

        let base_url = match (cfg.base_url.filter(|v| !v.is_empty()), &project) {
            (Some(base_url), _) => base_url,
            (None, Some(project)) => format!("{project}.{DEFAULT_DOMAIN}"),
            (None, None) => DEFAULT_DOMAIN.to_string(),
        };

        let api_version = cfg
            .api_version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let signatory = match (cfg.signatory, &credential) {
            (Some(signatory), _) => signatory,
            (None, Some(_)) => Arc::new(HmacSignatory::new()) as Arc<dyn Signatory>,
            (None, None) => Arc::new(NoopSignatory),
        };

        let transporter = cfg
            .transporter
            .unwrap_or_else(|| Arc::new(NoopTransporter) as Arc<dyn Transporter>);

        debug!("client for {base_url} api {api_version} built with signatory {signatory:?}");

        Ok(Self {
            base_url,
            api_version,
            project,
            credential,
            signatory,
            transporter,
        })
    }

    /// Return a client that sends through `transporter` instead.
    pub fn with_transporter(mut self, transporter: impl Transporter) -> Self {
        self.transporter = Arc::new(transporter);
        self
    }

    /// Host requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Api version used in every url.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Configured project.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Configured credential.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Configured signatory.
    pub fn signatory(&self) -> &Arc<dyn Signatory> {
        &self.signatory
    }

    /// Configured transporter.
    pub fn transporter(&self) -> &Arc<dyn Transporter> {
        &self.transporter
    }

    /// Start a new request at the api root.
    pub fn request(&self) -> RequestBuilder {
        let mut req = RequestBuilder::new(&self.base_url)
            .with_api_version(&self.api_version)
            .with_shared_signatory(self.signatory.clone())
            .with_shared_transporter(self.transporter.clone());
        if let Some(project) = &self.project {
            req = req.with_project(project);
        }
        if let Some(credential) = &self.credential {
            req = req.with_credential(credential.clone());
        }
        req
    }

    /// Start a new request descending into collection `name`.
    pub fn collection(&self, name: impl Into<String>) -> RequestBuilder {
        self.request().collection(name)
    }

    /// Start a new request selecting item `id` of collection `name`.
    pub fn item(&self, name: impl Into<String>, id: impl ToString) -> RequestBuilder {
        self.request().item(name, id)
    }

    /// Start a new request at `name`, optionally selecting item `id`.
    pub fn segment<I: ToString>(&self, name: impl Into<String>, id: Option<I>) -> RequestBuilder {
        self.request().segment(name, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, RecordingTransporter};
    use pretty_assertions::assert_eq;

    fn full_config() -> Config {
        Config::new()
            .with_private_key("ABC123-private")
            .with_public_key("test")
            .with_project("project.company")
    }

    #[test]
    fn test_new_with_missing_fields() {
        let cases = vec![
            (Config::new(), "private_key"),
            (
                Config::new()
                    .with_public_key("test")
                    .with_project("project.company"),
                "private_key",
            ),
            (
                Config::new()
                    .with_private_key("ABC123-private")
                    .with_project("project.company"),
                "public_key",
            ),
            (
                Config::new()
                    .with_private_key("ABC123-private")
                    .with_public_key("test"),
                "project",
            ),
            (full_config().with_project(""), "project"),
        ];

        for (cfg, attribute) in cases {
            let err = Client::new(cfg).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingAttribute);
            assert_eq!(err.context_value("attribute"), Some(attribute));
        }
    }

    #[test]
    fn test_new_defaults() -> Result<()> {
        let client = Client::new(full_config())?;

        assert_eq!(client.api_version(), "v1");
        assert_eq!(client.base_url(), "project.company.stretchr.com");
        assert_eq!(client.project(), Some("project.company"));
        assert_eq!(
            client.credential(),
            Some(&Credential::new("test", "ABC123-private"))
        );
        assert!(format!("{:?}", client.signatory()).contains("HmacSignatory"));
        assert!(format!("{:?}", client.transporter()).contains("NoopTransporter"));
        Ok(())
    }

    #[test]
    fn test_new_custom_transporter() -> Result<()> {
        let transporter = RecordingTransporter::new();
        let client = Client::new(full_config().with_transporter(transporter))?;
        assert!(format!("{:?}", client.transporter()).contains("RecordingTransporter"));
        Ok(())
    }

    #[test]
    fn test_new_custom_signatory() -> Result<()> {
        let client = Client::new(full_config().with_signatory(NoopSignatory))?;
        assert!(format!("{:?}", client.signatory()).contains("NoopSignatory"));
        Ok(())
    }

    #[test]
    fn test_override_skips_key_check() -> Result<()> {
        let client = Client::new(
            Config::new()
                .with_project("project")
                .with_api_version("v1.1")
                .with_transporter(RecordingTransporter::new()),
        )?;

        assert!(client.credential().is_none());
        assert!(format!("{:?}", client.signatory()).contains("NoopSignatory"));
        assert_eq!(
            client.item("people", 1).collection("cars").to_url(),
            "https://project.stretchr.com/api/v1.1/people/1/cars"
        );
        Ok(())
    }

    #[test]
    fn test_base_url_override() -> Result<()> {
        let client = Client::new(full_config().with_base_url("localhost:8080"))?;
        assert_eq!(
            client.collection("people").to_url(),
            "https://localhost:8080/api/v1/people"
        );
        Ok(())
    }

    #[test]
    fn test_fresh_builders() -> Result<()> {
        let client = Client::new(full_config())?;

        let a = client.collection("people").param("key", "asdf");
        let b = client.collection("books");
        assert_eq!(a.to_url(), "https://project.company.stretchr.com/api/v1/people?key=asdf");
        assert_eq!(b.to_url(), "https://project.company.stretchr.com/api/v1/books");
        Ok(())
    }

    #[test]
    fn test_client_and_builder_are_equivalent() -> Result<()> {
        let client = Client::new(full_config())?;
        let direct = RequestBuilder::new("project.company.stretchr.com");

        assert_eq!(
            client.item("people", 1).collection("cars").to_url(),
            direct.item("people", 1).collection("cars").to_url()
        );
        assert_eq!(
            client.segment("people", Some(1)).path(),
            client.item("people", 1).path()
        );
        Ok(())
    }

    #[test]
    fn test_config_debug_redacts_keys() {
        let debug = format!("{:?}", full_config());
        assert!(!debug.contains("ABC123-private"));
        assert!(debug.contains("ABC***ate"));
    }
}
