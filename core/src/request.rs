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

use std::fmt::Write;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use http::Uri;
use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::*;
use crate::{
    Credential, Error, NoopSignatory, NoopTransporter, OrderedBag, ParamValue, Result, Signatory,
    TransportRequest, Transporter,
};

/// RequestBuilder collects a resource path, query parameters and filters,
/// then hands the assembled request to a [`Transporter`].
///
/// Paths are described by chaining [`collection`](Self::collection) and
/// [`item`](Self::item):
///
/// ```
/// use stretchr_core::RequestBuilder;
///
/// let req = RequestBuilder::new("project.stretchr.com")
///     .item("people", 1)
///     .collection("cars")
///     .filter("age", [">21", "<40"])
///     .limit(10);
///
/// assert_eq!(req.path(), "people/1/cars");
/// assert_eq!(
///     req.to_url(),
///     "https://project.stretchr.com/api/v1/people/1/cars?~limit=10&:age=%3E21&:age=%3C40"
/// );
/// ```
///
/// A builder describes exactly one request: every verb consumes it.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    api_version: String,
    project: Option<String>,
    credential: Option<Credential>,
    signatory: Arc<dyn Signatory>,
    transporter: Arc<dyn Transporter>,

    segments: Vec<String>,
    params: OrderedBag,
    filters: OrderedBag,
    limit: Option<u64>,
    page: Option<u64>,
}

impl RequestBuilder {
    /// Create a builder for the given host.
    ///
    /// The builder starts with the default api version, no credential, a
    /// [`NoopSignatory`] and a [`NoopTransporter`].
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            project: None,
            credential: None,
            signatory: Arc::new(NoopSignatory),
            transporter: Arc::new(NoopTransporter),

            segments: Vec::new(),
            params: OrderedBag::new(),
            filters: OrderedBag::with_prefix(FILTER_PREFIX),
            limit: None,
            page: None,
        }
    }

    /// Set the api version, an empty version keeps the current one.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        let api_version = api_version.into();
        if !api_version.is_empty() {
            self.api_version = api_version;
        }
        self
    }

    /// Set the project forwarded to the transporter.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the credential handed to the signatory.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Replace the signatory.
    pub fn with_signatory(self, signatory: impl Signatory) -> Self {
        self.with_shared_signatory(Arc::new(signatory))
    }

    /// Replace the transporter.
    pub fn with_transporter(self, transporter: impl Transporter) -> Self {
        self.with_shared_transporter(Arc::new(transporter))
    }

    pub(crate) fn with_shared_signatory(mut self, signatory: Arc<dyn Signatory>) -> Self {
        self.signatory = signatory;
        self
    }

    pub(crate) fn with_shared_transporter(mut self, transporter: Arc<dyn Transporter>) -> Self {
        self.transporter = transporter;
        self
    }

    /// Descend into collection `name`, optionally selecting item `id` in it.
    pub fn segment<I: ToString>(mut self, name: impl Into<String>, id: Option<I>) -> Self {
        self.segments.push(name.into());
        if let Some(id) = id {
            self.segments.push(id.to_string());
        }
        self
    }

    /// Descend into collection `name`.
    pub fn collection(self, name: impl Into<String>) -> Self {
        self.segment(name, None::<String>)
    }

    /// Descend into collection `name` and select item `id` in it.
    pub fn item(self, name: impl Into<String>, id: impl ToString) -> Self {
        self.segment(name, Some(id))
    }

    /// Add a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.set(key, value);
        self
    }

    /// Add a query parameter from a JSON value.
    ///
    /// Objects, nulls and nested lists fail with `InvalidParameterValue`.
    pub fn param_json(self, key: impl Into<String>, value: serde_json::Value) -> Result<Self> {
        let key = key.into();
        let value = ParamValue::try_from(value)
            .map_err(|e| e.with_context("method", "param").with_context("key", &key))?;
        Ok(self.param(key, value))
    }

    /// Add a filter, rendered as `:key=value`.
    ///
    /// A list adds several constraints on the same field, e.g.
    /// `filter("age", [">21", "<40"])`.
    #[doc(alias = "where")]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.filters.set(key, value);
        self
    }

    /// Same as [`filter`](Self::filter).
    pub fn r#where(self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.filter(key, value)
    }

    /// Add a filter from a JSON value.
    ///
    /// Objects, nulls and nested lists fail with `InvalidParameterValue`.
    #[doc(alias = "where_json")]
    pub fn filter_json(self, key: impl Into<String>, value: serde_json::Value) -> Result<Self> {
        let key = key.into();
        let value = ParamValue::try_from(value)
            .map_err(|e| e.with_context("method", "where").with_context("key", &key))?;
        Ok(self.filter(key, value))
    }

    /// Limit the number of returned items.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self.params.set(PARAM_LIMIT, n);
        self.sync_page();
        self
    }

    /// Skip the first `n` items.
    ///
    /// Overrides any skip derived from [`page`](Self::page).
    pub fn skip(mut self, n: u64) -> Self {
        self.page = None;
        self.params.set(PARAM_SKIP, n);
        self
    }

    /// Select a 1-based page of `limit` items.
    ///
    /// The skip is derived as `limit * (page - 1)` as soon as a limit is
    /// known, so `limit` may come before or after `page`.
    pub fn page(mut self, n: u64) -> Self {
        self.page = Some(n);
        self.sync_page();
        self
    }

    /// Order the result by a comma separated list of fields, `-` for descending.
    pub fn order(mut self, fields: impl Into<String>) -> Self {
        self.params.set(PARAM_ORDER, fields.into());
        self
    }

    fn sync_page(&mut self) {
        if let (Some(limit), Some(page)) = (self.limit, self.page) {
            self.params
                .set(PARAM_SKIP, limit.saturating_mul(page.saturating_sub(1)));
        }
    }

    /// Plain query parameters.
    pub fn params(&self) -> &OrderedBag {
        &self.params
    }

    /// Filter parameters.
    pub fn filters(&self) -> &OrderedBag {
        &self.filters
    }

    /// Get the api version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Path segments joined by `/`, without leading or trailing separator.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Build the query string, `None` if there are neither params nor filters.
    pub fn query(&self) -> Option<String> {
        let parts: Vec<String> = [self.params.render(), self.filters.render()]
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("&"))
        }
    }

    /// Build the full url: `https://<host>/api/<version>/<path>[?<query>]`.
    pub fn to_url(&self) -> String {
        let mut s = format!("https://{}/api/{}/", self.base_url, self.api_version);
        for (idx, seg) in self.segments.iter().enumerate() {
            if idx != 0 {
                s.push('/');
            }
            // Writing into a String never fails.
            let _ = write!(s, "{}", utf8_percent_encode(seg, &URI_ENCODE_SET));
        }

        if let Some(query) = self.query() {
            s.push('?');
            s.push_str(&query);
        }

        s
    }

    /// Build the full url as [`Uri`].
    pub fn to_uri(&self) -> Result<Uri> {
        let url = self.to_url();
        url.parse::<Uri>().map_err(|e| {
            Error::request_invalid("assembled url is not a valid uri")
                .with_context("uri", &url)
                .with_source(e)
        })
    }

    /// Fetch the resource with `GET`.
    pub async fn get(self) -> Result<http::Response<Bytes>> {
        self.send(Method::GET, None).await
    }

    /// Create a resource with `POST`.
    pub async fn create(self, body: serde_json::Value) -> Result<http::Response<Bytes>> {
        self.send(Method::POST, Some(body)).await
    }

    /// Replace a resource with `PUT`.
    pub async fn replace(self, body: serde_json::Value) -> Result<http::Response<Bytes>> {
        self.send(Method::PUT, Some(body)).await
    }

    /// Update the given fields of a resource with `PATCH`, other fields are kept.
    pub async fn update(self, body: serde_json::Value) -> Result<http::Response<Bytes>> {
        self.send(Method::PATCH, Some(body)).await
    }

    /// Remove a resource or a whole collection with `DELETE`.
    pub async fn remove(self) -> Result<http::Response<Bytes>> {
        self.send(Method::DELETE, None).await
    }

    /// Sign the request and pass it to the transporter.
    ///
    /// Signing failures stop here, the transporter is never called.
    async fn send(
        self,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> Result<http::Response<Bytes>> {
        let uri = self.to_uri()?;

        let payload = body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| {
                Error::request_invalid("failed to encode request body")
                    .with_context("method", &method)
                    .with_context("uri", &uri)
                    .with_source(e)
            })?;

        let signing = self
            .signatory
            .sign(&method, &uri, payload.as_deref(), self.credential.as_ref())
            .map_err(|e| {
                if e.context_value("uri").is_some() {
                    e
                } else {
                    e.with_context("method", &method).with_context("uri", &uri)
                }
            })?;

        debug!("sending request: {} {}", method, signing.uri);

        self.transporter
            .make_request(TransportRequest {
                method,
                uri,
                body,
                signing: Some(signing),
                project: self.project,
            })
            .await
    }
}
