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
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;
use percent_encoding::utf8_percent_encode;

use crate::constants::URI_ENCODE_SET;
use crate::{Error, Result};

/// SigningResult is the material a [`Signatory`](crate::Signatory) hands to the transporter.
#[derive(Debug, Clone)]
pub struct SigningResult {
    /// The uri to send, which may carry extra signing query parameters.
    pub uri: Uri,
    /// Extra headers to attach to the request.
    pub headers: HeaderMap,
}

impl SigningResult {
    /// Build a result that leaves the request untouched.
    pub fn unsigned(uri: &Uri) -> Self {
        Self {
            uri: uri.clone(),
            headers: HeaderMap::new(),
        }
    }
}

/// SigningMethod is the method that used in signing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with header.
    Header,
    /// Signing with query.
    Query,
}

/// Signing context for request.
///
/// Built from a copy of the request uri, the caller's uri is never touched.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters, still percent encoded.
    ///
    /// The value is `None` for a bare key without `=`.
    pub query: Vec<(String, Option<String>)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from method and uri.
    pub fn build(method: &Method, uri: &Uri) -> Result<Self> {
        let parts = uri.clone().into_parts();
        let paq = parts
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: method.clone(),
            scheme: parts.scheme.unwrap_or(Scheme::HTTPS),
            authority: parts.authority.ok_or_else(|| {
                Error::signing_failed("request without authority is invalid for signing")
                    .with_context("uri", uri)
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    v.split('&')
                        .filter(|pair| !pair.is_empty())
                        .map(|pair| match pair.split_once('=') {
                            Some((k, v)) => (k.to_string(), Some(v.to_string())),
                            None => (pair.to_string(), None),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            headers: HeaderMap::new(),
        })
    }

    /// Convert the signing context into the material for the transporter.
    pub fn into_result(self) -> Result<SigningResult> {
        let query_size = self.query_size();

        let paq = if query_size == 0 {
            self.path
        } else {
            let mut s = self.path;
            s.reserve(query_size + 1);

            s.push('?');
            for (i, (k, v)) in self.query.iter().enumerate() {
                if i > 0 {
                    s.push('&');
                }

                s.push_str(k);
                if let Some(v) = v {
                    s.push('=');
                    s.push_str(v);
                }
            }

            s
        };

        let uri = Uri::builder()
            .scheme(self.scheme)
            .authority(self.authority)
            .path_and_query(PathAndQuery::from_str(&paq)?)
            .build()?;

        Ok(SigningResult {
            uri,
            headers: self.headers,
        })
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.as_ref().map_or(0, |v| v.len() + 1))
            .sum::<usize>()
    }

    /// Push a new query pair into query list, percent encoding both sides.
    #[inline]
    pub fn query_push(&mut self, key: &str, value: &str) {
        self.query.push((
            utf8_percent_encode(key, &URI_ENCODE_SET).to_string(),
            Some(utf8_percent_encode(value, &URI_ENCODE_SET).to_string()),
        ));
    }

    /// Get all percent decoded values for `key`, in order.
    pub fn query_get(&self, key: &str) -> Vec<String> {
        self.query_decoded()
            .into_iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }

    /// Convert query into percent decoded pairs.
    pub fn query_decoded(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .flat_map(|(k, v)| {
                let pair = match v {
                    Some(v) => format!("{k}={v}"),
                    None => k.clone(),
                };
                form_urlencoded::parse(pair.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Convert query to a sorted string with every key and value encoded
    /// the same way, whatever encoding the uri used.
    ///
    /// ```shell
    /// [(b, 2), (a, x&y)] => "a=x%26y&b=2"
    /// ```
    pub fn canonical_query(&self) -> String {
        let mut query = self.query_decoded();
        // Sort via decoded query name, then value.
        query.sort();

        let mut s = String::with_capacity(16);
        for (idx, (k, v)) in query.into_iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }

            // Writing into a String never fails.
            let _ = write!(
                s,
                "{}={}",
                utf8_percent_encode(&k, &URI_ENCODE_SET),
                utf8_percent_encode(&v, &URI_ENCODE_SET)
            );
        }

        s
    }
}
