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

//! Transporter backed by [`reqwest`].

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};
use stretchr_core::{Error, Result, TransportRequest, Transporter};

/// ReqwestTransporter sends requests with a [`reqwest::Client`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestTransporter {
    client: Client,
}

impl ReqwestTransporter {
    /// Create a new ReqwestTransporter with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transporter for ReqwestTransporter {
    async fn make_request(&self, req: TransportRequest) -> Result<http::Response<Bytes>> {
        let req = req.into_http()?;
        let method = req.method().clone();
        let uri = req.uri().clone();

        let transport_error = |message: &'static str| {
            let method = method.clone();
            let uri = uri.clone();
            move |err: reqwest::Error| {
                Error::transport(message)
                    .with_context("method", method)
                    .with_context("uri", uri)
                    .with_source(err)
            }
        };

        let req = Request::try_from(req).map_err(transport_error("failed to build request"))?;
        debug!("sending request: {} {}", method, uri);

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(transport_error("failed to execute request"))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(transport_error("failed to read response body"))?;
        debug!("got response: {} with {} bytes", parts.status, bs.len());

        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stretchr_core::{Client as StretchrClient, Config, ErrorKind};

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let client = StretchrClient::new(
            Config::new()
                .with_project("project")
                .with_base_url("127.0.0.1:1")
                .with_transporter(ReqwestTransporter::default()),
        )?;

        let err = client.collection("people").get().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.context_value("method"), Some("GET"));
        assert_eq!(
            err.context_value("uri"),
            Some("https://127.0.0.1:1/api/v1/people")
        );
        Ok(())
    }
}
