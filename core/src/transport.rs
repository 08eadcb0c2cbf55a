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

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use http::Method;
use http::StatusCode;
use http::Uri;

use crate::{Error, Result, SigningResult};

/// TransportRequest is everything a [`Transporter`] needs to perform one call.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// The assembled uri, before signing.
    pub uri: Uri,
    /// JSON body for `create`, `replace` and `update`.
    pub body: Option<serde_json::Value>,
    /// Signing material produced by the signatory.
    pub signing: Option<SigningResult>,
    /// The project the request was built for, if known.
    pub project: Option<String>,
}

impl TransportRequest {
    /// The uri that should go on the wire.
    ///
    /// Returns the signed uri if the signatory produced one.
    pub fn signed_uri(&self) -> &Uri {
        self.signing.as_ref().map(|s| &s.uri).unwrap_or(&self.uri)
    }

    /// Convert into an `http::Request`, applying signing material and
    /// encoding the body as JSON.
    pub fn into_http(self) -> Result<http::Request<Bytes>> {
        let (uri, headers) = match self.signing {
            Some(signing) => (signing.uri, signing.headers),
            None => (self.uri, Default::default()),
        };

        let body = match &self.body {
            Some(body) => Bytes::from(serde_json::to_vec(body).map_err(|e| {
                Error::request_invalid("failed to encode request body")
                    .with_context("uri", &uri)
                    .with_source(e)
            })?),
            None => Bytes::new(),
        };

        let mut req = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(body)?;
        req.headers_mut().extend(headers);
        if self.body.is_some() {
            req.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(req)
    }
}

/// Transporter performs the network call for an assembled, signed request.
///
/// The request builder does not interpret the response, whatever the
/// transporter returns is handed back to the caller unchanged.
#[async_trait::async_trait]
pub trait Transporter: Debug + Send + Sync + 'static {
    /// Send the request and return the raw response.
    async fn make_request(&self, req: TransportRequest) -> Result<http::Response<Bytes>>;
}

/// NoopTransporter is a no-op implementation that always returns an error.
///
/// This is used when no transporter is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransporter;

#[async_trait::async_trait]
impl Transporter for NoopTransporter {
    async fn make_request(&self, req: TransportRequest) -> Result<http::Response<Bytes>> {
        Err(
            Error::transport("request sending not supported: no transporter configured")
                .with_context("method", &req.method)
                .with_context("uri", req.signed_uri()),
        )
    }
}

/// RecordingTransporter keeps every request it receives and answers with a
/// canned response.
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to a client.
#[derive(Debug, Clone)]
pub struct RecordingTransporter {
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    status: StatusCode,
    body: Bytes,
}

impl Default for RecordingTransporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransporter {
    /// Create a transporter answering `200` with an empty envelope.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status: StatusCode::OK,
            body: Bytes::from_static(br#"{"~s":200}"#),
        }
    }

    /// Replace the canned response.
    pub fn with_response(mut self, status: StatusCode, body: impl Into<Bytes>) -> Self {
        self.status = status;
        self.body = body.into();
        self
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl Transporter for RecordingTransporter {
    async fn make_request(&self, req: TransportRequest) -> Result<http::Response<Bytes>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(req);

        Ok(http::Response::builder()
            .status(self.status)
            .body(self.body.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;
    use http::HeaderMap;
    use serde_json::json;

    fn request(body: Option<serde_json::Value>, signing: Option<SigningResult>) -> TransportRequest {
        TransportRequest {
            method: Method::POST,
            uri: Uri::from_static("https://project.stretchr.com/api/v1/people"),
            body,
            signing,
            project: Some("project".to_string()),
        }
    }

    #[test]
    fn test_into_http_without_signing() -> Result<()> {
        let req = request(Some(json!({"name": "ryan"})), None).into_http()?;

        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "https://project.stretchr.com/api/v1/people"
        );
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.body().as_ref(), br#"{"name":"ryan"}"#);
        Ok(())
    }

    #[test]
    fn test_into_http_applies_signing() -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("HMAC-SHA256 test"));
        let signing = SigningResult {
            uri: Uri::from_static("https://project.stretchr.com/api/v1/people?~sign=abc"),
            headers,
        };

        let req = request(None, Some(signing)).into_http()?;
        assert_eq!(
            req.uri().to_string(),
            "https://project.stretchr.com/api/v1/people?~sign=abc"
        );
        assert_eq!(req.headers()[AUTHORIZATION], "HMAC-SHA256 test");
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert!(req.body().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_noop_transporter_fails() {
        let err = NoopTransporter
            .make_request(request(None, None))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::Transport);
        assert_eq!(err.context_value("method"), Some("POST"));
        assert_eq!(
            err.context_value("uri"),
            Some("https://project.stretchr.com/api/v1/people")
        );
    }

    #[tokio::test]
    async fn test_recording_transporter_survives_poisoned_lock() -> Result<()> {
        let transporter = RecordingTransporter::new();
        let requests = transporter.requests.clone();
        let _ = std::thread::spawn(move || {
            let _guard = requests.lock().unwrap();
            panic!("poison the record");
        })
        .join();
        assert!(transporter.requests.is_poisoned());

        transporter.make_request(request(None, None)).await?;
        assert_eq!(transporter.requests().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_recording_transporter_shares_record() -> Result<()> {
        let transporter = RecordingTransporter::new()
            .with_response(StatusCode::NOT_FOUND, r#"{"~s":404}"#);
        let handle = transporter.clone();

        let resp = transporter.make_request(request(None, None)).await?;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.body().as_ref(), br#"{"~s":404}"#);
        assert_eq!(handle.requests().len(), 1);
        Ok(())
    }
}
