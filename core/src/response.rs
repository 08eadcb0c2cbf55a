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

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Envelope is the fixed shape JSON wrapper around every response.
///
/// ```json
/// {"~s": 200, "~x": "ctx", "~d": {...}, "~e": [{"~m": "message"}]}
/// ```
#[derive(Debug, Clone)]
pub struct Envelope {
    raw: String,
    json: Value,
    status: Option<u16>,
    context: Option<Value>,
    data: Option<Value>,
    errors: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "~s")]
    status: Option<u16>,
    #[serde(rename = "~x")]
    context: Option<Value>,
    #[serde(rename = "~d")]
    data: Option<Value>,
    #[serde(rename = "~e")]
    errors: Option<Vec<RawError>>,
}

#[derive(Deserialize)]
struct RawError {
    #[serde(rename = "~m", default)]
    message: String,
}

impl Envelope {
    /// Parse an envelope from a JSON string.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let json: Value = serde_json::from_str(&raw)?;
        if !json.is_object() {
            return Err(Error::malformed_response("envelope must be a JSON object")
                .with_context("body", &raw));
        }

        let envelope: RawEnvelope = serde_json::from_value(json.clone())
            .map_err(|e| Error::from(e).with_context("body", &raw))?;

        Ok(Self {
            raw,
            json,
            status: envelope.status,
            context: envelope.context,
            data: envelope.data,
            errors: envelope
                .errors
                .map(|errs| errs.into_iter().map(|e| e.message).collect()),
        })
    }

    /// Parse an envelope from raw bytes.
    pub fn from_slice(bs: &[u8]) -> Result<Self> {
        let raw = std::str::from_utf8(bs).map_err(|e| {
            Error::malformed_response("envelope is not valid utf-8").with_source(e)
        })?;
        Self::parse(raw)
    }

    /// Parse the envelope carried by a transporter response.
    pub fn from_response(resp: &http::Response<Bytes>) -> Result<Self> {
        Self::from_slice(resp.body()).map_err(|e| e.with_context("status", resp.status()))
    }

    /// The original JSON string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed JSON document.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Status reported by the service in `~s`.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Client context echoed back in `~x`.
    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    /// Payload carried in `~d`.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Deserialize the payload into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self.data.clone().unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }

    /// Messages of every error in `~e`, empty if there is no error list.
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Returns true if the envelope carries an error list.
    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }
}
