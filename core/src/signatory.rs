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
use std::fmt::Write;

use http::header::AUTHORIZATION;
use http::HeaderValue;
use http::Method;
use http::Uri;
use log::debug;

use crate::constants::*;
use crate::hash::{hex_hmac_sha256, hex_sha256};
use crate::time::{format_timestamp, now, DateTime};
use crate::{Credential, Error, Result, SigningMethod, SigningRequest, SigningResult};

/// Signatory is the trait used by the request builder to authenticate a request.
///
/// Implementations must be deterministic for identical inputs and must never
/// modify the given uri. If the scheme needs extra query parameters, return a
/// new uri inside [`SigningResult`].
pub trait Signatory: Debug + Send + Sync + 'static {
    /// Produce signing material for the request.
    ///
    /// ## Credential
    ///
    /// `credential` is `None` when the client was built without keys. Signatories
    /// that need keys must fail with [`ErrorKind::SigningFailed`](crate::ErrorKind::SigningFailed).
    fn sign(
        &self,
        method: &Method,
        uri: &Uri,
        body: Option<&[u8]>,
        credential: Option<&Credential>,
    ) -> Result<SigningResult>;
}

/// NoopSignatory leaves the request untouched.
///
/// This is used for unauthenticated deployments or when no keys are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSignatory;

impl Signatory for NoopSignatory {
    fn sign(
        &self,
        _method: &Method,
        uri: &Uri,
        _body: Option<&[u8]>,
        _credential: Option<&Credential>,
    ) -> Result<SigningResult> {
        Ok(SigningResult::unsigned(uri))
    }
}

/// HmacSignatory signs requests with HMAC-SHA256 keyed by the private key.
///
/// This is a generic scheme, deployments that speak a different protocol
/// should implement [`Signatory`] themselves.
///
/// ## String to sign
///
/// ```text
/// METHOD + "\n" +
/// Host + "\n" +
/// Path + "\n" +
/// CanonicalQuery + "\n" +
/// Timestamp + "\n" +
/// HexSha256(Body)
/// ```
///
/// `CanonicalQuery` is the percent decoded query sorted by key then value. In
/// query mode it already contains `~key`, `~ts` and `~bodyhash`; `~sign` is
/// appended last. In header mode the proof goes into `Authorization`.
#[derive(Debug, Clone)]
pub struct HmacSignatory {
    method: SigningMethod,
    time: Option<DateTime>,
}

impl Default for HmacSignatory {
    fn default() -> Self {
        Self::new()
    }
}

impl HmacSignatory {
    /// Create a signatory that signs into the query string.
    pub fn new() -> Self {
        Self {
            method: SigningMethod::Query,
            time: None,
        }
    }

    /// Create a signatory that signs into the `Authorization` header.
    pub fn header() -> Self {
        Self {
            method: SigningMethod::Header,
            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Get the signing method in use.
    pub fn signing_method(&self) -> SigningMethod {
        self.method
    }
}

impl Signatory for HmacSignatory {
    fn sign(
        &self,
        method: &Method,
        uri: &Uri,
        body: Option<&[u8]>,
        credential: Option<&Credential>,
    ) -> Result<SigningResult> {
        let cred = match credential {
            Some(cred) if cred.is_valid() => cred,
            Some(_) => {
                return Err(Error::signing_failed("credential has an empty key")
                    .with_context("method", method)
                    .with_context("uri", uri))
            }
            None => {
                return Err(Error::signing_failed("missing credential")
                    .with_context("method", method)
                    .with_context("uri", uri))
            }
        };

        let timestamp = format_timestamp(self.time.unwrap_or_else(now));
        let body_hash = body.map(hex_sha256);

        let mut req = SigningRequest::build(method, uri)?;

        if self.method == SigningMethod::Query {
            req.query_push(PARAM_KEY, &cred.public_key);
            req.query_push(PARAM_TIMESTAMP, &timestamp);
            if let Some(hash) = &body_hash {
                req.query_push(PARAM_BODY_HASH, hash);
            }
        }

        let string_to_sign = string_to_sign(&req, &timestamp, body_hash.as_deref())?;
        let signature = hex_hmac_sha256(cred.private_key.as_bytes(), string_to_sign.as_bytes());

        match self.method {
            SigningMethod::Query => req.query_push(PARAM_SIGN, &signature),
            SigningMethod::Header => {
                req.headers.insert(AUTHORIZATION, {
                    let mut value: HeaderValue = format!(
                        "HMAC-SHA256 Key={},Timestamp={timestamp},Signature={signature}",
                        cred.public_key
                    )
                    .parse()?;
                    value.set_sensitive(true);

                    value
                });
            }
        }

        req.into_result()
    }
}

fn string_to_sign(req: &SigningRequest, timestamp: &str, body_hash: Option<&str>) -> Result<String> {
    let mut s = String::new();
    writeln!(s, "{}", req.method.as_str())?;
    writeln!(s, "{}", req.authority)?;
    writeln!(s, "{}", req.path)?;
    writeln!(s, "{}", req.canonical_query())?;
    writeln!(s, "{timestamp}")?;
    write!(s, "{}", body_hash.unwrap_or_default())?;

    debug!("string to sign: {}", &s);
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn test_time() -> DateTime {
        chrono::DateTime::parse_from_rfc2822("Mon, 15 Aug 2022 16:50:12 GMT")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn test_credential() -> Credential {
        Credential::new("test", "ABC123-private")
    }

    #[test]
    fn test_noop_returns_same_uri() -> Result<()> {
        let uri: Uri = "https://project.stretchr.com/api/v1/people".parse()?;
        let result = NoopSignatory.sign(&Method::GET, &uri, None, None)?;

        assert_eq!(result.uri, uri);
        assert!(result.headers.is_empty());
        Ok(())
    }

    #[test]
    fn test_sign_in_query() -> Result<()> {
        let uri: Uri =
            "https://project.company.stretchr.com/api/v1/people/1/cars?~limit=10&:age=%3E21"
                .parse()?;
        let signatory = HmacSignatory::new().with_time(test_time());

        let result = signatory.sign(&Method::GET, &uri, None, Some(&test_credential()))?;

        assert_eq!(
            result.uri.to_string(),
            "https://project.company.stretchr.com/api/v1/people/1/cars\
             ?~limit=10&:age=%3E21&~key=test&~ts=1660582212\
             &~sign=9745af33342046705bd6e3303c481a9d41c30e1e32159317ae4b3e5969e4b088"
        );
        assert!(result.headers.is_empty());
        // The caller's uri is left alone.
        assert_eq!(
            uri.to_string(),
            "https://project.company.stretchr.com/api/v1/people/1/cars?~limit=10&:age=%3E21"
        );
        Ok(())
    }

    #[test]
    fn test_sign_in_query_with_body() -> Result<()> {
        let uri: Uri = "https://project.company.stretchr.com/api/v1/people".parse()?;
        let signatory = HmacSignatory::new().with_time(test_time());

        let result = signatory.sign(
            &Method::POST,
            &uri,
            Some(br#"{"name":"ryan"}"#.as_slice()),
            Some(&test_credential()),
        )?;

        assert_eq!(
            result.uri.to_string(),
            "https://project.company.stretchr.com/api/v1/people\
             ?~key=test&~ts=1660582212\
             &~bodyhash=eb2316dfb46e0ee8d702a7ea527ef0e472dcbaf1c9bee420700343a1b15e1407\
             &~sign=76fd2db9b4b25a1d2b1078c93ac04588a6e7c36d7dca9ef63986b7c41bfb6696"
        );
        Ok(())
    }

    #[test]
    fn test_sign_in_header() -> Result<()> {
        let uri: Uri = "https://project.company.stretchr.com/api/v1/people".parse()?;
        let signatory = HmacSignatory::header().with_time(test_time());

        let result = signatory.sign(&Method::GET, &uri, None, Some(&test_credential()))?;

        assert_eq!(result.uri, uri);
        let auth = result.headers.get(AUTHORIZATION).expect("must have auth");
        assert!(auth.is_sensitive());
        assert_eq!(
            auth.to_str().expect("must be valid header"),
            "HMAC-SHA256 Key=test,Timestamp=1660582212,\
             Signature=eb6d51c30d9f89e880d3eca744ec846562c1dc5145450edc8540afd1ef93713e"
        );
        Ok(())
    }

    #[test]
    fn test_sign_is_deterministic() -> Result<()> {
        let uri: Uri = "https://project.company.stretchr.com/api/v1/people".parse()?;
        let signatory = HmacSignatory::new().with_time(test_time());

        let a = signatory.sign(&Method::GET, &uri, None, Some(&test_credential()))?;
        let b = signatory.sign(&Method::GET, &uri, None, Some(&test_credential()))?;
        assert_eq!(a.uri, b.uri);
        Ok(())
    }

    #[test]
    fn test_sign_without_credential() {
        let uri = Uri::from_static("https://project.company.stretchr.com/api/v1/people");

        let err = HmacSignatory::new()
            .sign(&Method::DELETE, &uri, None, None)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::SigningFailed);
        assert_eq!(err.context_value("method"), Some("DELETE"));

        let err = HmacSignatory::new()
            .sign(&Method::GET, &uri, None, Some(&Credential::new("test", "")))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::SigningFailed);
    }
}
