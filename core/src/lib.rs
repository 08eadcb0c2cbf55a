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

//! Core components for building and signing requests against a
//! resource-oriented HTTP API.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **RequestBuilder**: Accumulates a resource path, query parameters and filters, then assembles the url
//! - **Signatory**: Authenticates an assembled request without sending it
//! - **Transporter**: Performs the network call for a signed request
//! - **Client**: Holds shared configuration and hands out fresh request builders
//! - **Envelope**: Parses the JSON wrapper every response comes in
//!
//! ## Example
//!
//! ```no_run
//! use stretchr_core::{Client, Config, Envelope, RecordingTransporter};
//! use serde_json::json;
//!
//! # async fn example() -> stretchr_core::Result<()> {
//! let client = Client::new(
//!     Config::new()
//!         .with_project("project.company")
//!         .with_public_key("test")
//!         .with_private_key("ABC123-private")
//!         .with_transporter(RecordingTransporter::new()),
//! )?;
//!
//! // GET https://project.company.stretchr.com/api/v1/people/1/cars?:age=%3E21&:age=%3C40
//! let resp = client
//!     .item("people", 1)
//!     .collection("cars")
//!     .filter("age", [">21", "<40"])
//!     .get()
//!     .await?;
//! let envelope = Envelope::from_response(&resp)?;
//! assert!(envelope.errors().is_empty());
//!
//! // POST https://project.company.stretchr.com/api/v1/people
//! client.collection("people").create(json!({"name": "ryan"})).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`Signatory`]: For producing signing material
//! - [`Transporter`]: For sending requests
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod constants;

mod error;
pub use error::{Error, ErrorKind, Result};

mod bag;
pub use bag::{OrderedBag, ParamValue};
mod credential;
pub use credential::Credential;
mod signing;
pub use signing::{SigningMethod, SigningRequest, SigningResult};
mod signatory;
pub use signatory::{HmacSignatory, NoopSignatory, Signatory};
mod transport;
pub use transport::{NoopTransporter, RecordingTransporter, TransportRequest, Transporter};
mod request;
pub use request::RequestBuilder;
mod client;
pub use client::{Client, Config};
mod response;
pub use response::Envelope;
