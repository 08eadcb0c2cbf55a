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

use log::debug;
use stretchr_core::{Client, Config, Result};
use stretchr_transport_reqwest::ReqwestTransporter;

/// Build a [`Client`] that sends requests with reqwest.
///
/// Config is validated exactly like [`Client::new`]. A transporter set in
/// `cfg` wins over the default one.
pub fn connect(cfg: Config) -> Result<Client> {
    let custom = cfg.transporter.is_some();
    let client = Client::new(cfg)?;

    if custom {
        return Ok(client);
    }

    debug!("no transporter configured, using reqwest");
    Ok(client.with_transporter(ReqwestTransporter::default()))
}
