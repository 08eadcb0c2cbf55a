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

use std::time::Duration;

use reqwest::Client;
use stretchr_core::{Client as StretchrClient, Config, Envelope, Result};
use stretchr_transport_reqwest::ReqwestTransporter;

#[tokio::main]
async fn main() -> Result<()> {
    // Create a custom reqwest client with specific configuration
    let http = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .user_agent("stretchr-example/1.0")
        .build()
        .map_err(|e| stretchr_core::Error::unexpected("failed to build client").with_source(e))?;

    let client = StretchrClient::new(
        Config::new()
            .with_project("project.company")
            .with_public_key("test")
            .with_private_key("ABC123-private"),
    )?
    .with_transporter(ReqwestTransporter::new(http));

    let req = client.item("people", 1).collection("cars").limit(10);
    println!("GET {}", req.to_url());

    match req.get().await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            match Envelope::from_response(&resp) {
                Ok(envelope) => {
                    println!("Envelope status: {:?}", envelope.status());
                    for message in envelope.errors() {
                        println!("  error: {message}");
                    }
                }
                Err(err) => println!("Response is not an envelope: {err}"),
            }
        }
        Err(err) => println!("Request failed: {err}"),
    }

    Ok(())
}
