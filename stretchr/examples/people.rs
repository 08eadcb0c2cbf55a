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

use serde_json::json;
use stretchr::{Config, Envelope, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let client = stretchr::connect(
        Config::new()
            .with_project("project.company")
            .with_public_key("test")
            .with_private_key("ABC123-private"),
    )?;

    let people = client
        .collection("people")
        .filter("age", [">21", "<40"])
        .order("-age,name")
        .limit(10)
        .page(2);
    println!("GET {}", people.to_url());

    match people.get().await {
        Ok(resp) => {
            let envelope = Envelope::from_response(&resp)?;
            println!("status: {:?}, data: {:?}", envelope.status(), envelope.data());
        }
        Err(err) => println!("request failed: {err}"),
    }

    match client.collection("people").create(json!({"name": "ryan"})).await {
        Ok(resp) => println!("create returned {}", resp.status()),
        Err(err) => println!("create failed: {err}"),
    }

    Ok(())
}
