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

use std::fmt::{Debug, Formatter};

use crate::utils::Redact;

/// Credential is the key pair a [`Signatory`](crate::Signatory) signs with.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Public key sent along with the request to identify the caller.
    pub public_key: String,
    /// Private key used to compute the signature, never sent.
    pub private_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Check if both keys are present.
    pub fn is_valid(&self) -> bool {
        !self.public_key.is_empty() && !self.private_key.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("public_key", &Redact::from(&self.public_key))
            .field("private_key", &Redact::from(&self.private_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(Credential::new("test", "ABC123-private").is_valid());
        assert!(!Credential::new("", "ABC123-private").is_valid());
        assert!(!Credential::new("test", "").is_valid());
        assert!(!Credential::default().is_valid());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let cred = Credential::new("public-key-0123456789", "ABC123-private");
        assert_eq!(
            format!("{cred:?}"),
            "Credential { public_key: pub***789, private_key: ABC***ate }"
        );
    }
}
