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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Default api version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v1";
/// Domain appended to the project name when no base url is configured.
pub const DEFAULT_DOMAIN: &str = "stretchr.com";

/// Prefix rendered in front of every filter key.
pub const FILTER_PREFIX: &str = ":";

// Reserved query keys.
pub const PARAM_LIMIT: &str = "~limit";
pub const PARAM_SKIP: &str = "~skip";
pub const PARAM_ORDER: &str = "~order";

// Query keys appended by the hmac signatory.
pub const PARAM_KEY: &str = "~key";
pub const PARAM_TIMESTAMP: &str = "~ts";
pub const PARAM_BODY_HASH: &str = "~bodyhash";
pub const PARAM_SIGN: &str = "~sign";

/// AsciiSet used for path segments, query keys and query values.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - `/` is encoded as well, so an identifier can never introduce a new path segment.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
