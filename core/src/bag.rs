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

//! Ordered key/value container rendered into a query string.

use std::fmt::Write;

use percent_encoding::utf8_percent_encode;

use crate::constants::URI_ENCODE_SET;
use crate::{Error, Result};

/// ParamValue is the value stored for a key inside an [`OrderedBag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single value, rendered as one `key=value` pair.
    Scalar(String),
    /// Several values for the same key, rendered as repeated pairs in order.
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Scalar(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Scalar(v.clone())
    }
}

macro_rules! impl_scalar_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    ParamValue::Scalar(v.to_string())
                }
            }
        )*
    };
}

impl_scalar_from!(bool, i32, i64, u32, u64, usize);

impl<T: ToString> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for ParamValue {
    fn from(v: &[T]) -> Self {
        ParamValue::List(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for ParamValue {
    fn from(v: [T; N]) -> Self {
        ParamValue::List(v.iter().map(ToString::to_string).collect())
    }
}

impl TryFrom<serde_json::Value> for ParamValue {
    type Error = Error;

    /// Accept strings, numbers, booleans and flat arrays of those.
    fn try_from(v: serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        fn scalar(v: Value) -> Result<String> {
            match v {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                Value::Null => Err(Error::invalid_parameter_value(
                    "null is not a valid parameter value",
                )),
                Value::Array(_) => Err(Error::invalid_parameter_value(
                    "nested lists are not valid parameter values",
                )),
                Value::Object(_) => Err(Error::invalid_parameter_value(
                    "objects are not valid parameter values",
                )),
            }
        }

        match v {
            Value::Array(items) => Ok(ParamValue::List(
                items.into_iter().map(scalar).collect::<Result<_>>()?,
            )),
            v => scalar(v).map(ParamValue::Scalar),
        }
    }
}

/// OrderedBag keeps parameters in insertion order and renders them as
/// `key1=v1&key2=v2`.
///
/// The optional prefix is only applied while rendering, so setting a key
/// twice always hits the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedBag {
    prefix: Option<String>,
    entries: Vec<(String, ParamValue)>,
}

impl OrderedBag {
    /// Create an empty bag without prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bag whose keys are rendered with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            entries: Vec::new(),
        }
    }

    /// Insert a value, or overwrite it in place if the key already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Get the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of keys in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bag holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and values in insertion order, without prefix.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the bag into a query string fragment.
    ///
    /// Returns an empty string if the bag is empty.
    pub fn render(&self) -> String {
        let prefix = self.prefix.as_deref().unwrap_or_default();
        let mut s = String::new();

        for (key, value) in &self.entries {
            let key = utf8_percent_encode(key, &URI_ENCODE_SET);
            let values: &[String] = match value {
                ParamValue::Scalar(v) => std::slice::from_ref(v),
                ParamValue::List(vs) => vs,
            };

            for v in values {
                if !s.is_empty() {
                    s.push('&');
                }
                // Writing into a String never fails.
                let _ = write!(
                    s,
                    "{prefix}{key}={}",
                    utf8_percent_encode(v, &URI_ENCODE_SET)
                );
            }
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_render_empty() {
        assert_eq!(OrderedBag::new().render(), "");
        assert_eq!(OrderedBag::with_prefix(":").render(), "");
    }

    #[test]
    fn test_render_keeps_insertion_order() {
        let mut bag = OrderedBag::new();
        bag.set("name", "ryan").set("age", 21).set("active", true);

        assert_eq!(bag.render(), "name=ryan&age=21&active=true");
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut bag = OrderedBag::new();
        bag.set("a", "1").set("b", "2").set("a", "3");

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get("a"), Some(&ParamValue::Scalar("3".to_string())));
        assert_eq!(bag.render(), "a=3&b=2");
    }

    #[test]
    fn test_prefix_is_render_only() {
        let mut bag = OrderedBag::with_prefix(":");
        bag.set("age", "21").set("age", "22");

        assert_eq!(bag.len(), 1);
        assert!(bag.get(":age").is_none());
        assert_eq!(bag.iter().next().map(|(k, _)| k), Some("age"));
        assert_eq!(bag.render(), ":age=22");
    }

    #[test]
    fn test_list_expands_to_repeated_pairs() {
        let mut bag = OrderedBag::with_prefix(":");
        bag.set("age", vec![">21", "<40"]);

        assert_eq!(bag.render(), ":age=%3E21&:age=%3C40");
    }

    #[test_case("name", "ryan", "name=ryan"; "plain")]
    #[test_case("~order", "-age,name", "~order=-age%2Cname"; "reserved key")]
    #[test_case("full name", "a&b=c", "full%20name=a%26b%3Dc"; "needs escaping")]
    #[test_case("emoji", "ü", "emoji=%C3%BC"; "utf8")]
    fn test_render_encoding(key: &str, value: &str, expected: &str) {
        let mut bag = OrderedBag::new();
        bag.set(key, value);
        assert_eq!(bag.render(), expected);
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let mut bag = OrderedBag::new();
        bag.set("a", Vec::<String>::new()).set("b", "1");

        assert_eq!(bag.render(), "b=1");
    }

    #[test]
    fn test_param_value_from_json() -> Result<()> {
        assert_eq!(
            ParamValue::try_from(json!("ryan"))?,
            ParamValue::Scalar("ryan".to_string())
        );
        assert_eq!(
            ParamValue::try_from(json!(10))?,
            ParamValue::Scalar("10".to_string())
        );
        assert_eq!(
            ParamValue::try_from(json!([">21", 40]))?,
            ParamValue::List(vec![">21".to_string(), "40".to_string()])
        );
        Ok(())
    }

    #[test_case(json!(null); "null")]
    #[test_case(json!({"a": 1}); "object")]
    #[test_case(json!([[1, 2]]); "nested list")]
    #[test_case(json!([{"a": 1}]); "list of objects")]
    fn test_param_value_from_json_rejected(v: serde_json::Value) {
        let err = ParamValue::try_from(v).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidParameterValue);
    }
}
