//! Conversion of caller params into request bodies and query strings.
//!
//! Params arrive as a `serde_json::Value`. POST/PUT bodies accept a mapping
//! or a sequence; GET/DELETE query strings accept only a mapping. Anything
//! else is a `TypeConversion` error naming the offending value.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A JSON-serializable request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Mapping(Map<String, Value>),
    Sequence(Vec<Value>),
}

impl Payload {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Client(e.to_string()))
    }
}

/// Convert params for a JSON body. Mappings and sequences pass through
/// unchanged.
pub fn to_payload(input: &Value) -> Result<Payload> {
    match input {
        Value::Object(map) => Ok(Payload::Mapping(map.clone())),
        Value::Array(items) => Ok(Payload::Sequence(items.clone())),
        other => Err(Error::type_conversion(other, "payload")),
    }
}

/// Convert params for a query string. Sequences are rejected: a query string
/// has no positional form.
pub fn to_params(input: &Value) -> Result<Map<String, Value>> {
    match input {
        Value::Object(map) => Ok(map.clone()),
        other => Err(Error::type_conversion(other, "params")),
    }
}

/// Flatten a params mapping into key/value pairs using nested form-param
/// conventions: `tags[]=a&tags[]=b` for arrays, `filter[kind]=x` for objects.
/// A `null` value has no value part and is sent as a bare key.
pub fn query_pairs(params: &Map<String, Value>) -> Vec<(String, Option<String>)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten(key: String, value: &Value, out: &mut Vec<(String, Option<String>)>) {
    match value {
        Value::Null => out.push((key, None)),
        Value::String(s) => out.push((key, Some(s.clone()))),
        Value::Bool(_) | Value::Number(_) => out.push((key, Some(value.to_string()))),
        Value::Array(items) => {
            let item_key = format!("{key}[]");
            for item in items {
                flatten(item_key.clone(), item, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten(format!("{key}[{sub}]"), item, out);
            }
        }
    }
}

/// Body for a caller-declared non-JSON Content-Type. Strings are sent
/// verbatim and mappings are form-encoded.
pub fn raw_body(input: &Value) -> Result<String> {
    match input {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => Ok(form_encode(&query_pairs(map))),
        other => Err(Error::type_conversion(other, "body")),
    }
}

/// Encode pairs as `application/x-www-form-urlencoded`, writing keys
/// without a value as bare keys.
pub fn form_encode(pairs: &[(String, Option<String>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        match value {
            Some(value) => serializer.append_pair(key, value),
            None => serializer.append_key_only(key),
        };
    }
    serializer.finish()
}
