use crate::domain::model::HrefType;
use serde_json::{Map, Value};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Everything but `A-Za-z0-9-_.!~*'()` is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Prefixes a non-empty path with `/` when it does not start with one.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// `http(s)://{host}[:{port}]`
pub fn base_url(use_https: bool, host: &str, port: Option<u16>) -> String {
    let scheme = if use_https { "https" } else { "http" };
    match port {
        Some(port) => format!("{}://{}:{}", scheme, host, port),
        None => format!("{}://{}", scheme, host),
    }
}

/// `/{href_type}/v{version}/{name}`
pub fn resource_path(href_type: HrefType, version: u32, name: &str) -> String {
    format!("/{}/v{}/{}", href_type, version, name)
}

/// Serializes query parameters as `key=value&...` in insertion order,
/// percent-encoding keys and values (a space becomes `%20`).
///
/// Arrays repeat the key once per element; null and nested objects are
/// encoded as an empty value.
pub fn encode_query_string(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        let key = encode_component(key);
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{}={}", key, encode_component(&query_value(item))));
                }
            }
            other => pairs.push(format!("{}={}", key, encode_component(&query_value(other)))),
        }
    }
    pairs.join("&")
}

fn encode_component(component: &str) -> String {
    utf8_percent_encode(component, QUERY_COMPONENT).to_string()
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Replaces every `{name}` occurrence with its value.
pub fn substitute_path_variables(href: &str, variables: &BTreeMap<String, String>) -> String {
    variables
        .iter()
        .fold(href.to_string(), |href, (name, value)| {
            href.replace(&format!("{{{}}}", name), value)
        })
}
