//! Declarative records a domain document is made of.
//!
//! Records are plain data: they are validated and indexed when handed to
//! [`crate::Domain::new`], [`crate::Resource::new`] and friends. Keys are
//! snake_case; the camelCase names used by older documents are accepted as
//! aliases.

use crate::domain::shape::ObjectShapeReference;
use crate::utils::error::{ApiModelError, Result};
use crate::utils::validation::{
    prefix_field, validate_each, validate_non_empty_string, validate_positive_number, Validate,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(ApiModelError::validation(
                "method",
                other,
                "Valid methods: GET, POST, PUT, PATCH, DELETE, OPTIONS",
            )),
        }
    }
}

/// First path segment of a derived href.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HrefType {
    #[default]
    Data,
    Schema,
    Service,
}

impl HrefType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HrefType::Data => "data",
            HrefType::Schema => "schema",
            HrefType::Service => "service",
        }
    }
}

impl fmt::Display for HrefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HrefType {
    type Err = ApiModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "data" => Ok(HrefType::Data),
            "schema" => Ok(HrefType::Schema),
            "service" => Ok(HrefType::Service),
            other => Err(ApiModelError::validation(
                "href_type",
                other,
                "Valid href types: data, schema, service",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: String,
    pub title: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub auth: Vec<String>,
    #[serde(
        default,
        alias = "requestQuerySchema",
        alias = "queryStringSchema",
        alias = "query_string_schema",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_query_shape: Option<ObjectShapeReference>,
    #[serde(
        default,
        alias = "payloadSchema",
        alias = "payload_schema",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_payload_shape: Option<ObjectShapeReference>,
    #[serde(
        default,
        alias = "responseSchema",
        alias = "response_schema",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_shape: Option<ObjectShapeReference>,
}

impl ActionRecord {
    pub fn new(name: impl Into<String>, title: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            method,
            path: None,
            auth: Vec::new(),
            request_query_shape: None,
            request_payload_shape: None,
            response_shape: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_auth<I, S>(mut self, auth: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth = auth.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_request_query_shape(mut self, shape: ObjectShapeReference) -> Self {
        self.request_query_shape = Some(shape);
        self
    }

    pub fn with_request_payload_shape(mut self, shape: ObjectShapeReference) -> Self {
        self.request_payload_shape = Some(shape);
        self
    }

    pub fn with_response_shape(mut self, shape: ObjectShapeReference) -> Self {
        self.response_shape = Some(shape);
        self
    }
}

impl Validate for ActionRecord {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("title", &self.title)?;
        validate_shape("request_query_shape", &self.request_query_shape)?;
        validate_shape("request_payload_shape", &self.request_payload_shape)?;
        validate_shape("response_shape", &self.response_shape)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub href: String,
    pub rel: String,
    pub title: String,
    #[serde(default)]
    pub auth: Vec<String>,
    #[serde(
        default,
        alias = "queryStringSchema",
        alias = "query_string_schema",
        skip_serializing_if = "Option::is_none"
    )]
    pub query_shape: Option<ObjectShapeReference>,
}

impl LinkRecord {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            title: title.into(),
            auth: Vec::new(),
            query_shape: None,
        }
    }

    pub fn with_auth<I, S>(mut self, auth: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth = auth.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_query_shape(mut self, shape: ObjectShapeReference) -> Self {
        self.query_shape = Some(shape);
        self
    }
}

impl Validate for LinkRecord {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("href", &self.href)?;
        validate_non_empty_string("rel", &self.rel)?;
        validate_non_empty_string("title", &self.title)?;
        validate_shape("query_shape", &self.query_shape)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    pub version: u32,
    #[serde(alias = "objectSchemaType", alias = "object_schema_type")]
    pub object_shape: ObjectShapeReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, version: u32, object_shape: ObjectShapeReference) -> Self {
        Self {
            name: name.into(),
            version,
            object_shape,
            description: None,
            tags: Vec::new(),
            actions: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action(mut self, action: ActionRecord) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_link(mut self, link: LinkRecord) -> Self {
        self.links.push(link);
        self
    }
}

impl Validate for ResourceRecord {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_positive_number("version", self.version, 1)?;
        self.object_shape
            .validate()
            .map_err(|e| prefix_field(e, "object_shape"))?;
        validate_each("actions", &self.actions)?;
        validate_each("links", &self.links)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "https")]
    pub use_https: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub resources: Vec<ResourceRecord>,
}

impl DomainRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            use_https: false,
            port: None,
            resources: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_resource(mut self, resource: ResourceRecord) -> Self {
        self.resources.push(resource);
        self
    }
}

impl Validate for DomainRecord {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_each("resources", &self.resources)
    }
}

fn validate_shape(field_name: &str, shape: &Option<ObjectShapeReference>) -> Result<()> {
    match shape {
        Some(shape) => shape.validate().map_err(|e| prefix_field(e, field_name)),
        None => Ok(()),
    }
}

/// Parses a record out of untyped JSON, reporting malformed input as a
/// validation failure on `entity`.
pub fn record_from_value<T: DeserializeOwned>(entity: &str, value: serde_json::Value) -> Result<T> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| ApiModelError::ValidationError {
        field: entity.to_string(),
        value: raw,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape() -> ObjectShapeReference {
        ObjectShapeReference::new("ns://runrightfast.co/applications", "1.0.0", "Application")
            .unwrap()
    }

    #[test]
    fn test_http_method_parsing() {
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("get".parse::<HttpMethod>().is_err());
        assert!("TRACE".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn test_href_type_parsing() {
        assert_eq!(HrefType::default(), HrefType::Data);
        assert_eq!("schema".parse::<HrefType>().unwrap(), HrefType::Schema);
        assert!("other".parse::<HrefType>().is_err());
    }

    #[test]
    fn test_action_record_from_legacy_names() {
        let record: ActionRecord = record_from_value(
            "action",
            json!({
                "name": "create",
                "title": "Create",
                "method": "POST",
                "payloadSchema": {
                    "namespace": "ns://runrightfast.co/config",
                    "version": "1.1.1",
                    "type": "ObjectSchemaManagerConfig"
                },
                "requestQuerySchema": {
                    "namespace": "ns://runrightfast.co/query",
                    "version": "1.0.0",
                    "type": "Query"
                }
            }),
        )
        .unwrap();
        assert_eq!(record.method, HttpMethod::Post);
        assert_eq!(
            record.request_payload_shape.unwrap().type_name,
            "ObjectSchemaManagerConfig"
        );
        assert_eq!(record.request_query_shape.unwrap().type_name, "Query");
    }

    #[test]
    fn test_action_record_rejects_unknown_method() {
        let err = record_from_value::<ActionRecord>(
            "action",
            json!({"name": "create", "title": "Create", "method": "FETCH"}),
        )
        .unwrap_err();
        assert!(matches!(err, ApiModelError::ValidationError { ref field, .. } if field == "action"));
    }

    #[test]
    fn test_link_record_requires_href() {
        assert!(record_from_value::<LinkRecord>("link", json!({"rel": "config", "title": "Config"})).is_err());
        assert!(record_from_value::<LinkRecord>("link", json!(null)).is_err());
    }

    #[test]
    fn test_resource_record_validation_reports_nested_field() {
        let record = ResourceRecord::new("applications", 1, shape())
            .with_action(ActionRecord::new("create", "Create", HttpMethod::Post))
            .with_action(ActionRecord::new("delete", "", HttpMethod::Delete));
        let err = record.validate().unwrap_err();
        assert!(matches!(err, ApiModelError::ValidationError { ref field, .. } if field == "actions[1].title"));
    }

    #[test]
    fn test_resource_record_version_must_be_positive() {
        let record = ResourceRecord::new("applications", 0, shape());
        let err = record.validate().unwrap_err();
        assert!(matches!(err, ApiModelError::ValidationError { ref field, .. } if field == "version"));
    }

    #[test]
    fn test_resource_record_nested_shape() {
        let mut record = ResourceRecord::new("applications", 1, shape());
        record.object_shape.namespace = "runrightfast.co".to_string();
        let err = record.validate().unwrap_err();
        assert!(matches!(err, ApiModelError::ValidationError { ref field, .. } if field == "object_shape.namespace"));
    }

    #[test]
    fn test_domain_record_https_alias() {
        let record: DomainRecord = record_from_value(
            "domain",
            json!({"name": "api.runrightfast.co", "https": true, "port": 8443, "resources": []}),
        )
        .unwrap();
        assert!(record.use_https);
        assert_eq!(record.port, Some(8443));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_domain_record_requires_resources() {
        assert!(record_from_value::<DomainRecord>("domain", json!({"name": "api.runrightfast.co"})).is_err());
        assert!(record_from_value::<DomainRecord>("domain", json!({"name": "x", "resources": [], "port": -1})).is_err());
    }
}
