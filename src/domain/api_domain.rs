use crate::core::href::{
    base_url, encode_query_string, normalize_path, substitute_path_variables,
};
use crate::domain::model::{DomainRecord, HrefType, ResourceRecord};
use crate::domain::resource::{Resource, ResourceKey};
use crate::utils::error::{ApiModelError, Result};
use crate::utils::validation::{
    duplicate_keys, prefix_field, validate_non_empty_string, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Parameters for [`Domain::resource_href`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceHrefParams {
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub href_type: HrefType,
}

impl ResourceHrefParams {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            href_type: HrefType::default(),
        }
    }

    pub fn with_href_type(mut self, href_type: HrefType) -> Self {
        self.href_type = href_type;
        self
    }
}

impl Validate for ResourceHrefParams {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_positive_number("version", self.version, 1)
    }
}

/// Parameters for [`Domain::resource_link_href`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLinkHrefParams {
    pub name: String,
    pub version: u32,
    pub link_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_variables: Option<BTreeMap<String, String>>,
}

impl ResourceLinkHrefParams {
    pub fn new(name: impl Into<String>, version: u32, link_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version,
            link_path: link_path.into(),
            query_string: None,
            path_variables: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query_string
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_path_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_variables
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

impl Validate for ResourceLinkHrefParams {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_positive_number("version", self.version, 1)?;
        validate_non_empty_string("link_path", &self.link_path)
    }
}

/// Root of the model: a named collection of resources plus the host settings
/// used to derive hrefs.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    name: String,
    description: Option<String>,
    use_https: bool,
    port: Option<u16>,
    resources: BTreeMap<ResourceKey, Resource>,
}

impl Domain {
    /// Validates the record and indexes its resources by `(name, version)`.
    /// Nothing is returned unless every nested resource is valid.
    pub fn new(record: DomainRecord) -> Result<Self> {
        record.validate()?;

        let duplicates = duplicate_keys(
            record
                .resources
                .iter()
                .map(|r| ResourceKey::new(r.name.as_str(), r.version)),
        );
        if !duplicates.is_empty() {
            return Err(ApiModelError::DuplicateKeyError {
                entity: "resource".to_string(),
                keys: duplicates,
            });
        }

        let mut resources = BTreeMap::new();
        for (index, resource) in record.resources.into_iter().enumerate() {
            let resource = Resource::new(resource)
                .map_err(|e| prefix_field(e, &format!("resources[{}]", index)))?;
            resources.insert(resource.key(), resource);
        }

        tracing::debug!(
            "Domain '{}' indexed {} resources (https: {}, port: {:?})",
            record.name,
            resources.len(),
            record.use_https,
            record.port
        );

        Ok(Self {
            name: record.name,
            description: record.description,
            use_https: record.use_https,
            port: record.port,
            resources,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn use_https(&self) -> bool {
        self.use_https
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the resource, or `None` when `(name, version)` is not indexed.
    pub fn resource(&self, name: &str, version: u32) -> Option<&Resource> {
        self.resources.get(&ResourceKey::new(name, version))
    }

    pub fn resource_mut(&mut self, name: &str, version: u32) -> Option<&mut Resource> {
        self.resources.get_mut(&ResourceKey::new(name, version))
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Keys of every indexed resource.
    pub fn resource_names(&self) -> Vec<&ResourceKey> {
        self.resources.keys().collect()
    }

    pub fn add_resource(&mut self, record: ResourceRecord) -> Result<&Resource> {
        let resource = Resource::new(record)?;
        match self.resources.entry(resource.key()) {
            Entry::Occupied(entry) => Err(ApiModelError::AlreadyExistsError {
                entity: "resource".to_string(),
                key: entry.key().to_string(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!("Adding resource {} to domain '{}'", entry.key(), self.name);
                Ok(entry.insert(resource))
            }
        }
    }

    /// Inserts the resource, replacing any resource with the same key.
    pub fn set_resource(&mut self, record: ResourceRecord) -> Result<&Resource> {
        let resource = Resource::new(record)?;
        match self.resources.entry(resource.key()) {
            Entry::Occupied(mut entry) => {
                tracing::warn!("Replacing resource {} in domain '{}'", entry.key(), self.name);
                entry.insert(resource);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(resource)),
        }
    }

    /// Removing an unknown resource is a no-op.
    pub fn remove_resource(&mut self, name: &str, version: u32) -> Option<Resource> {
        let removed = self.resources.remove(&ResourceKey::new(name, version));
        if removed.is_some() {
            tracing::debug!("Removed resource {}/{} from domain '{}'", name, version, self.name);
        }
        removed
    }

    /// `http(s)://{domain}[:{port}]`
    pub fn base_url(&self) -> String {
        base_url(self.use_https, &self.name, self.port)
    }

    /// `http(s)://{domain}[:{port}]/{href_type}/v{version}/{resource}`
    pub fn resource_href(&self, params: &ResourceHrefParams) -> Result<String> {
        params.validate()?;
        let resource = self.find_resource(&params.name, params.version)?;
        Ok(format!(
            "{}{}",
            self.base_url(),
            resource.path(params.href_type, None)?
        ))
    }

    pub fn resource_data_href(&self, name: &str, version: u32) -> Result<String> {
        self.resource_href(&ResourceHrefParams::new(name, version).with_href_type(HrefType::Data))
    }

    pub fn resource_schema_href(&self, name: &str, version: u32) -> Result<String> {
        self.resource_href(&ResourceHrefParams::new(name, version).with_href_type(HrefType::Schema))
    }

    pub fn resource_service_href(&self, name: &str, version: u32) -> Result<String> {
        self.resource_href(&ResourceHrefParams::new(name, version).with_href_type(HrefType::Service))
    }

    /// Builds an href suitable for a [`crate::ResourceLink`]:
    ///
    /// `http(s)://{domain}[:{port}]/data/v{N}/{resource}/{link_path}?{query_string}`
    ///
    /// `{variable}` placeholders are substituted after the query string has
    /// been encoded, so placeholders inside query values stay as they are.
    /// An empty query map is treated like no query: no bare `?` is appended.
    pub fn resource_link_href(&self, params: &ResourceLinkHrefParams) -> Result<String> {
        params.validate()?;
        let resource = self.find_resource(&params.name, params.version)?;

        let mut href = format!(
            "{}{}",
            self.base_url(),
            resource.path(HrefType::Data, None)?
        );
        href.push_str(&normalize_path(&params.link_path));

        if let Some(query) = params.query_string.as_ref().filter(|q| !q.is_empty()) {
            href.push('?');
            href.push_str(&encode_query_string(query));
        }

        match &params.path_variables {
            Some(variables) => Ok(substitute_path_variables(&href, variables)),
            None => Ok(href),
        }
    }

    fn find_resource(&self, name: &str, version: u32) -> Result<&Resource> {
        self.resource(name, version)
            .ok_or_else(|| ApiModelError::ResourceNotFoundError {
                name: name.to_string(),
                version,
            })
    }
}

impl TryFrom<DomainRecord> for Domain {
    type Error = ApiModelError;

    fn try_from(record: DomainRecord) -> Result<Self> {
        Self::new(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ActionRecord, HttpMethod, LinkRecord};
    use crate::domain::shape::ObjectShapeReference;

    fn applications(version: u32) -> ResourceRecord {
        ResourceRecord::new(
            "applications",
            version,
            ObjectShapeReference::new("ns://runrightfast.co/applications", "1.0.0", "Application")
                .unwrap(),
        )
        .with_description("Applications")
        .with_tags(["app"])
        .with_action(ActionRecord::new("create", "Create", HttpMethod::Post))
        .with_action(ActionRecord::new("delete", "Delete", HttpMethod::Delete).with_path("/{id}"))
        .with_link(
            LinkRecord::new(
                "http://api.runrightfast.co/data/v1/object-schema-manager/config",
                "config",
                "Object Schema Manager Configuration",
            )
            .with_auth(["hawk"]),
        )
    }

    fn domain(use_https: bool) -> Domain {
        Domain::new(
            DomainRecord::new("api.runrightfast.co")
                .with_https(use_https)
                .with_resource(applications(1)),
        )
        .unwrap()
    }

    #[test]
    fn test_construct_with_name_and_resources() {
        let domain = domain(false);
        assert_eq!(domain.name(), "api.runrightfast.co");
        assert_eq!(domain.resource("applications", 1).map(|r| r.name()), Some("applications"));
        assert!(domain.resource("applications", 2).is_none());
        assert!(!domain.use_https());
        assert!(domain.port().is_none());
    }

    #[test]
    fn test_duplicate_resource_keys() {
        let record = DomainRecord::new("api.runrightfast.co")
            .with_resource(applications(1))
            .with_resource(applications(2))
            .with_resource(applications(1));
        match Domain::new(record).unwrap_err() {
            ApiModelError::DuplicateKeyError { entity, keys } => {
                assert_eq!(entity, "resource");
                assert_eq!(keys, vec!["applications/1"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_nested_resource_error_is_reported() {
        let record = DomainRecord::new("api.runrightfast.co")
            .with_resource(applications(1))
            .with_resource(applications(0));
        let err = Domain::new(record).unwrap_err();
        assert!(matches!(err, ApiModelError::ValidationError { ref field, .. } if field == "resources[1].version"));
    }

    #[test]
    fn test_resource_names() {
        let domain = Domain::new(
            DomainRecord::new("api.runrightfast.co")
                .with_resource(applications(2))
                .with_resource(applications(1)),
        )
        .unwrap();
        let names: Vec<String> = domain.resource_names().iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["applications/1", "applications/2"]);

        let empty = Domain::new(DomainRecord::new("api.runrightfast.co")).unwrap();
        assert!(empty.resource_names().is_empty());
    }

    #[test]
    fn test_resource_data_href() {
        assert_eq!(
            domain(true).resource_data_href("applications", 1).unwrap(),
            "https://api.runrightfast.co/data/v1/applications"
        );
        assert_eq!(
            domain(false).resource_data_href("applications", 1).unwrap(),
            "http://api.runrightfast.co/data/v1/applications"
        );
    }

    #[test]
    fn test_resource_href_with_port() {
        let domain = Domain::new(
            DomainRecord::new("localhost")
                .with_port(8080)
                .with_resource(applications(1)),
        )
        .unwrap();
        assert_eq!(
            domain.resource_schema_href("applications", 1).unwrap(),
            "http://localhost:8080/schema/v1/applications"
        );
        assert_eq!(
            domain.resource_service_href("applications", 1).unwrap(),
            "http://localhost:8080/service/v1/applications"
        );
        assert_eq!(
            domain
                .resource_href(&ResourceHrefParams::new("applications", 1))
                .unwrap(),
            "http://localhost:8080/data/v1/applications"
        );
    }

    #[test]
    fn test_resource_href_errors() {
        let domain = domain(true);
        assert!(matches!(
            domain.resource_href(&ResourceHrefParams::new("unknown", 1)),
            Err(ApiModelError::ResourceNotFoundError { .. })
        ));
        assert!(matches!(
            domain.resource_href(&ResourceHrefParams::new("applications", 0)),
            Err(ApiModelError::ValidationError { .. })
        ));
        assert!(matches!(
            domain.resource_href(&ResourceHrefParams::new("", 1)),
            Err(ApiModelError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_resource_link_href() {
        let params = ResourceLinkHrefParams::new("applications", 1, "{id}")
            .with_query("version", true)
            .with_path_variable("id", "123");
        assert_eq!(
            domain(false).resource_link_href(&params).unwrap(),
            "http://api.runrightfast.co/data/v1/applications/123?version=true"
        );
    }

    #[test]
    fn test_resource_link_href_query_order_and_encoding() {
        let params = ResourceLinkHrefParams::new("applications", 1, "search")
            .with_query("z", "a b")
            .with_query("a", "it's~(ok)!");
        assert_eq!(
            domain(false).resource_link_href(&params).unwrap(),
            "http://api.runrightfast.co/data/v1/applications/search?z=a%20b&a=it's~(ok)!"
        );
    }

    #[test]
    fn test_resource_link_href_without_query_or_variables() {
        let domain = domain(true);
        let params = ResourceLinkHrefParams::new("applications", 1, "/config");
        assert_eq!(
            domain.resource_link_href(&params).unwrap(),
            "https://api.runrightfast.co/data/v1/applications/config"
        );

        let mut empty_query = ResourceLinkHrefParams::new("applications", 1, "config");
        empty_query.query_string = Some(Map::new());
        assert_eq!(
            domain.resource_link_href(&empty_query).unwrap(),
            "https://api.runrightfast.co/data/v1/applications/config"
        );
    }

    #[test]
    fn test_resource_link_href_substitutes_after_query_encoding() {
        let params = ResourceLinkHrefParams::new("applications", 1, "{id}/children")
            .with_query("parent", "{id}")
            .with_path_variable("id", "42");
        assert_eq!(
            domain(false).resource_link_href(&params).unwrap(),
            "http://api.runrightfast.co/data/v1/applications/42/children?parent=%7Bid%7D"
        );
    }

    #[test]
    fn test_resource_link_href_errors() {
        let domain = domain(false);
        assert!(matches!(
            domain.resource_link_href(&ResourceLinkHrefParams::new("unknown", 1, "{id}")),
            Err(ApiModelError::ResourceNotFoundError { .. })
        ));
        assert!(matches!(
            domain.resource_link_href(&ResourceLinkHrefParams::new("applications", 1, "")),
            Err(ApiModelError::ValidationError { ref field, .. }) if field == "link_path"
        ));
    }

    #[test]
    fn test_mutate_resources() {
        let mut domain = domain(false);

        let err = domain.add_resource(applications(1)).unwrap_err();
        assert!(matches!(err, ApiModelError::AlreadyExistsError { ref key, .. } if key == "applications/1"));

        domain.add_resource(applications(2)).unwrap();
        assert_eq!(domain.resource_names().len(), 2);

        let replaced = domain
            .set_resource(applications(2).with_description("Applications v2"))
            .unwrap();
        assert_eq!(replaced.description(), Some("Applications v2"));

        assert!(domain.remove_resource("applications", 2).is_some());
        assert!(domain.remove_resource("applications", 2).is_none());
        assert!(domain.resource_data_href("applications", 2).is_err());
    }

    #[test]
    fn test_mutate_actions_through_domain() {
        let mut domain = domain(false);
        let resource = domain.resource_mut("applications", 1).unwrap();
        resource
            .add_action(ActionRecord::new("batch", "Batch", HttpMethod::Post).with_path("_batch"))
            .unwrap();
        resource.remove_link("config");

        let resource = domain.resource("applications", 1).unwrap();
        assert_eq!(
            resource.path(HrefType::Data, Some("batch")).unwrap(),
            "/data/v1/applications/_batch"
        );
        assert!(resource.link("config").is_none());
    }
}
