use crate::core::href::resource_path;
use crate::domain::action::ResourceAction;
use crate::domain::link::ResourceLink;
use crate::domain::model::{ActionRecord, HrefType, LinkRecord, ResourceRecord};
use crate::domain::shape::ObjectShapeReference;
use crate::utils::error::{ApiModelError, Result};
use crate::utils::validation::{duplicate_keys, prefix_field, Validate};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity of a resource within a domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceKey {
    pub name: String,
    pub version: u32,
}

impl ResourceKey {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// A named, versioned collection of actions and links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    name: String,
    version: u32,
    object_shape: ObjectShapeReference,
    description: Option<String>,
    tags: BTreeSet<String>,
    actions: BTreeMap<String, ResourceAction>,
    links: BTreeMap<String, ResourceLink>,
}

impl Resource {
    /// Validates the record and indexes its actions by name and links by rel.
    pub fn new(record: ResourceRecord) -> Result<Self> {
        record.validate()?;

        let duplicate_actions = duplicate_keys(record.actions.iter().map(|a| a.name.as_str()));
        if !duplicate_actions.is_empty() {
            return Err(ApiModelError::DuplicateKeyError {
                entity: "action".to_string(),
                keys: duplicate_actions,
            });
        }

        let duplicate_links = duplicate_keys(record.links.iter().map(|l| l.rel.as_str()));
        if !duplicate_links.is_empty() {
            return Err(ApiModelError::DuplicateKeyError {
                entity: "link".to_string(),
                keys: duplicate_links,
            });
        }

        let mut actions = BTreeMap::new();
        for (index, action) in record.actions.into_iter().enumerate() {
            let action = ResourceAction::new(action)
                .map_err(|e| prefix_field(e, &format!("actions[{}]", index)))?;
            actions.insert(action.name().to_string(), action);
        }

        let mut links = BTreeMap::new();
        for (index, link) in record.links.into_iter().enumerate() {
            let link = ResourceLink::new(link)
                .map_err(|e| prefix_field(e, &format!("links[{}]", index)))?;
            links.insert(link.rel().to_string(), link);
        }

        tracing::debug!(
            "Indexed resource {}/{} with {} actions and {} links",
            record.name,
            record.version,
            actions.len(),
            links.len()
        );

        Ok(Self {
            name: record.name,
            version: record.version,
            object_shape: record.object_shape,
            description: record.description,
            tags: record.tags.into_iter().collect(),
            actions,
            links,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.name.clone(), self.version)
    }

    pub fn object_shape(&self) -> &ObjectShapeReference {
        &self.object_shape
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn actions(&self) -> impl Iterator<Item = &ResourceAction> {
        self.actions.values()
    }

    pub fn links(&self) -> impl Iterator<Item = &ResourceLink> {
        self.links.values()
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    pub fn link_rels(&self) -> Vec<&str> {
        self.links.keys().map(String::as_str).collect()
    }

    /// Returns the action, or `None` when no action has that name.
    pub fn action(&self, name: &str) -> Option<&ResourceAction> {
        self.actions.get(name)
    }

    pub fn add_action(&mut self, record: ActionRecord) -> Result<&ResourceAction> {
        let action = ResourceAction::new(record)?;
        let key = self.key();
        match self.actions.entry(action.name().to_string()) {
            Entry::Occupied(entry) => Err(ApiModelError::AlreadyExistsError {
                entity: "action".to_string(),
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!("Adding action '{}' to {}", entry.key(), key);
                Ok(entry.insert(action))
            }
        }
    }

    /// Removing an unknown action is a no-op.
    pub fn remove_action(&mut self, name: &str) -> Option<ResourceAction> {
        let removed = self.actions.remove(name);
        if removed.is_some() {
            tracing::debug!("Removed action '{}' from {}", name, self.key());
        }
        removed
    }

    /// Inserts the action, replacing any action with the same name.
    pub fn set_action(&mut self, record: ActionRecord) -> Result<&ResourceAction> {
        let action = ResourceAction::new(record)?;
        let key = self.key();
        match self.actions.entry(action.name().to_string()) {
            Entry::Occupied(mut entry) => {
                tracing::warn!("Replacing action '{}' on {}", entry.key(), key);
                entry.insert(action);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(action)),
        }
    }

    /// Returns the link, or `None` when no link has that rel.
    pub fn link(&self, rel: &str) -> Option<&ResourceLink> {
        self.links.get(rel)
    }

    pub fn add_link(&mut self, record: LinkRecord) -> Result<&ResourceLink> {
        let link = ResourceLink::new(record)?;
        let key = self.key();
        match self.links.entry(link.rel().to_string()) {
            Entry::Occupied(entry) => Err(ApiModelError::AlreadyExistsError {
                entity: "link".to_string(),
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!("Adding link '{}' to {}", entry.key(), key);
                Ok(entry.insert(link))
            }
        }
    }

    /// Removing an unknown link is a no-op.
    pub fn remove_link(&mut self, rel: &str) -> Option<ResourceLink> {
        let removed = self.links.remove(rel);
        if removed.is_some() {
            tracing::debug!("Removed link '{}' from {}", rel, self.key());
        }
        removed
    }

    /// Inserts the link, replacing any link with the same rel.
    pub fn set_link(&mut self, record: LinkRecord) -> Result<&ResourceLink> {
        let link = ResourceLink::new(record)?;
        let key = self.key();
        match self.links.entry(link.rel().to_string()) {
            Entry::Occupied(mut entry) => {
                tracing::warn!("Replacing link '{}' on {}", entry.key(), key);
                entry.insert(link);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(link)),
        }
    }

    /// `/{href_type}/v{version}/{name}`, followed by the action sub-path when
    /// an action is given.
    pub fn path(&self, href_type: HrefType, action: Option<&str>) -> Result<String> {
        let mut path = resource_path(href_type, self.version, &self.name);
        if let Some(name) = action {
            let action = self
                .action(name)
                .ok_or_else(|| ApiModelError::UnknownActionError {
                    action: name.to_string(),
                })?;
            path.push_str(action.path());
        }
        Ok(path)
    }
}

impl TryFrom<ResourceRecord> for Resource {
    type Error = ApiModelError;

    fn try_from(record: ResourceRecord) -> Result<Self> {
        Self::new(record)
    }
}
