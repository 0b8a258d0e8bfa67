use crate::domain::model::LinkRecord;
use crate::domain::shape::ObjectShapeReference;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::Serialize;

/// A hyperlink relation exposed by a resource, keyed by `rel`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceLink {
    href: String,
    rel: String,
    title: String,
    auth: Vec<String>,
    query_shape: Option<ObjectShapeReference>,
}

impl ResourceLink {
    pub fn new(record: LinkRecord) -> Result<Self> {
        record.validate()?;

        Ok(Self {
            href: record.href,
            rel: record.rel,
            title: record.title,
            auth: record.auth,
            query_shape: record.query_shape,
        })
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn auth(&self) -> &[String] {
        &self.auth
    }

    pub fn query_shape(&self) -> Option<&ObjectShapeReference> {
        self.query_shape.as_ref()
    }
}

impl TryFrom<LinkRecord> for ResourceLink {
    type Error = crate::utils::error::ApiModelError;

    fn try_from(record: LinkRecord) -> Result<Self> {
        Self::new(record)
    }
}
