use crate::core::href::normalize_path;
use crate::domain::model::{ActionRecord, HttpMethod};
use crate::domain::shape::ObjectShapeReference;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::Serialize;

/// One HTTP operation available on a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceAction {
    name: String,
    title: String,
    method: HttpMethod,
    path: String,
    auth: Vec<String>,
    request_query_shape: Option<ObjectShapeReference>,
    request_payload_shape: Option<ObjectShapeReference>,
    response_shape: Option<ObjectShapeReference>,
}

impl ResourceAction {
    pub fn new(record: ActionRecord) -> Result<Self> {
        record.validate()?;

        let path = record.path.as_deref().map(normalize_path).unwrap_or_default();

        Ok(Self {
            name: record.name,
            title: record.title,
            method: record.method,
            path,
            auth: record.auth,
            request_query_shape: record.request_query_shape,
            request_payload_shape: record.request_payload_shape,
            response_shape: record.response_shape,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Sub-path below the resource path; empty or starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn auth(&self) -> &[String] {
        &self.auth
    }

    pub fn request_query_shape(&self) -> Option<&ObjectShapeReference> {
        self.request_query_shape.as_ref()
    }

    pub fn request_payload_shape(&self) -> Option<&ObjectShapeReference> {
        self.request_payload_shape.as_ref()
    }

    pub fn response_shape(&self) -> Option<&ObjectShapeReference> {
        self.response_shape.as_ref()
    }
}

impl TryFrom<ActionRecord> for ResourceAction {
    type Error = crate::utils::error::ApiModelError;

    fn try_from(record: ActionRecord) -> Result<Self> {
        Self::new(record)
    }
}
