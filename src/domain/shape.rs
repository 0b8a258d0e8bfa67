use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_pattern, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const NAMESPACE_PATTERN: &str = r"^ns://.+";
const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+$";

fn namespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAMESPACE_PATTERN).expect("namespace pattern is valid"))
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// Points at an externally defined payload/response shape without embedding it.
///
/// `namespace` looks like `ns://runrightfast.co/applications` and `version`
/// is a semantic version (`1.0.0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectShapeReference {
    pub namespace: String,
    pub version: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ObjectShapeReference {
    pub fn new(
        namespace: impl Into<String>,
        version: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Result<Self> {
        let shape = Self {
            namespace: namespace.into(),
            version: version.into(),
            type_name: type_name.into(),
        };
        shape.validate()?;
        Ok(shape)
    }
}

impl Validate for ObjectShapeReference {
    fn validate(&self) -> Result<()> {
        validate_pattern("namespace", &self.namespace, namespace_regex())?;
        validate_pattern("version", &self.version, version_regex())?;
        validate_non_empty_string("type", &self.type_name)
    }
}

impl fmt::Display for ObjectShapeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.namespace, self.type_name, self.version)
    }
}
