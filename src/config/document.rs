use crate::domain::api_domain::Domain;
use crate::domain::model::{record_from_value, DomainRecord};
use crate::utils::error::{ApiModelError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use std::path::Path;

/// A parsed domain document, ready to be turned into a [`Domain`].
#[derive(Debug, Clone, PartialEq)]
pub struct DomainDocument {
    pub record: DomainRecord,
}

impl DomainDocument {
    /// `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading domain document from {}", path.display());
        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;
        let record: DomainRecord = toml::from_str(&processed_content)?;
        Ok(Self { record })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;
        let record: DomainRecord = serde_json::from_str(&processed_content)?;
        Ok(Self { record })
    }

    /// For documents that arrive as already-parsed JSON. No env var expansion.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let record: DomainRecord = record_from_value("domain", value)?;
        Ok(Self { record })
    }

    /// Validates and indexes the document.
    pub fn into_domain(self) -> Result<Domain> {
        Domain::new(self.record)
    }
}

impl Validate for DomainDocument {
    fn validate(&self) -> Result<()> {
        self.record.validate()
    }
}

/// Expands `${VAR}` references; undefined variables are left untouched.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ApiModelError::DocumentError {
        message: format!("Invalid env var pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
