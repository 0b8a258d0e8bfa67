use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiModelError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Document error: {message}")]
    DocumentError { message: String },

    #[error("Validation error on '{field}' (value: '{value}'): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{entity} keys must be unique - duplicates: {}", .keys.join(", "))]
    DuplicateKeyError { entity: String, keys: Vec<String> },

    #[error("{entity} already exists: {key}")]
    AlreadyExistsError { entity: String, key: String },

    #[error("resource not found: {name}/{version}")]
    ResourceNotFoundError { name: String, version: u32 },

    #[error("invalid action: {action}")]
    UnknownActionError { action: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Document,
    Validation,
    Integrity,
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ApiModelError {
    pub fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        ApiModelError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiModelError::IoError(_) => ErrorCategory::Io,
            ApiModelError::SerializationError(_)
            | ApiModelError::TomlError(_)
            | ApiModelError::DocumentError { .. } => ErrorCategory::Document,
            ApiModelError::ValidationError { .. } => ErrorCategory::Validation,
            ApiModelError::DuplicateKeyError { .. } | ApiModelError::AlreadyExistsError { .. } => {
                ErrorCategory::Integrity
            }
            ApiModelError::ResourceNotFoundError { .. } | ApiModelError::UnknownActionError { .. } => {
                ErrorCategory::Lookup
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Integrity | ErrorCategory::Document => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ApiModelError::IoError(_) => {
                "Check that the document path exists and is readable".to_string()
            }
            ApiModelError::SerializationError(_) => "Check the JSON document syntax".to_string(),
            ApiModelError::TomlError(_) => "Check the TOML document syntax".to_string(),
            ApiModelError::DocumentError { .. } => {
                "Make sure the document is valid TOML or JSON".to_string()
            }
            ApiModelError::ValidationError { field, .. } => {
                format!("Fix the value of '{}' in the domain document", field)
            }
            ApiModelError::DuplicateKeyError { entity, .. } => {
                format!("Remove or rename the duplicated {} entries", entity)
            }
            ApiModelError::AlreadyExistsError { entity, .. } => {
                format!("Use set_{} to replace an existing entry", entity)
            }
            ApiModelError::ResourceNotFoundError { .. } => {
                "List the declared resources and check the name and version".to_string()
            }
            ApiModelError::UnknownActionError { .. } => {
                "Declare the action on the resource before deriving its path".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Unable to read the domain document: {}", self),
            ErrorCategory::Document => format!("The domain document could not be parsed: {}", self),
            ErrorCategory::Validation => format!("The domain declaration is invalid: {}", self),
            ErrorCategory::Integrity => format!("The domain declaration is inconsistent: {}", self),
            ErrorCategory::Lookup => format!("Lookup failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message_lists_every_key() {
        let err = ApiModelError::DuplicateKeyError {
            entity: "action".to_string(),
            keys: vec!["create".to_string(), "delete".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "action keys must be unique - duplicates: create, delete"
        );
        assert_eq!(err.category(), ErrorCategory::Integrity);
    }

    #[test]
    fn test_severity_by_category() {
        let not_found = ApiModelError::ResourceNotFoundError {
            name: "applications".to_string(),
            version: 2,
        };
        assert_eq!(not_found.severity(), ErrorSeverity::Medium);
        assert!(not_found.user_friendly_message().contains("applications/2"));

        let invalid = ApiModelError::validation("resource.version", 0, "Value must be at least 1");
        assert_eq!(invalid.severity(), ErrorSeverity::High);
        assert!(invalid.recovery_suggestion().contains("resource.version"));
    }
}
