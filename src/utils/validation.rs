use crate::utils::error::{ApiModelError, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Structural validation of a declarative record.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiModelError::validation(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(ApiModelError::validation(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_pattern(field_name: &str, value: &str, pattern: &Regex) -> Result<()> {
    if !pattern.is_match(value) {
        return Err(ApiModelError::validation(
            field_name,
            value,
            format!("Value must match pattern {}", pattern.as_str()),
        ));
    }
    Ok(())
}

/// Validates every record of a list, prefixing the field with its index
/// (e.g. `actions[1].name`).
pub fn validate_each<T: Validate>(field_name: &str, records: &[T]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        record.validate().map_err(|e| prefix_field(e, &format!("{}[{}]", field_name, index)))?;
    }
    Ok(())
}

pub fn prefix_field(error: ApiModelError, prefix: &str) -> ApiModelError {
    match error {
        ApiModelError::ValidationError {
            field,
            value,
            reason,
        } => ApiModelError::ValidationError {
            field: format!("{}.{}", prefix, field),
            value,
            reason,
        },
        other => other,
    }
}

/// Keys that occur more than once, in sorted order.
pub fn duplicate_keys<I, K>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = K>,
    K: ToString,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect()
}
