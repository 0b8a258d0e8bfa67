use crate::domain::model::HrefType;
use crate::utils::error::{ApiModelError, Result};
use clap::Parser;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Parser)]
#[command(name = "rest-api-model")]
#[command(about = "Validate a REST API domain document and derive resource hrefs")]
pub struct CliConfig {
    /// Path to the domain document (TOML, or JSON with a .json extension)
    #[arg(short, long, default_value = "domain.toml")]
    pub config: String,

    /// Resource name; without it every resource is listed
    #[arg(short, long)]
    pub resource: Option<String>,

    #[arg(long, default_value = "1")]
    pub version: u32,

    #[arg(long, default_value = "data", value_parser = parse_href_type)]
    pub href_type: HrefType,

    /// Print the path of this action instead of the resource href
    #[arg(long)]
    pub action: Option<String>,

    /// Build a link href below the resource data href
    #[arg(long)]
    pub link_path: Option<String>,

    /// Query string parameter, key=value (repeatable)
    #[arg(long = "query", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,

    /// Path variable substitution, name=value (repeatable)
    #[arg(long = "path-var", value_parser = parse_key_value)]
    pub path_vars: Vec<(String, String)>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn query_string(&self) -> Option<Map<String, Value>> {
        if self.query.is_empty() {
            return None;
        }
        Some(
            self.query
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    pub fn path_variables(&self) -> Option<BTreeMap<String, String>> {
        if self.path_vars.is_empty() {
            return None;
        }
        Some(self.path_vars.iter().cloned().collect())
    }
}

fn parse_href_type(value: &str) -> std::result::Result<HrefType, String> {
    value.parse::<HrefType>().map_err(|e| e.to_string())
}

fn parse_key_value(value: &str) -> std::result::Result<(String, String), String> {
    split_key_value(value).map_err(|e| e.to_string())
}

fn split_key_value(value: &str) -> Result<(String, String)> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(ApiModelError::validation(
            "key=value",
            value,
            "Expected a non-empty key followed by '='",
        )),
    }
}
