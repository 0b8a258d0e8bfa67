pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::document::DomainDocument;
pub use domain::action::ResourceAction;
pub use domain::api_domain::{Domain, ResourceHrefParams, ResourceLinkHrefParams};
pub use domain::link::ResourceLink;
pub use domain::model::{
    ActionRecord, DomainRecord, HrefType, HttpMethod, LinkRecord, ResourceRecord,
};
pub use domain::resource::{Resource, ResourceKey};
pub use domain::shape::ObjectShapeReference;
pub use utils::error::{ApiModelError, Result};
