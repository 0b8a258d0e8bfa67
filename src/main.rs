use clap::Parser;
use rest_api_model::utils::error::ErrorSeverity;
use rest_api_model::utils::logger;
use rest_api_model::{
    ApiModelError, CliConfig, Domain, DomainDocument, ResourceHrefParams, ResourceLinkHrefParams,
};

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("📁 Loading domain document from: {}", config.config);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(config: &CliConfig) -> Result<(), ApiModelError> {
    let domain = DomainDocument::from_file(&config.config)?.into_domain()?;
    tracing::info!(
        "✅ Domain '{}' loaded with {} resources",
        domain.name(),
        domain.resource_names().len()
    );

    match &config.resource {
        None => list_resources(&domain),
        Some(name) => {
            println!("{}", derive_href(&domain, config, name)?);
            Ok(())
        }
    }
}

fn list_resources(domain: &Domain) -> Result<(), ApiModelError> {
    for key in domain.resource_names() {
        let href = domain.resource_data_href(&key.name, key.version)?;
        println!("{}\t{}", key, href);
    }
    Ok(())
}

fn derive_href(domain: &Domain, config: &CliConfig, name: &str) -> Result<String, ApiModelError> {
    if let Some(link_path) = &config.link_path {
        let params = ResourceLinkHrefParams {
            name: name.to_string(),
            version: config.version,
            link_path: link_path.clone(),
            query_string: config.query_string(),
            path_variables: config.path_variables(),
        };
        return domain.resource_link_href(&params);
    }

    if let Some(action) = &config.action {
        let resource = domain.resource(name, config.version).ok_or_else(|| {
            ApiModelError::ResourceNotFoundError {
                name: name.to_string(),
                version: config.version,
            }
        })?;
        let path = resource.path(config.href_type, Some(action.as_str()))?;
        return Ok(format!("{}{}", domain.base_url(), path));
    }

    domain.resource_href(
        &ResourceHrefParams::new(name, config.version).with_href_type(config.href_type),
    )
}
