use crate::config::types::{Config, Protocol};
use crate::crawler::TagSelector;
use crate::ConfigError;

/// Upper bound on concurrently fetched pages
pub const MAX_CONCURRENCY: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_domain(&config.domain, config.protocol)?;
    validate_tags(&config.tags)?;
    validate_limits(config)?;

    if config.output_folder_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output folder path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the crawl domain
///
/// The domain is used both to build the seed URL and as a substring filter, so
/// it may carry a port (`localhost:8080`) but no scheme, path or whitespace.
/// The protocol's default port is refused: URL parsing drops it from every
/// discovered link, which would then never contain the domain.
fn validate_domain(domain: &str, protocol: Protocol) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "domain cannot be empty".to_string(),
        ));
    }

    if domain.contains("://") {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' must not include a scheme; use --protocol instead",
            domain
        )));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' cannot contain consecutive dots",
            domain
        )));
    }

    let default_port = match protocol {
        Protocol::Http => ":80",
        Protocol::Https => ":443",
    };
    if domain.ends_with(default_port) {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' names the default {} port; drop '{}'",
            domain, protocol, default_port
        )));
    }

    Ok(())
}

/// Validates the tag list by compiling it
fn validate_tags(tags: &str) -> Result<(), ConfigError> {
    TagSelector::parse(tags).map(|_| ())
}

fn validate_limits(config: &Config) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request timeout must be >= 1s, got {}s",
            config.request_timeout_secs
        )));
    }

    Ok(())
}
