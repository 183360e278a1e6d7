use crate::config::types::{Config, ConfigFile, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The file only needs to contain the keys it wants to change; it is not
/// validated on its own because command line overrides may still apply.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_glean::config::load_config_file;
///
/// let file = load_config_file(Path::new("glean.toml")).unwrap();
/// println!("Domain: {:?}", file.crawl.domain);
/// ```
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;
    Ok(file)
}

/// Builds the effective configuration for a run
///
/// Layers, lowest precedence first:
/// 1. Built-in defaults
/// 2. The TOML file at `path`, if one is given
/// 3. Command line overrides
///
/// The result is normalized and validated.
pub fn build_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(path) = path {
        config.apply_file(load_config_file(path)?);
    }

    config.apply_overrides(overrides);
    config.normalize();

    validate(&config)?;

    Ok(config)
}
