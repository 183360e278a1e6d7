//! Configuration module for Sumi-Glean
//!
//! Configuration is layered: built-in defaults, then an optional TOML file, then
//! explicit command line flags.
//!
//! # Example
//!
//! ```no_run
//! use sumi_glean::config::{build_config, ConfigOverrides};
//! use std::path::Path;
//!
//! let config = build_config(Some(Path::new("glean.toml")), ConfigOverrides::default()).unwrap();
//! println!("Crawler will use max depth: {}", config.max_exploration_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConfigFile, ConfigOverrides, CrawlSection, OutputSection, Protocol, DEFAULT_DOMAIN,
    DEFAULT_OUTPUT_FOLDER, DEFAULT_TAGS,
};
pub use validation::{validate, MAX_CONCURRENCY};

// Re-export parser functions
pub use parser::{build_config, load_config_file};
