use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Domain crawled when none is configured
pub const DEFAULT_DOMAIN: &str = "go-colly.org";

/// Elements whose text is harvested when no tag list is configured
pub const DEFAULT_TAGS: &str = "h1, h2, h3, h4, h5, h6, p, ul, ol, li, a, span, pre, em, figcaption";

/// Directory the JSON output is written to by default
pub const DEFAULT_OUTPUT_FOLDER: &str = "./outputs";

pub const DEFAULT_MAX_EXPLORATION_DEPTH: u32 = 5;
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// URI scheme used to build the seed URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = crate::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(crate::ConfigError::InvalidProtocol(other.to_string())),
        }
    }
}

/// Resolved configuration for one crawl run
#[derive(Debug, Clone)]
pub struct Config {
    /// Domain the crawl is restricted to (lowercase, may carry a port)
    pub domain: String,

    /// Scheme of the seed URL
    pub protocol: Protocol,

    /// Maximum link depth explored from the seed (the seed itself is depth 0)
    pub max_exploration_depth: u32,

    /// Comma separated CSS selector list of the elements to harvest
    pub tags: String,

    /// Directory the JSON output file is written to
    pub output_folder_path: PathBuf,

    /// Maximum number of pages fetched at the same time
    pub concurrency: usize,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            protocol: Protocol::default(),
            max_exploration_depth: DEFAULT_MAX_EXPLORATION_DEPTH,
            tags: DEFAULT_TAGS.to_string(),
            output_folder_path: PathBuf::from(DEFAULT_OUTPUT_FOLDER),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Partial configuration as read from a TOML file
///
/// Every key is optional; missing keys keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub crawl: CrawlSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// `[crawl]` table of the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlSection {
    pub domain: Option<String>,

    pub protocol: Option<Protocol>,

    #[serde(rename = "max-exploration-depth")]
    pub max_exploration_depth: Option<u32>,

    pub tags: Option<String>,

    pub concurrency: Option<usize>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout_secs: Option<u64>,
}

/// `[output]` table of the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(rename = "folder-path")]
    pub folder_path: Option<PathBuf>,
}

/// Values given explicitly on the command line
///
/// These win over both the configuration file and the defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub domain: Option<String>,
    pub protocol: Option<Protocol>,
    pub max_exploration_depth: Option<u32>,
    pub tags: Option<String>,
    pub output_folder_path: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Applies the values present in a configuration file
    pub fn apply_file(&mut self, file: ConfigFile) {
        let crawl = file.crawl;
        if let Some(domain) = crawl.domain {
            self.domain = domain;
        }
        if let Some(protocol) = crawl.protocol {
            self.protocol = protocol;
        }
        if let Some(depth) = crawl.max_exploration_depth {
            self.max_exploration_depth = depth;
        }
        if let Some(tags) = crawl.tags {
            self.tags = tags;
        }
        if let Some(concurrency) = crawl.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(timeout) = crawl.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(path) = file.output.folder_path {
            self.output_folder_path = path;
        }
    }

    /// Applies command line overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(domain) = overrides.domain {
            self.domain = domain;
        }
        if let Some(protocol) = overrides.protocol {
            self.protocol = protocol;
        }
        if let Some(depth) = overrides.max_exploration_depth {
            self.max_exploration_depth = depth;
        }
        if let Some(tags) = overrides.tags {
            self.tags = tags;
        }
        if let Some(path) = overrides.output_folder_path {
            self.output_folder_path = path;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    /// Trims and lowercases the domain so it compares against canonical URLs
    pub fn normalize(&mut self) {
        self.domain = self.domain.trim().to_lowercase();
        self.tags = self.tags.trim().to_string();
    }

    /// Returns the seed URL of the crawl
    pub fn base_url(&self) -> String {
        crate::url::base_url(self.protocol, &self.domain)
    }
}
