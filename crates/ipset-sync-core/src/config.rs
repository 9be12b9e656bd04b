//! Configuration types for the IP set sync system
//!
//! A [`SyncConfig`] is built explicitly for every invocation. Plugin
//! selection lives in [`ProviderConfig`] and [`ResolverConfig`], which are
//! built once per process.

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Log level used when none (or an unrecognized one) is configured
pub const DEFAULT_LOG_LEVEL: Level = Level::ERROR;

/// Per-invocation sync configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Domain names to resolve, in processing order
    pub domains: Vec<String>,

    /// Target IP set
    pub ip_set: IpSetRef,
}

impl SyncConfig {
    /// Create a configuration from already-split domain names
    ///
    /// Entries are trimmed and empty entries dropped.
    pub fn new<I, S>(domains: I, ip_set: IpSetRef) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            ip_set,
        }
    }

    /// Create a configuration from a comma-separated domain list
    pub fn from_domain_list(raw: &str, ip_set: IpSetRef) -> Self {
        Self::new(parse_domain_list(raw), ip_set)
    }

    /// Validate the configuration
    ///
    /// Any error returned here is a `Config` error, which the engine treats
    /// as a handled abort rather than a failed invocation.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domains.is_empty() {
            return Err(crate::Error::config(
                "Domain list is empty, please fill in a list of domains separated by commas to look up IPs",
            ));
        }

        if self.domains.iter().any(|d| d.trim().is_empty()) {
            return Err(crate::Error::config(format!(
                "Domain list contains a blank entry: [{}]",
                self.domains.join(",")
            )));
        }

        self.ip_set.validate()
    }
}

/// Reference to a remote IP set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpSetRef {
    /// Human-readable IP set name
    pub name: String,

    /// Opaque IP set id
    pub id: String,
}

impl IpSetRef {
    pub fn new(name: impl AsRef<str>, id: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            id: id.as_ref().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.trim().is_empty() || self.id.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "Missing IP set name and/or id, current values: [{}], [{}]",
                self.name, self.id
            )));
        }
        Ok(())
    }
}

/// Whether the provider writes to the IP set or only reports what it would write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    #[default]
    Live,
    DryRun,
}

impl SyncMode {
    /// Parse a mode name; anything other than `dry-run` is live
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dry-run" | "dryrun" | "dry_run" => SyncMode::DryRun,
            _ => SyncMode::Live,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, SyncMode::DryRun)
    }
}

/// IP set provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// AWS WAFv2 provider
    Wafv2 {
        /// Region override (falls back to the SDK's environment chain)
        region: Option<String>,
        /// Live or dry-run
        #[serde(default)]
        mode: SyncMode,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Wafv2 { region, .. } => {
                if region.as_ref().is_some_and(|r| r.trim().is_empty()) {
                    return Err(crate::Error::config("WAFv2 region cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Wafv2 { .. } => "wafv2",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Wafv2 {
            region: None,
            mode: SyncMode::Live,
        }
    }
}

/// Host resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// Operating system resolver (getaddrinfo)
    #[default]
    System,

    /// Hickory DNS stub resolver using the system's resolv.conf
    Hickory,

    /// Custom resolver
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ResolverConfig {
    /// Parse a resolver name as given in the environment
    pub fn parse(value: &str) -> Result<Self, crate::Error> {
        match value.trim().to_lowercase().as_str() {
            "" | "system" => Ok(ResolverConfig::System),
            "hickory" => Ok(ResolverConfig::Hickory),
            other => Err(crate::Error::config(format!(
                "Resolver '{}' is not supported. Supported resolvers: system, hickory",
                other
            ))),
        }
    }

    /// Get the resolver type name
    pub fn type_name(&self) -> &str {
        match self {
            ResolverConfig::System => "system",
            ResolverConfig::Hickory => "hickory",
            ResolverConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Split a comma-separated domain list, trimming entries and dropping empty ones
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Map a log level name to a tracing level
///
/// Accepts the usual names case-insensitively, plus `warning` and
/// `critical`. Unset, empty or unknown values give [`DEFAULT_LOG_LEVEL`].
pub fn parse_log_level(value: Option<&str>) -> Level {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") | Some("critical") => Level::ERROR,
        _ => DEFAULT_LOG_LEVEL,
    }
}
