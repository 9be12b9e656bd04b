//! Environment configuration
//!
//! Process-level settings (`LOG_LEVEL`, `IPSET_SYNC_MODE`,
//! `IPSET_SYNC_RESOLVER`) are read once at cold start. The sync target
//! (`DOMAIN_NAMES`, `WAF_IP_SET_ID`, `WAF_IP_SET_NAME`) is read again on
//! every invocation.

use anyhow::Result;
use ipset_sync_core::config::{
    IpSetRef, ProviderConfig, ResolverConfig, SyncConfig, SyncMode, parse_log_level,
};
use tracing::Level;

pub const DOMAIN_NAMES: &str = "DOMAIN_NAMES";
pub const WAF_IP_SET_ID: &str = "WAF_IP_SET_ID";
pub const WAF_IP_SET_NAME: &str = "WAF_IP_SET_NAME";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const MODE: &str = "IPSET_SYNC_MODE";
pub const RESOLVER: &str = "IPSET_SYNC_RESOLVER";

/// Set by the Lambda service in every function sandbox
pub const LAMBDA_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";

/// Process-level configuration
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_level: Level,
    pub provider: ProviderConfig,
    pub resolver: ResolverConfig,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mode = lookup(MODE).map(|m| SyncMode::parse(&m)).unwrap_or_default();
        let resolver = ResolverConfig::parse(&lookup(RESOLVER).unwrap_or_default())?;

        Ok(Self {
            log_level: parse_log_level(lookup(LOG_LEVEL).as_deref()),
            provider: ProviderConfig::Wafv2 { region: None, mode },
            resolver,
        })
    }
}

/// Build the per-invocation sync configuration from environment variables
pub fn sync_config_from_env() -> SyncConfig {
    sync_config_from_lookup(process_env)
}

/// Build the per-invocation sync configuration through an arbitrary lookup
///
/// Unset variables are treated as empty, so they surface as a handled
/// validation failure in the engine rather than a startup crash.
pub fn sync_config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SyncConfig {
    let ip_set = IpSetRef::new(
        lookup(WAF_IP_SET_NAME).unwrap_or_default(),
        lookup(WAF_IP_SET_ID).unwrap_or_default(),
    );
    SyncConfig::from_domain_list(&lookup(DOMAIN_NAMES).unwrap_or_default(), ip_set)
}

/// Whether the process runs inside the Lambda service
pub fn running_in_lambda() -> bool {
    process_env(LAMBDA_RUNTIME_API).is_some()
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
