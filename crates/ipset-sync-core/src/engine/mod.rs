//! Core sync engine
//!
//! The SyncEngine runs one invocation of the pipeline:
//! - Validating the per-invocation configuration
//! - Resolving every domain via HostResolver
//! - Formatting each address as a `/32` entry
//! - Reading the IP set's lock token via IpSetProvider
//! - Replacing the IP set's contents with the new list
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌────────────────┐   ┌────────────────────┐
//! │ SyncConfig │──▶│ HostResolver │──▶│ Vec<HostCidr>  │──▶│ IpSetProvider      │
//! │ (validate) │   │ (per domain) │   │ (no dedup)     │   │ token → replace    │
//! └────────────┘   └──────────────┘   └────────────────┘   └────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! 1. Invalid configuration → logged, `SyncOutcome::Skipped`, no external calls
//! 2. Any resolution failure → error, no token fetch, no write
//! 3. Token fetch or write failure → error, remote set unchanged
//!
//! Nothing is retried.

use crate::address::HostCidr;
use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::traits::{HostResolver, IpSetProvider, UpdateResult};
use tracing::{debug, error, info};

/// Result of a single invocation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The IP set was replaced (or the replace was dry-run)
    Updated {
        ip_set_name: String,
        addresses: Vec<HostCidr>,
        result: UpdateResult,
    },

    /// Configuration was invalid; nothing was resolved or written
    Skipped { reason: String },
}

impl SyncOutcome {
    /// Human-readable confirmation returned to the caller
    pub fn message(&self) -> String {
        match self {
            SyncOutcome::Updated { ip_set_name, .. } => {
                format!("Succeeded updating IP Set [{}]", ip_set_name)
            }
            SyncOutcome::Skipped { reason } => format!("Skipped updating IP Set: {}", reason),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SyncOutcome::Skipped { .. })
    }
}

/// Core sync engine
///
/// Holds the resolver and provider for the lifetime of the process; the
/// configuration is passed to every [`SyncEngine::run_once`] call.
///
/// ## Threading
///
/// All work in an invocation is awaited sequentially. Domains are resolved
/// one after another, and the write waits on the token read.
pub struct SyncEngine {
    /// Resolver for domain lookups
    resolver: Box<dyn HostResolver>,

    /// Provider for the remote IP set
    provider: Box<dyn IpSetProvider>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(resolver: Box<dyn HostResolver>, provider: Box<dyn IpSetProvider>) -> Self {
        Self { resolver, provider }
    }

    /// Run one invocation
    ///
    /// # Returns
    ///
    /// - `Ok(SyncOutcome::Updated)`: The IP set now holds the resolved list
    /// - `Ok(SyncOutcome::Skipped)`: Configuration was invalid (already logged)
    /// - `Err(Error)`: Resolution or provider failure
    pub async fn run_once(&self, config: &SyncConfig) -> Result<SyncOutcome> {
        if let Err(e) = config.validate() {
            if !e.is_config() {
                return Err(e);
            }
            error!("{}", e);
            return Ok(SyncOutcome::Skipped {
                reason: e.to_string(),
            });
        }

        debug!(
            "Domains for which a lookup is going to be done: [{}]",
            config.domains.join(" ")
        );
        debug!("IP set name is [{}]", config.ip_set.name);

        let addresses = self.resolve_all(&config.domains).await?;

        let token = self.provider.get_lock_token(&config.ip_set).await?;
        info!(
            "Got lock token for IP set \"{}\" from {}: {}",
            config.ip_set.name,
            self.provider.provider_name(),
            token
        );

        let result = self
            .provider
            .update_addresses(&config.ip_set, &addresses, &token)
            .await?;

        match result {
            UpdateResult::Replaced { address_count } => {
                info!(
                    "Updated IP set \"{}\" with {} CIDRs",
                    config.ip_set.name, address_count
                );
            }
            UpdateResult::DryRun { address_count } => {
                info!(
                    "[DRY-RUN] IP set \"{}\" left unchanged, would have written {} CIDRs",
                    config.ip_set.name, address_count
                );
            }
        }

        Ok(SyncOutcome::Updated {
            ip_set_name: config.ip_set.name.clone(),
            addresses,
            result,
        })
    }

    /// Resolve every domain in order, stopping at the first failure
    async fn resolve_all(&self, domains: &[String]) -> Result<Vec<HostCidr>> {
        let mut cidrs = Vec::new();

        for domain in domains.iter().map(|d| d.trim()) {
            debug!("Resolving [{}] via {}", domain, self.resolver.resolver_name());
            let addrs = self.resolver.lookup_ipv4(domain).await?;

            if addrs.is_empty() {
                return Err(Error::resolve(domain, "no IPv4 addresses found"));
            }

            for addr in addrs {
                debug!("IP address found [{}]", addr);
                cidrs.push(HostCidr::new(addr));
            }
        }

        Ok(cidrs)
    }
}
