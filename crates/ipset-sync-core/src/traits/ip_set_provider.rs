// # IP Set Provider Trait
//
// Defines the interface for replacing the contents of a remote IP set under
// optimistic concurrency control.
//
// ## Implementations
//
// - AWS WAFv2: `ipset-sync-provider-wafv2` crate
//
// ## Protocol
//
// Writing is a two-step exchange:
//
// 1. `get_lock_token()` reads the IP set and returns its current lock token
// 2. `update_addresses()` replaces the full address list, presenting that token
//
// If anything else modifies the IP set between the two steps, the token is
// stale and the write fails with `Error::StaleLockToken`. Nobody retries it;
// the next scheduled invocation reads a fresh token.

use crate::address::HostCidr;
use crate::config::IpSetRef;
use async_trait::async_trait;
use std::fmt;

/// Opaque version marker of a remote IP set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockToken(String);

impl LockToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of an IP set replace operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// The IP set now holds exactly the given addresses
    Replaced {
        /// Number of CIDRs written
        address_count: usize,
    },
    /// Dry-run: the write was logged but not sent
    DryRun {
        /// Number of CIDRs that would have been written
        address_count: usize,
    },
}

impl UpdateResult {
    pub fn address_count(&self) -> usize {
        match self {
            UpdateResult::Replaced { address_count } | UpdateResult::DryRun { address_count } => {
                *address_count
            }
        }
    }
}

/// Trait for IP set provider implementations
///
/// Providers are isolated and single-shot: each method performs one API
/// call, holds no state between calls, and never retries. The engine owns
/// ordering.
#[async_trait]
pub trait IpSetProvider: Send + Sync {
    /// Read the current lock token of an IP set
    ///
    /// # Returns
    ///
    /// - `Ok(LockToken)`: The token to present on the next write
    /// - `Err(Error::NotFound)`: If the IP set does not exist
    /// - `Err(Error)`: Any other API failure
    async fn get_lock_token(&self, ip_set: &IpSetRef) -> Result<LockToken, crate::Error>;

    /// Replace the address list of an IP set
    ///
    /// The previous contents are discarded entirely; nothing is merged.
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateResult)`: The replace went through (or was dry-run)
    /// - `Err(Error::StaleLockToken)`: The IP set changed after `token` was read
    /// - `Err(Error)`: Any other API failure; the remote set is unchanged
    async fn update_addresses(
        &self,
        ip_set: &IpSetRef,
        addresses: &[HostCidr],
        token: &LockToken,
    ) -> Result<UpdateResult, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing IP set providers from configuration
///
/// Creation is async because cloud SDK clients load credentials and region
/// settings asynchronously.
#[async_trait]
pub trait IpSetProviderFactory: Send + Sync {
    /// Create an IpSetProvider instance from configuration
    async fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn IpSetProvider>, crate::Error>;
}
