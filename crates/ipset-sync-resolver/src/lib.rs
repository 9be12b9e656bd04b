// # Host Resolvers
//
// This crate provides `HostResolver` implementations for the IP set sync
// system.
//
// - `SystemResolver`: the operating system resolver (getaddrinfo via
//   `tokio::net::lookup_host`). Default; honors /etc/hosts and nsswitch.
// - `HickoryResolver` (feature `hickory`): a stub resolver that reads
//   /etc/resolv.conf and queries A records directly.
//
// Both return IPv4 addresses only, in resolver order, and fail when a host
// has no IPv4 address. Neither retries.

use async_trait::async_trait;
use ipset_sync_core::ProviderRegistry;
use ipset_sync_core::config::ResolverConfig;
use ipset_sync_core::traits::{HostResolver, HostResolverFactory};
use ipset_sync_core::{Error, Result};
use std::net::{IpAddr, Ipv4Addr};

#[cfg(feature = "hickory")]
mod hickory;

#[cfg(feature = "hickory")]
pub use hickory::{HickoryResolver, HickoryResolverFactory};

/// Resolver backed by the operating system's getaddrinfo
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostResolver for SystemResolver {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>> {
        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| Error::resolve(host, e.to_string()))?;

        let v4: Vec<Ipv4Addr> = addrs
            .filter_map(|sa| match sa.ip() {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .collect();

        if v4.is_empty() {
            return Err(Error::resolve(host, "no IPv4 addresses found"));
        }

        tracing::trace!("{} resolved to {} IPv4 address(es)", host, v4.len());
        Ok(v4)
    }

    fn resolver_name(&self) -> &'static str {
        "system"
    }
}

/// Factory for creating system resolvers
pub struct SystemResolverFactory;

impl HostResolverFactory for SystemResolverFactory {
    fn create(&self, config: &ResolverConfig) -> Result<Box<dyn HostResolver>> {
        match config {
            ResolverConfig::System => Ok(Box::new(SystemResolver::new())),
            _ => Err(Error::config("Invalid config for system resolver")),
        }
    }
}

/// Register the resolvers built into this crate
///
/// # Example
///
/// ```rust
/// use ipset_sync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ipset_sync_resolver::register(&registry);
/// assert!(registry.has_resolver("system"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_resolver("system", Box::new(SystemResolverFactory));

    #[cfg(feature = "hickory")]
    registry.register_resolver("hickory", Box::new(HickoryResolverFactory));
}
