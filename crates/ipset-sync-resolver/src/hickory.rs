//! Hickory DNS stub resolver

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use ipset_sync_core::config::ResolverConfig;
use ipset_sync_core::traits::{HostResolver, HostResolverFactory};
use ipset_sync_core::{Error, Result};
use std::net::Ipv4Addr;

/// Resolver that queries A records using the system's resolv.conf
pub struct HickoryResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryResolver {
    /// Build a resolver from /etc/resolv.conf
    pub fn from_system_conf() -> Result<Self> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| Error::config(format!("Failed to read system DNS configuration: {}", e)))?;
        Ok(Self { resolver })
    }
}

impl std::fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl HostResolver for HickoryResolver {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>> {
        let lookup = self
            .resolver
            .ipv4_lookup(host)
            .await
            .map_err(|e| Error::resolve(host, e.to_string()))?;

        let v4: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
        if v4.is_empty() {
            return Err(Error::resolve(host, "no IPv4 addresses found"));
        }
        Ok(v4)
    }

    fn resolver_name(&self) -> &'static str {
        "hickory"
    }
}

/// Factory for creating hickory resolvers
pub struct HickoryResolverFactory;

impl HostResolverFactory for HickoryResolverFactory {
    fn create(&self, config: &ResolverConfig) -> Result<Box<dyn HostResolver>> {
        match config {
            ResolverConfig::Hickory => Ok(Box::new(HickoryResolver::from_system_conf()?)),
            _ => Err(Error::config("Invalid config for hickory resolver")),
        }
    }
}
