// # Host Resolver Trait
//
// Defines the interface for turning a domain name into the IPv4 addresses it
// currently points at.
//
// ## Implementations
//
// - System resolver (getaddrinfo): `ipset-sync-resolver` crate
// - Hickory stub resolver: `ipset-sync-resolver` crate, `hickory` feature
//
// ## Usage
//
// ```rust,ignore
// use ipset_sync_core::HostResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* HostResolver implementation */;
//
//     for addr in resolver.lookup_ipv4("example.com").await? {
//         println!("{}", addr);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for host resolver implementations
///
/// # Failure Contract
///
/// A lookup either yields at least one IPv4 address or fails. An answer
/// with no IPv4 address (NXDOMAIN, IPv6-only host) is an error, so the
/// engine never writes a list that silently lost a domain.
///
/// Resolvers must not retry. A transient failure is reported as-is and the
/// engine aborts the invocation.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve all IPv4 addresses for a host
    ///
    /// Addresses are returned in the order the underlying resolver produced
    /// them.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Ipv4Addr>)`: One or more addresses
    /// - `Err(Error::Resolve)`: If the host could not be resolved
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, crate::Error>;

    /// Get the resolver name (for logging/debugging)
    fn resolver_name(&self) -> &'static str;
}

/// Helper trait for constructing host resolvers from configuration
pub trait HostResolverFactory: Send + Sync {
    /// Create a HostResolver instance from configuration
    fn create(
        &self,
        config: &crate::config::ResolverConfig,
    ) -> Result<Box<dyn HostResolver>, crate::Error>;
}
