//! Core traits for the IP set sync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`HostResolver`]: Resolve a domain name to its IPv4 addresses
//! - [`IpSetProvider`]: Read the lock token of, and replace the contents of, a remote IP set

pub mod host_resolver;
pub mod ip_set_provider;

pub use host_resolver::{HostResolver, HostResolverFactory};
pub use ip_set_provider::{IpSetProvider, IpSetProviderFactory, LockToken, UpdateResult};
