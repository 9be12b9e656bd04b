// # ipset-sync-core
//
// Core library for keeping a firewall IP set in sync with the addresses a
// list of domain names currently resolves to.
//
// ## Architecture Overview
//
// - **HostResolver**: Trait for resolving a domain name to IPv4 addresses
// - **IpSetProvider**: Trait for reading the lock token of, and replacing the
//   contents of, a remote IP set
// - **SyncEngine**: Runs one invocation of the config → resolve → format →
//   fetch-token → write pipeline
// - **ProviderRegistry**: Plugin-based registry for resolvers and providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Fail-Fast**: Any resolution or provider failure aborts the invocation
// 3. **Plugin-Based**: Implementations are registered by name, no hard-coded if-else
// 4. **Library-First**: The pipeline can be driven without the Lambda binary
// 5. **Stateless**: Nothing is carried between invocations except the remote IP set

pub mod address;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use address::HostCidr;
pub use config::{IpSetRef, ProviderConfig, ResolverConfig, SyncConfig, SyncMode};
pub use engine::{SyncEngine, SyncOutcome};
pub use error::{Error, Result};
pub use registry::ProviderRegistry;
pub use traits::{HostResolver, IpSetProvider, LockToken, UpdateResult};
