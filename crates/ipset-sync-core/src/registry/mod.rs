//! Plugin-based provider registry
//!
//! The registry allows IP set providers and host resolvers to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ipset_sync_core::registry::ProviderRegistry;
//! use ipset_sync_core::config::{ProviderConfig, ResolverConfig};
//!
//! let registry = ProviderRegistry::new();
//! ipset_sync_provider_wafv2::register(&registry);
//! ipset_sync_resolver::register(&registry);
//!
//! let provider = registry.create_provider(&ProviderConfig::default()).await?;
//! let resolver = registry.create_resolver(&ResolverConfig::System)?;
//! ```

use crate::config::{ProviderConfig, ResolverConfig};
use crate::error::{Error, Result};
use crate::traits::{HostResolver, HostResolverFactory, IpSetProvider, IpSetProviderFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry mapping plugin type names to factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered IP set provider factories
    providers: RwLock<HashMap<String, Arc<dyn IpSetProviderFactory>>>,

    /// Registered host resolver factories
    resolvers: RwLock<HashMap<String, Box<dyn HostResolverFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an IP set provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "wafv2")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn IpSetProviderFactory>,
    ) {
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.insert(name.into(), Arc::from(factory));
    }

    /// Register a host resolver factory
    ///
    /// # Parameters
    ///
    /// - `name`: Resolver type name (e.g., "system", "hickory")
    /// - `factory`: Factory object for creating resolver instances
    pub fn register_resolver(&self, name: impl Into<String>, factory: Box<dyn HostResolverFactory>) {
        let mut resolvers = self
            .resolvers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        resolvers.insert(name.into(), factory);
    }

    /// Create an IP set provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn IpSetProvider>)`: Created provider instance
    /// - `Err(Error)`: If the provider type is not registered or creation fails
    pub async fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn IpSetProvider>> {
        config.validate()?;
        let provider_type = config.type_name();

        let factory = {
            let providers = self
                .providers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            providers
                .get(provider_type)
                .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?
                .clone()
        };

        // Lock is released before awaiting the async factory
        factory.create(config).await
    }

    /// Create a host resolver from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn HostResolver>)`: Created resolver instance
    /// - `Err(Error)`: If the resolver type is not registered or creation fails
    pub fn create_resolver(&self, config: &ResolverConfig) -> Result<Box<dyn HostResolver>> {
        let resolver_type = config.type_name();
        let resolvers = self
            .resolvers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let factory = resolvers
            .get(resolver_type)
            .ok_or_else(|| Error::config(format!("Unknown resolver type: {}", resolver_type)))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.keys().cloned().collect()
    }

    /// List all registered resolver types
    pub fn list_resolvers(&self) -> Vec<String> {
        let resolvers = self
            .resolvers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        resolvers.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.contains_key(name)
    }

    /// Check if a resolver type is registered
    pub fn has_resolver(&self, name: &str) -> bool {
        let resolvers = self
            .resolvers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        resolvers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct MockProviderFactory;

    #[async_trait]
    impl IpSetProviderFactory for MockProviderFactory {
        async fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn IpSetProvider>> {
            Err(Error::not_found("Mock provider not implemented"))
        }
    }

    struct MockResolverFactory;

    impl HostResolverFactory for MockResolverFactory {
        fn create(&self, _config: &ResolverConfig) -> Result<Box<dyn HostResolver>> {
            Err(Error::not_found("Mock resolver not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        assert!(!registry.has_provider("mock"));
        assert!(!registry.has_resolver("mock"));

        registry.register_provider("mock", Box::new(MockProviderFactory));
        registry.register_resolver("mock", Box::new(MockResolverFactory));

        assert!(registry.has_provider("mock"));
        assert!(registry.has_resolver("mock"));
        assert!(registry.list_providers().contains(&"mock".to_string()));
        assert!(registry.list_resolvers().contains(&"mock".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_config_error() {
        let registry = ProviderRegistry::new();
        let err = registry
            .create_provider(&ProviderConfig::default())
            .await
            .err()
            .expect("unregistered provider must fail");
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_registered_factory_is_invoked() {
        let registry = ProviderRegistry::new();
        registry.register_provider("wafv2", Box::new(MockProviderFactory));

        let err = registry
            .create_provider(&ProviderConfig::default())
            .await
            .err()
            .expect("mock factory always fails");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_unknown_resolver_is_config_error() {
        let registry = ProviderRegistry::new();
        let err = registry
            .create_resolver(&ResolverConfig::Hickory)
            .err()
            .expect("unregistered resolver must fail");
        assert!(err.is_config());
    }
}
