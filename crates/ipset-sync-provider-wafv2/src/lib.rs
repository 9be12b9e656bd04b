// # AWS WAFv2 IP Set Provider
//
// This crate provides an `IpSetProvider` backed by the AWS WAFv2 API.
//
// ## Behavior
//
// - `get_lock_token()` issues one `GetIPSet` call and returns its `LockToken`
// - `update_addresses()` issues one `UpdateIPSet` call replacing `Addresses`
// - Scope is always `REGIONAL`
// - Dry-run mode performs the `GetIPSet` read but only logs the update
// - ❌ NO retry logic (a failed call fails the invocation)
// - ❌ NO caching (each invocation reads a fresh lock token)
//
// ## Error Mapping
//
// - `WAFNonexistentItemException` on read → `Error::NotFound`
// - `WAFOptimisticLockException` on write → `Error::StaleLockToken`
// - everything else → `Error::Provider { provider: "wafv2", .. }`
//
// ## Credentials
//
// Region and credentials come from the standard AWS environment chain
// (`AWS_REGION`, the Lambda execution role, profiles). Nothing secret is
// held by this crate.
//
// ## API Reference
//
// - GetIPSet: https://docs.aws.amazon.com/waf/latest/APIReference/API_GetIPSet.html
// - UpdateIPSet: https://docs.aws.amazon.com/waf/latest/APIReference/API_UpdateIPSet.html

use async_trait::async_trait;
use aws_sdk_wafv2::Client;
use aws_sdk_wafv2::config::{BehaviorVersion, Region};
use aws_sdk_wafv2::error::DisplayErrorContext;
use aws_sdk_wafv2::types::Scope;
use ipset_sync_core::address::{HostCidr, to_address_strings};
use ipset_sync_core::config::{IpSetRef, ProviderConfig};
use ipset_sync_core::traits::{IpSetProvider, IpSetProviderFactory, LockToken, UpdateResult};
use ipset_sync_core::{Error, ProviderRegistry, Result};

/// Registered provider type name
const PROVIDER_NAME: &str = "wafv2";

/// Scope every call is issued in
const IP_SET_SCOPE: Scope = Scope::Regional;

/// AWS WAFv2 IP set provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the `GetIPSet` request
/// - Log the intended `UpdateIPSet` payload
/// - **NOT** modify the IP set
pub struct Wafv2Provider {
    /// WAFv2 API client
    client: Client,

    /// Dry-run mode: if true, read the lock token but skip the update
    dry_run: bool,
}

impl std::fmt::Debug for Wafv2Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wafv2Provider")
            .field("region", &self.client.config().region())
            .field("scope", &IP_SET_SCOPE.as_str())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Wafv2Provider {
    /// Create a provider around an existing client
    pub fn new(client: Client, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Create a provider that writes to the IP set
    pub fn new_live(client: Client) -> Self {
        Self::new(client, false)
    }

    /// Create a provider that only logs the update it would send
    pub fn new_dry_run(client: Client) -> Self {
        Self::new(client, true)
    }

    /// Create a provider from the AWS environment chain
    ///
    /// `region` overrides `AWS_REGION` and profile settings when given.
    pub async fn from_env(region: Option<String>, dry_run: bool) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), dry_run)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl IpSetProvider for Wafv2Provider {
    /// Read the IP set's current lock token
    ///
    /// # API Call
    ///
    /// ```text
    /// GetIPSet { Name, Scope: REGIONAL, Id } → { IPSet, LockToken }
    /// ```
    async fn get_lock_token(&self, ip_set: &IpSetRef) -> Result<LockToken> {
        tracing::debug!("Fetching lock token for IP set [{}] ({})", ip_set.name, ip_set.id);

        let output = self
            .client
            .get_ip_set()
            .name(&ip_set.name)
            .scope(IP_SET_SCOPE)
            .id(&ip_set.id)
            .send()
            .await
            .map_err(|e| {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_waf_nonexistent_item_exception())
                {
                    Error::not_found(format!("{} ({})", ip_set.name, ip_set.id))
                } else {
                    Error::provider(
                        PROVIDER_NAME,
                        format!("GetIPSet failed: {}", DisplayErrorContext(&e)),
                    )
                }
            })?;

        let token = output.lock_token().ok_or_else(|| {
            Error::provider(PROVIDER_NAME, "Invalid response format: LockToken is missing")
        })?;

        Ok(LockToken::new(token))
    }

    /// Replace the IP set's address list
    ///
    /// # API Call
    ///
    /// ```text
    /// UpdateIPSet { Name, Scope: REGIONAL, Id, Addresses, LockToken }
    /// ```
    async fn update_addresses(
        &self,
        ip_set: &IpSetRef,
        addresses: &[HostCidr],
        token: &LockToken,
    ) -> Result<UpdateResult> {
        let address_count = addresses.len();
        let addresses = to_address_strings(addresses);

        tracing::info!(
            "{} IP set [{}] with {} CIDRs [mode: {}]",
            if self.dry_run { "Would update" } else { "Updating" },
            ip_set.name,
            address_count,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send UpdateIPSet with payload: {}",
                serde_json::json!({
                    "Name": ip_set.name,
                    "Scope": IP_SET_SCOPE.as_str(),
                    "Id": ip_set.id,
                    "Addresses": addresses,
                    "LockToken": token.as_str(),
                })
            );
            return Ok(UpdateResult::DryRun { address_count });
        }

        self.client
            .update_ip_set()
            .name(&ip_set.name)
            .scope(IP_SET_SCOPE)
            .id(&ip_set.id)
            .set_addresses(Some(addresses))
            .lock_token(token.as_str())
            .send()
            .await
            .map_err(|e| {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_waf_optimistic_lock_exception())
                {
                    Error::stale_lock_token(format!(
                        "IP set {} was modified after lock token {} was read",
                        ip_set.name, token
                    ))
                } else {
                    Error::provider(
                        PROVIDER_NAME,
                        format!("UpdateIPSet failed: {}", DisplayErrorContext(&e)),
                    )
                }
            })?;

        Ok(UpdateResult::Replaced { address_count })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating WAFv2 providers
pub struct Wafv2Factory;

#[async_trait]
impl IpSetProviderFactory for Wafv2Factory {
    async fn create(&self, config: &ProviderConfig) -> Result<Box<dyn IpSetProvider>> {
        match config {
            ProviderConfig::Wafv2 { region, mode } => {
                if mode.is_dry_run() {
                    tracing::warn!("WAFv2 provider running in DRY-RUN mode - no changes will be made");
                }

                Ok(Box::new(
                    Wafv2Provider::from_env(region.clone(), mode.is_dry_run()).await,
                ))
            }
            _ => Err(Error::config("Invalid config for WAFv2 provider")),
        }
    }
}

/// Register the WAFv2 provider with a registry
///
/// # Example
///
/// ```rust
/// use ipset_sync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ipset_sync_provider_wafv2::register(&registry);
/// assert!(registry.has_provider("wafv2"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(Wafv2Factory));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipset_sync_core::config::SyncMode;
    use std::net::Ipv4Addr;
    use tokio_test::assert_ok;

    fn offline_client() -> Client {
        let config = aws_sdk_wafv2::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        Client::from_conf(config)
    }

    #[test]
    fn test_dry_run_mode() {
        let provider_dry = Wafv2Provider::new_dry_run(offline_client());
        let provider_live = Wafv2Provider::new_live(offline_client());

        assert!(provider_dry.is_dry_run(), "Dry-run provider should have dry_run=true");
        assert!(!provider_live.is_dry_run(), "Live provider should have dry_run=false");
    }

    #[test]
    fn test_provider_name() {
        let provider = Wafv2Provider::new_live(offline_client());
        assert_eq!(provider.provider_name(), "wafv2");
    }

    #[test]
    fn test_debug_shows_region_and_scope() {
        let provider = Wafv2Provider::new_live(offline_client());
        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("Wafv2Provider"));
        assert!(debug_str.contains("us-east-1"));
        assert!(debug_str.contains("REGIONAL"));
    }

    #[tokio::test]
    async fn test_dry_run_update_makes_no_call() {
        let provider = Wafv2Provider::new_dry_run(offline_client());
        let ip_set = IpSetRef::new("office-allow", "a1b2c3d4");
        let addresses = [
            HostCidr::new(Ipv4Addr::new(10, 0, 0, 1)),
            HostCidr::new(Ipv4Addr::new(10, 0, 0, 2)),
        ];

        let result = assert_ok!(
            provider
                .update_addresses(&ip_set, &addresses, &LockToken::new("token-1"))
                .await
        );
        assert_eq!(result, UpdateResult::DryRun { address_count: 2 });
    }

    #[tokio::test]
    async fn test_factory_rejects_custom_config() {
        let config = ProviderConfig::Custom {
            factory: "other".to_string(),
            config: serde_json::json!({}),
        };
        let err = Wafv2Factory
            .create(&config)
            .await
            .err()
            .expect("custom config must be rejected");
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_factory_creation_with_region() {
        let config = ProviderConfig::Wafv2 {
            region: Some("eu-west-1".to_string()),
            mode: SyncMode::DryRun,
        };
        let provider = Wafv2Factory.create(&config).await;
        assert!(provider.is_ok());
        assert_eq!(provider.map(|p| p.provider_name()).ok(), Some("wafv2"));
    }

    #[test]
    fn test_register() {
        let registry = ProviderRegistry::new();
        register(&registry);
        assert!(registry.has_provider("wafv2"));
    }
}
