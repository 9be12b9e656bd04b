//! Test doubles and common utilities for pipeline contract tests
//!
//! These doubles record every call so tests can assert on exactly which
//! external interactions an invocation performed.

#![allow(dead_code)]

use ipset_sync_core::config::{IpSetRef, SyncConfig};
use ipset_sync_core::error::{Error, Result};
use ipset_sync_core::traits::{HostResolver, IpSetProvider, LockToken, UpdateResult};
use ipset_sync_core::HostCidr;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A resolver answering from a fixed table
///
/// Hosts missing from the table fail like NXDOMAIN.
pub struct ScriptedResolver {
    answers: HashMap<String, Vec<Ipv4Addr>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add an answer for a host
    pub fn with_answer(mut self, host: &str, addrs: &[[u8; 4]]) -> Self {
        self.answers.insert(
            host.to_string(),
            addrs.iter().map(|a| Ipv4Addr::from(*a)).collect(),
        );
        self
    }

    /// Shared handle to the lookup log
    pub fn lookups(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.lookups)
    }
}

#[async_trait::async_trait]
impl HostResolver for ScriptedResolver {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>> {
        self.lookups.lock().unwrap().push(host.to_string());
        self.answers
            .get(host)
            .cloned()
            .ok_or_else(|| Error::resolve(host, "NXDOMAIN"))
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// What the provider should do when asked to write
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum WriteBehavior {
    Accept,
    DryRun,
    RejectStaleToken,
}

/// Shared call log of a [`RecordingProvider`]
#[derive(Default)]
pub struct ProviderLog {
    pub token_fetches: AtomicUsize,
    pub updates: Mutex<Vec<(IpSetRef, Vec<String>, LockToken)>>,
    /// Global call order, e.g. ["get_lock_token", "update_addresses"]
    pub calls: Mutex<Vec<&'static str>>,
}

impl ProviderLog {
    pub fn token_fetch_count(&self) -> usize {
        self.token_fetches.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_update(&self) -> Option<(IpSetRef, Vec<String>, LockToken)> {
        self.updates.lock().unwrap().last().cloned()
    }
}

/// A provider that hands out a fixed token and records writes
pub struct RecordingProvider {
    token: String,
    write: WriteBehavior,
    fail_token_fetch: bool,
    log: Arc<ProviderLog>,
}

impl RecordingProvider {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            write: WriteBehavior::Accept,
            fail_token_fetch: false,
            log: Arc::new(ProviderLog::default()),
        }
    }

    pub fn with_write_behavior(mut self, write: WriteBehavior) -> Self {
        self.write = write;
        self
    }

    pub fn failing_token_fetch(mut self) -> Self {
        self.fail_token_fetch = true;
        self
    }

    pub fn log(&self) -> Arc<ProviderLog> {
        Arc::clone(&self.log)
    }
}

#[async_trait::async_trait]
impl IpSetProvider for RecordingProvider {
    async fn get_lock_token(&self, ip_set: &IpSetRef) -> Result<LockToken> {
        self.log.calls.lock().unwrap().push("get_lock_token");
        self.log.token_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_token_fetch {
            return Err(Error::not_found(ip_set.name.clone()));
        }
        Ok(LockToken::new(self.token.clone()))
    }

    async fn update_addresses(
        &self,
        ip_set: &IpSetRef,
        addresses: &[HostCidr],
        token: &LockToken,
    ) -> Result<UpdateResult> {
        self.log.calls.lock().unwrap().push("update_addresses");
        self.log.updates.lock().unwrap().push((
            ip_set.clone(),
            addresses.iter().map(ToString::to_string).collect(),
            token.clone(),
        ));

        match self.write {
            WriteBehavior::Accept => Ok(UpdateResult::Replaced {
                address_count: addresses.len(),
            }),
            WriteBehavior::DryRun => Ok(UpdateResult::DryRun {
                address_count: addresses.len(),
            }),
            WriteBehavior::RejectStaleToken => {
                Err(Error::stale_lock_token(format!("token {} is stale", token)))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a valid configuration for the given domains
pub fn config_for(domains: &str) -> SyncConfig {
    SyncConfig::from_domain_list(domains, IpSetRef::new("office-allow", "a1b2c3d4"))
}
