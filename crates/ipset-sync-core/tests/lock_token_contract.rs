//! Contract Test: Optimistic Concurrency Protocol
//!
//! Constraints verified:
//! - Every update is preceded by exactly one token fetch
//! - The token passed to the update is the token that was fetched
//! - A stale token fails the invocation and is not retried
//!
//! The engine owns ordering; providers only execute single calls.

mod common;

use common::*;
use ipset_sync_core::{Error, SyncEngine};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn token_is_fetched_once_and_passed_through() {
    let resolver = ScriptedResolver::new().with_answer("example.com", &[[93, 184, 216, 34]]);
    let provider = RecordingProvider::new("5f2c-lock-0001");
    let log = provider.log();

    let engine = SyncEngine::new(Box::new(resolver), Box::new(provider));
    assert_ok!(engine.run_once(&config_for("example.com")).await);

    assert_eq!(
        *log.calls.lock().unwrap(),
        vec!["get_lock_token", "update_addresses"]
    );
    let (_, _, token) = log.last_update().expect("update was called");
    assert_eq!(token.as_str(), "5f2c-lock-0001");
}

#[tokio::test]
async fn each_invocation_reads_a_fresh_token() {
    let resolver = ScriptedResolver::new().with_answer("example.com", &[[93, 184, 216, 34]]);
    let provider = RecordingProvider::new("token-1");
    let log = provider.log();

    let engine = SyncEngine::new(Box::new(resolver), Box::new(provider));
    let config = config_for("example.com");
    assert_ok!(engine.run_once(&config).await);
    assert_ok!(engine.run_once(&config).await);

    assert_eq!(log.token_fetch_count(), 2);
    assert_eq!(log.update_count(), 2);
}

#[tokio::test]
async fn stale_token_fails_without_retry() {
    let resolver = ScriptedResolver::new().with_answer("example.com", &[[93, 184, 216, 34]]);
    let provider =
        RecordingProvider::new("token-1").with_write_behavior(WriteBehavior::RejectStaleToken);
    let log = provider.log();

    let engine = SyncEngine::new(Box::new(resolver), Box::new(provider));
    let err = assert_err!(engine.run_once(&config_for("example.com")).await);

    assert!(matches!(err, Error::StaleLockToken(_)));
    assert_eq!(log.token_fetch_count(), 1);
    assert_eq!(log.update_count(), 1);
}
