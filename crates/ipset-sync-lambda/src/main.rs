// # ipset-sync-lambda
//
// Lambda function keeping a WAFv2 IP set in sync with the IPv4 addresses of
// a list of domain names. Meant to be triggered on a schedule.
//
// This binary is a thin integration layer:
// 1. Reading process configuration from environment variables
// 2. Initializing logging
// 3. Registering the WAFv2 provider and the host resolvers
// 4. Handing each invocation to `SyncEngine::run_once`
//
// ## Configuration
//
// ### Sync target (re-read on every invocation)
// - `DOMAIN_NAMES`: Comma-separated domain names to resolve
// - `WAF_IP_SET_ID`: Id of the IP set to overwrite
// - `WAF_IP_SET_NAME`: Name of the IP set to overwrite
//
// ### Process
// - `LOG_LEVEL`: trace, debug, info, warn, error (default: error)
// - `IPSET_SYNC_MODE`: live or dry-run (default: live)
// - `IPSET_SYNC_RESOLVER`: system or hickory (default: system)
// - `AWS_REGION` and credentials: standard AWS environment chain
//
// ## Local Use
//
// Outside Lambda (no `AWS_LAMBDA_RUNTIME_API`), the binary runs a single
// invocation, prints the response and exits.
//
// ```bash
// export DOMAIN_NAMES=example.com,www.example.com
// export WAF_IP_SET_NAME=office-allow
// export WAF_IP_SET_ID=a1b2c3d4-5678-90ab-cdef-EXAMPLE11111
// export IPSET_SYNC_MODE=dry-run
// export LOG_LEVEL=debug
//
// bootstrap
// ```

mod env;
mod response;

use anyhow::Result;
use env::EnvConfig;
use ipset_sync_core::config::SyncConfig;
use ipset_sync_core::{ProviderRegistry, SyncEngine};
use lambda_runtime::{LambdaEvent, service_fn};
use response::SyncResponse;
use serde_json::Value;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for local runs
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    /// Invocation succeeded (updated or skipped)
    Success = 0,
    /// Invocation failed (resolution or provider error)
    InvocationFailed = 1,
    /// Configuration or startup failure
    StartupError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let config = match EnvConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncExitCode::StartupError.into();
        }
    };

    // CloudWatch adds its own timestamps and does not render ANSI
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_ansi(false)
        .without_time()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::StartupError.into();
    }

    debug!("Log level is [{}]", config.log_level);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::StartupError.into();
        }
    };

    rt.block_on(async {
        let engine = match build_engine(&config).await {
            Ok(engine) => engine,
            Err(e) => {
                error!("Startup error: {}", e);
                return SyncExitCode::StartupError;
            }
        };

        if env::running_in_lambda() {
            match run_lambda(&engine).await {
                Ok(()) => SyncExitCode::Success,
                Err(e) => {
                    error!("Lambda runtime error: {}", e);
                    SyncExitCode::StartupError
                }
            }
        } else {
            run_local(&engine).await
        }
    })
    .into()
}

/// Create the resolver and provider selected by configuration
async fn build_engine(config: &EnvConfig) -> Result<SyncEngine> {
    let registry = ProviderRegistry::new();
    ipset_sync_provider_wafv2::register(&registry);
    ipset_sync_resolver::register(&registry);

    let resolver = registry.create_resolver(&config.resolver)?;
    let provider = registry.create_provider(&config.provider).await?;

    info!(
        "Using {} resolver and {} provider",
        resolver.resolver_name(),
        provider.provider_name()
    );

    Ok(SyncEngine::new(resolver, provider))
}

/// Serve invocations until the Lambda service shuts the sandbox down
async fn run_lambda(engine: &SyncEngine) -> Result<()> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle(engine, event).await
    }))
    .await
    .map_err(|e| anyhow::anyhow!("{}", e))
}

/// Handle one invocation; the event payload is ignored
async fn handle(
    engine: &SyncEngine,
    event: LambdaEvent<Value>,
) -> Result<SyncResponse, lambda_runtime::Error> {
    debug!("Invocation {}", event.context.request_id);
    invoke(engine, &env::sync_config_from_env()).await
}

/// Run the pipeline for one target and shape the runtime response
///
/// Skipped invocations still answer 200; resolution and provider errors are
/// returned so the runtime reports the invocation as failed.
async fn invoke(
    engine: &SyncEngine,
    config: &SyncConfig,
) -> Result<SyncResponse, lambda_runtime::Error> {
    let outcome = engine.run_once(config).await?;
    Ok(SyncResponse::from_outcome(&outcome)?)
}

/// Run a single invocation outside Lambda
async fn run_local(engine: &SyncEngine) -> SyncExitCode {
    let config = env::sync_config_from_env();

    let outcome = match engine.run_once(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Invocation failed: {}", e);
            eprintln!("Invocation failed: {}", e);
            return SyncExitCode::InvocationFailed;
        }
    };

    match SyncResponse::from_outcome(&outcome).and_then(|r| serde_json::to_string(&r)) {
        Ok(json) => {
            println!("{}", json);
            SyncExitCode::Success
        }
        Err(e) => {
            error!("Failed to encode response: {}", e);
            SyncExitCode::InvocationFailed
        }
    }
}
