// # cfddnsd - Cloudflare DDNS Daemon
//
// This daemon is a THIN driver over cfddns-core:
// 1. Parsing the command line and loading the JSON configuration
// 2. Initializing logging and the runtime
// 3. Building the IP resolver, the Cloudflare provider and the reconciler
// 4. Running once, or on a fixed interval until SIGINT/SIGTERM
//
// ## Configuration
//
// ```json
// {
//   "api_token": "your_token",
//   "zone_id": "023e105f4ecef8ad9ca31a8372d0c353",
//   "record_name": "home.example.com",
//   "record_type": "A",
//   "check_interval_seconds": 300,
//   "ttl": 120,
//   "proxied": false
// }
// ```
//
// `ttl` and `proxied` are optional; when absent the record keeps its current
// values.
//
// ## Example
//
// ```bash
// cfddnsd --config /etc/cfddns/config.json
// cfddnsd --config config.json --once --log-level debug
// ```

use anyhow::Result;
use cfddns_core::{DdnsConfig, Reconciler, Scheduler};
use cfddns_ip_http::HttpIpResolver;
use cfddns_provider_cloudflare::CloudflareProvider;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown or single run finished
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(name = "cfddnsd")]
#[command(version)]
#[command(about = "Keeps a Cloudflare DNS record pointed at this host's public IP")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,

    /// Run a single check and exit
    #[arg(long)]
    once: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(log_level) = parse_log_level(&cli.log_level) else {
        eprintln!(
            "Configuration error: log level '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            cli.log_level
        );
        return DdnsExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let config = match DdnsConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration file: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if config.uses_default_interval() {
        warn!(
            "Check interval not set, using default value {} seconds",
            config.check_interval_secs()
        );
    }

    info!("DDNS client started");
    info!("Monitoring record: {} ({})", config.record_name, config.record_type);
    info!("Check interval: {} seconds", config.check_interval_secs());

    let scheduler = Scheduler::from_config(&config);
    let reconciler = match build_reconciler(config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("Startup error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Runs never overlap, so one thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if cli.once {
            reconciler.run_once().await;
            info!("Single run completed, exiting");
            return DdnsExitCode::CleanShutdown;
        }

        if let Err(e) = run_daemon(&reconciler, scheduler).await {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the HTTP resolver and the Cloudflare provider into a reconciler
fn build_reconciler(config: DdnsConfig) -> cfddns_core::Result<Reconciler> {
    let resolver = HttpIpResolver::new()?;
    let provider = CloudflareProvider::from_config(&config)?;
    Reconciler::new(Box::new(resolver), Box::new(provider), config)
}

/// Run the reconciler on its interval until a shutdown signal arrives
async fn run_daemon(reconciler: &Reconciler, scheduler: Scheduler) -> Result<()> {
    let shutdown = shutdown_signal()?;

    let runs = scheduler
        .run_until(reconciler, async {
            let signal = shutdown.await;
            info!("Received {}, shutting down", signal);
        })
        .await;

    info!("Daemon stopped after {} run(s)", runs);
    Ok(())
}

/// Install handlers for SIGTERM and SIGINT
///
/// Handlers are installed before the first run so a signal arriving during
/// that run is not lost. The returned future resolves with the signal name.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl std::future::Future<Output = &'static str>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Install a handler for Ctrl-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl std::future::Future<Output = &'static str>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                error!("Failed to wait for CTRL-C: {}", e);
                std::future::pending::<&'static str>().await
            }
        }
    })
}
