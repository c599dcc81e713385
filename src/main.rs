//! ttlkv demo
//!
//! Exercises the store's public API: a plain set, a set with TTL, and a read
//! after the TTL has passed.

use anyhow::{bail, Context};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use ttlkv::{ExpiringStore, ExpiryConfig};

/// Demo configuration
struct Config {
    /// TTL given to the expiring key
    ttl: Duration,
    /// How long to wait before the final read
    wait: Duration,
    /// Background sweep interval
    sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(2),
            wait: Duration::from_secs(3),
            sweep_interval: Duration::from_millis(ttlkv::DEFAULT_SWEEP_INTERVAL_MS),
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> anyhow::Result<Self> {
        let mut config = Config::default();
        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ttl-secs" => {
                    config.ttl = Duration::from_secs(parse_value(&arg, args.next())?);
                }
                "--wait-secs" => {
                    config.wait = Duration::from_secs(parse_value(&arg, args.next())?);
                }
                "--sweep-ms" => {
                    config.sweep_interval = Duration::from_millis(parse_value(&arg, args.next())?);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("ttlkv version {}", ttlkv::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    print_help();
                    bail!("unknown argument: {}", arg);
                }
            }
        }

        Ok(config)
    }
}

fn parse_value(flag: &str, value: Option<String>) -> anyhow::Result<u64> {
    let value = value.with_context(|| format!("{} requires a value", flag))?;
    value
        .parse()
        .with_context(|| format!("invalid value for {}: {}", flag, value))
}

fn print_help() {
    println!(
        r#"
ttlkv - An In-Process Key-Value Store with TTL Expiry (demo)

USAGE:
    ttlkv [OPTIONS]

OPTIONS:
        --ttl-secs <N>     TTL of the expiring key (default: 2)
        --wait-secs <N>    Seconds to wait before re-reading it (default: 3)
        --sweep-ms <N>     Background sweep interval in ms (default: 1000)
    -v, --version          Print version information
    -h, --help             Print this help message

Set RUST_LOG=debug to watch the sweeper reclaim expired keys.
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args()?;

    // Set up logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let expiry = ExpiryConfig::new().with_sweep_interval(config.sweep_interval);
    let (store, sweeper) = ExpiringStore::<String, String>::start(expiry)?;
    info!(
        ttl_secs = config.ttl.as_secs(),
        wait_secs = config.wait.as_secs(),
        "Store initialized"
    );

    store.set("key".to_string(), "val".to_string());
    let value = store.get("key");
    println!("Get key: {} exists: {}", value.as_deref().unwrap_or(""), value.is_some());

    store.set_with_ttl("temp".to_string(), "expire soon".to_string(), config.ttl)?;
    let value = store.get("temp");
    println!("Get temp: {} exists: {}", value.as_deref().unwrap_or(""), value.is_some());

    tokio::time::sleep(config.wait).await;
    let value = store.get("temp");
    println!(
        "Get temp after TTL: {} exists: {}",
        value.as_deref().unwrap_or(""),
        value.is_some()
    );

    let stats = store.stats();
    info!(
        keys = stats.keys,
        hits = stats.hits,
        misses = stats.misses,
        expired = stats.expired,
        "Demo finished"
    );

    sweeper.shutdown().await;
    Ok(())
}
