//! `climb` - resolve an intraday series and report its climb signal.
//!
//! Configuration comes from the environment (`INTRADAY_LIVE_CALLS`,
//! `ALPHA_VANTAGE_API_KEY`, `INTRADAY_FALLBACK_PERIOD`, `INTRADAY_CACHE_DIR`,
//! `INTRADAY_WRITE_BACK`); `--cache-dir` and `--offline` override it.
//! Logging goes to stderr and is filtered by `RUST_LOG`.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use intraday::{
    AlphaVantageSource, ConfigError, DataResolver, FileStore, Granularity, Period, ResolverConfig,
    Symbol, climb, config::ENV_LIVE_CALLS,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "climb",
    about = "Resolve an intraday series (cache first) and report its climb signal"
)]
struct Cli {
    /// Symbol to analyze (e.g., IBM).
    symbol: String,

    /// Month to load (YYYY-MM) or `latest`.
    #[arg(long, default_value = "latest")]
    period: Period,

    /// Bar interval: 1min, 5min, 15min, 30min or 60min.
    #[arg(long, default_value = "1min")]
    granularity: Granularity,

    /// Scale the analysis window to the granularity instead of assuming 1-minute bars.
    #[arg(long, default_value_t = false)]
    scale_window: bool,

    /// Cache directory. Overrides INTRADAY_CACHE_DIR.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Never call the live provider, whatever the environment says.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Print the raw resolved series instead of the analysis.
    #[arg(long, default_value_t = false)]
    dump: bool,
}

/// Load the config through `lookup`, with `offline` masking the live-calls
/// switch before the credential check runs.
fn load_config(
    offline: bool,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ResolverConfig, ConfigError> {
    ResolverConfig::from_lookup(|name| {
        if offline && name == ENV_LIVE_CALLS {
            None
        } else {
            lookup(name)
        }
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let (period, granularity) = (cli.period, cli.granularity);

    let config = load_config(cli.offline, |name| env::var(name).ok())
        .context("failed to load configuration")?;
    let cache_dir = cli
        .cache_dir
        .unwrap_or_else(|| config.cache_dir().to_path_buf());

    info!(
        symbol = %cli.symbol,
        period = %period,
        granularity = %granularity,
        live_calls = config.live_calls(),
        cache_dir = %cache_dir.display(),
        "Resolving intraday data"
    );

    let resolver = DataResolver::new(
        Arc::new(config),
        Arc::new(FileStore::new(cache_dir)),
        Arc::new(AlphaVantageSource::new()),
    );

    let symbol = Symbol::new(cli.symbol);
    let data = resolver.resolve(&symbol, period, granularity).await;

    if cli.dump {
        let Some(data) = data else {
            eprintln!("no data resolved for {symbol}");
            return Ok(ExitCode::FAILURE);
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(ExitCode::SUCCESS);
    }

    let report = if cli.scale_window {
        climb::analyze_granular(symbol.as_str(), data.as_ref(), granularity)
    } else {
        climb::analyze(symbol.as_str(), data.as_ref())
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if data.is_some() && report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use intraday::config::ENV_API_KEY;

    fn live_without_key(name: &str) -> Option<String> {
        (name == ENV_LIVE_CALLS).then(|| "1".to_string())
    }

    #[test]
    fn test_offline_overrides_live_calls_before_validation() {
        let config = load_config(true, live_without_key).unwrap();
        assert!(!config.live_calls());
    }

    #[test]
    fn test_live_calls_without_key_fail_when_online() {
        let err = load_config(false, live_without_key).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ENV_API_KEY)));
    }

    #[test]
    fn test_period_and_granularity_are_parsed_by_clap() {
        let cli = Cli::try_parse_from([
            "climb",
            "IBM",
            "--period",
            "2024-01",
            "--granularity",
            "5min",
        ])
        .unwrap();
        assert_eq!(cli.period, "2024-01".parse::<Period>().unwrap());
        assert_eq!(cli.granularity, Granularity::FiveMinute);

        let defaults = Cli::try_parse_from(["climb", "IBM"]).unwrap();
        assert_eq!(defaults.period, Period::Latest);
        assert_eq!(defaults.granularity, Granularity::OneMinute);

        assert!(Cli::try_parse_from(["climb", "IBM", "--period", "2024-13"]).is_err());
        assert!(Cli::try_parse_from(["climb", "IBM", "--granularity", "2min"]).is_err());
    }
}
