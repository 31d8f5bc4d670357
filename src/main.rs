//! Two-Venue Arbitrage Bot
//!
//! Main entry point. Loads configuration (.env or TOML), wires the HTTP price
//! feed and the dry-run swap backend into the opportunity loop and runs it
//! until SIGINT or SIGTERM.
//!
//! Created: 2026-10-13

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use solarb_bot::dex::{DryRunDex, PaperWallet};
use solarb_bot::{
    load_config, load_config_from_file, ArbitrageBot, BotConfig, Collaborators, HttpPriceFeed,
    TomlConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Two-venue DEX arbitrage bot
#[derive(Parser)]
#[command(name = "solarb-bot")]
struct Args {
    /// TOML config file (takes precedence over the environment)
    #[arg(short, long, env = "SOLARB_CONFIG")]
    config: Option<PathBuf>,

    /// .env file to load instead of ./.env
    #[arg(long, env = "SOLARB_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = args.config.as_ref().map(TomlConfig::load).transpose()?;
    let default_level = toml_config
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    init_logging(&default_level, args.json_logs);

    info!("===========================================");
    info!("   Two-Venue Arbitrage Bot (dry run)");
    info!("===========================================");

    let config = match (&toml_config, &args.env_file) {
        (Some(toml_config), _) => {
            info!("Configuration loaded from {}", display_path(&args.config));
            toml_config.to_bot_config()?
        }
        (None, Some(env_file)) => {
            info!("Configuration loaded from {}", env_file.display());
            load_config_from_file(env_file)?
        }
        (None, None) => load_config()?,
    };
    log_config(&config);

    let dex = Arc::new(DryRunDex::from_config(&config));
    let collaborators = Collaborators {
        prices: Box::new(HttpPriceFeed::new(&config)?),
        balance: Arc::new(PaperWallet::new(config.paper_balance)),
        liquidity: dex.clone(),
        swaps: dex.clone(),
    };
    let bot = ArbitrageBot::new(&config, collaborators);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let signals_handle = signals.handle();
    tokio::spawn(async move {
        if let Some(sig) = signals.next().await {
            let name = if sig == SIGTERM { "SIGTERM" } else { "SIGINT" };
            info!("Received {} - shutting down", name);
            let _ = shutdown_tx.send(true);
        }
    });

    let stats = bot.run(shutdown_rx).await;
    signals_handle.close();

    info!(
        "Bot stopped after {} cycles ({} executed, {} dry-run swaps)",
        stats.cycles,
        stats.executed,
        dex.swap_count()
    );
    Ok(())
}

fn init_logging(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn log_config(config: &BotConfig) {
    info!("Token: {}", config.token_address);
    info!("Venue A: {} ({})", config.venue_a, config.venue_a.router_address);
    info!("Venue B: {} ({})", config.venue_b, config.venue_b.router_address);
    info!(
        "Trade amount: {} | min profit: {} | fee rate: {}",
        config.trade_amount, config.min_profit_threshold, config.fee_rate
    );
    info!(
        "Cooldown: {} errors -> {}s pause | poll interval: {}ms",
        config.max_consecutive_errors, config.error_cooldown_secs, config.poll_interval_ms
    );
}
