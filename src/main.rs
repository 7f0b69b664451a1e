mod commands;
mod conversation;
mod gateway;
mod i18n;
mod identity;
mod scheduler;

use clap::{Parser, Subcommand};
use habitual_channels::telegram::TelegramChannel;
use habitual_core::{config, shellexpand, traits::Channel};
use habitual_store::Store;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "habitual",
    version,
    about = "Habitual — a habit tracker bot with timed reminders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration and the habit store.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg)?;

    match cli.command {
        Commands::Start => {
            // Build channels.
            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();

            if let Some(ref tg) = cfg.channel.telegram {
                if tg.enabled {
                    if tg.bot_token.is_empty() {
                        anyhow::bail!(
                            "Telegram is enabled but bot_token is empty. \
                             Set it in config.toml or {} env var.",
                            config::BOT_TOKEN_ENV
                        );
                    }
                    let channel = TelegramChannel::new(tg.clone());
                    channels.insert("telegram".to_string(), Arc::new(channel));
                }
            }

            if channels.is_empty() {
                anyhow::bail!("No channels enabled. Enable at least one channel in config.toml.");
            }

            // Build store.
            let store = Store::new(&cfg.store).await?;

            // Build and run gateway.
            println!("{} — starting bot...", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(
                channels,
                Arc::new(store.clone()),
                Arc::new(store),
                &cfg,
            ));
            gw.run().await?;
        }
        Commands::Status => {
            println!("{} — Status Check\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!("Language: {}", cfg.bot.language);
            println!();

            // Check channels.
            if let Some(ref tg) = cfg.channel.telegram {
                println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                );
            } else {
                println!("  telegram: not configured");
            }

            if cfg.scheduler.enabled {
                println!(
                    "  scheduler: every {}s, ±{} min, via {}",
                    cfg.scheduler.poll_interval_secs,
                    cfg.scheduler.tolerance_minutes,
                    cfg.scheduler.channel
                );
            } else {
                println!("  scheduler: disabled");
            }
            println!(
                "  dispatcher: {} workers, {} attempts, {}s backoff",
                cfg.dispatcher.workers, cfg.dispatcher.max_attempts, cfg.dispatcher.backoff_secs
            );
            println!();

            match Store::new(&cfg.store).await {
                Ok(store) => {
                    let (users, habits) = store.counts().await?;
                    println!(
                        "  store: {} ({users} users, {habits} habits)",
                        shellexpand(&cfg.store.db_path)
                    );
                }
                Err(e) => println!("  store: unavailable ({e})"),
            }
        }
    }

    Ok(())
}

/// Console logging plus a daily-rolling file under `{data_dir}/logs`.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(cfg: &config::Config) -> anyhow::Result<WorkerGuard> {
    let log_dir = PathBuf::from(shellexpand(&cfg.bot.data_dir)).join("logs");
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| anyhow::anyhow!("failed to create log dir {}: {e}", log_dir.display()))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "habitual.log"));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.bot.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}
