use std::{process::ExitCode, sync::Arc};

use anyhow::Context as _;
use kuroukai::{
    bots::{CfgExt, MainBot},
    immut_data::{consts::DISCORD_INTENTS, dynamic::BotCfg},
    logging, process,
};
use serenity::Client;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = BotCfg::from_env();
    let level = cfg.as_ref().map(|cfg| cfg.log_level()).unwrap_or_default();
    if let Err(e) = logging::init(level, env!("CARGO_CRATE_NAME")) {
        eprintln!("Failed to install the log subscriber: {e}");
    }

    let cfg = match cfg {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!(error = %e, "Failed to start bot");
            return ExitCode::FAILURE;
        }
    };
    process::install_panic_hook();

    info!(
        environment = cfg.environment(),
        log_level = %cfg.log_level(),
        "Starting KuroukaiBot..."
    );
    info!("Configuration validated successfully");

    match run(cfg).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format_args!("{e:#}"), "Failed to start bot");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: Arc<BotCfg>) -> anyhow::Result<ExitCode> {
    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel();

    let mut client = Client::builder(cfg.discord_token(), DISCORD_INTENTS)
        .event_handler(MainBot::new(cfg.clone(), fatal_tx))
        .await
        .context("creating the Discord client")?;
    let shard_manager = client.shard_manager.clone();

    let mut connection = tokio::spawn(async move { client.start().await });

    let code = tokio::select! {
        signal = process::shutdown_signal() => {
            info!("Received {signal}, shutting down gracefully");
            ExitCode::SUCCESS
        }
        Some(e) = fatal_rx.recv() => {
            error!(error = %e, "Stopping after a failed rules check");
            ExitCode::FAILURE
        }
        res = &mut connection => match res.context("client task panicked or was cancelled")? {
            Ok(()) => {
                info!("Discord client stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Discord client error");
                ExitCode::FAILURE
            }
        },
    };

    shard_manager.lock().await.shutdown_all().await;
    connection.abort();
    info!("Bot stopped");
    Ok(code)
}
