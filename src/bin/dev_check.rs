//! Local sanity checks: configuration, rules content and log output.

use std::process::ExitCode;

use anyhow::{ensure, Context};
use kuroukai::{
    bots::CfgExt,
    immut_data::{
        consts::{EMBED_DESCRIPTION_LIMIT, RULES, RULES_EMBED_TITLE},
        dynamic::BotCfg,
    },
    logging,
    util::validation::redact_token,
};
use tracing::{debug, error, info, warn};

fn main() -> ExitCode {
    println!("🔧 KuroukaiBot Development Checks\n");
    match run() {
        Ok(()) => {
            println!("🎉 All development checks passed!");
            println!("🚀 Run \"cargo run --release\" to start the bot.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("   ❌ {e:#}\n");
            println!("Development check failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    println!("1. Environment Configuration:");
    let cfg = BotCfg::from_env().context("Configuration Error")?;
    println!("   ✅ Configuration loaded successfully");
    println!("   📋 Environment: {}", cfg.environment());
    println!("   📊 Log Level: {}", cfg.log_level());
    println!("   🎯 Channel ID: {}", cfg.rules_channel());
    println!("   🏷️  Role ID: {}", cfg.comer_role());
    println!("   🔑 Token: {}", redact_token(cfg.discord_token()));
    println!("   🚪 Exit on ready failure: {}\n", cfg.exit_on_ready_failure());

    println!("2. Rules Content:");
    let len = RULES.chars().count();
    ensure!(!RULES.trim().is_empty(), "rules text is empty");
    ensure!(
        len <= EMBED_DESCRIPTION_LIMIT,
        "rules text is {len} characters, an embed description takes at most {EMBED_DESCRIPTION_LIMIT}"
    );
    println!("   ✅ \"{RULES_EMBED_TITLE}\" fits in one embed ({len}/{EMBED_DESCRIPTION_LIMIT} characters)\n");

    println!("3. Logger Test:");
    logging::init(cfg.log_level(), env!("CARGO_CRATE_NAME"))
        .context("installing the log subscriber")?;
    error!("Test error message");
    warn!("Test warning message");
    info!("Test info message");
    debug!("Test debug message");
    println!("   ✅ Logger working correctly (debug shows with LOG_LEVEL=debug)\n");

    Ok(())
}
