//! Logs in, waits for the ready event and disconnects.
//!
//! Exit status 0 when the bot came online, 1 otherwise.

use std::process::ExitCode;

use kuroukai::{
    bots::{check_health, CfgExt},
    immut_data::{consts::HEALTH_CHECK_TIMEOUT, dynamic::BotCfg},
    logging, Error,
};

#[tokio::main]
async fn main() -> ExitCode {
    println!("🏥 KuroukaiBot Health Check");

    let cfg = match BotCfg::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("❌ Health check failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(cfg.log_level(), env!("CARGO_CRATE_NAME")) {
        eprintln!("Failed to install the log subscriber: {e}");
    }

    match check_health(&cfg, HEALTH_CHECK_TIMEOUT).await {
        Ok(report) => {
            println!("✅ Bot is online and healthy");
            println!("📋 Bot User: {}", report.bot_tag);
            println!("🏠 Servers: {}", report.server_count);
            ExitCode::SUCCESS
        }
        Err(Error::HealthTimeout(_)) => {
            println!("❌ Health check timeout");
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("❌ Health check failed: {e}");
            ExitCode::FAILURE
        }
    }
}
