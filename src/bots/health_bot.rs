use std::time::Duration;

use serenity::{
    async_trait,
    model::prelude::Ready,
    prelude::{Client, Context, EventHandler},
};
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    immut_data::{consts::HEALTH_CHECK_INTENTS, dynamic::BotCfg},
};

use super::CfgExt;

/// What a successful login reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub bot_tag: String,
    pub server_count: usize,
}

/// The bot structure used by the health check: it only waits for
/// [EventHandler::ready] and hands the result back.
///
/// The actual bot is [`MainBot`](crate::bots::MainBot).
pub struct HealthBot {
    ready: Mutex<Option<oneshot::Sender<HealthReport>>>,
}

impl HealthBot {
    pub fn new(ready: oneshot::Sender<HealthReport>) -> Self {
        Self {
            ready: Mutex::new(Some(ready)),
        }
    }
}

#[async_trait]
impl EventHandler for HealthBot {
    async fn ready(&self, _: Context, ready: Ready) {
        let report = HealthReport {
            bot_tag: ready.user.tag(),
            server_count: ready.guilds.len(),
        };
        if let Some(tx) = self.ready.lock().await.take() {
            // the receiver is gone once the check has timed out
            let _ = tx.send(report);
        }
    }
}

/// Logs in with a minimal client and waits at most `timeout` for the ready
/// event, then disconnects.
pub async fn check_health(cfg: &BotCfg, timeout: Duration) -> Result<HealthReport> {
    let (tx, rx) = oneshot::channel();
    let mut client = Client::builder(cfg.discord_token(), HEALTH_CHECK_INTENTS)
        .event_handler(HealthBot::new(tx))
        .await?;
    let shard_manager = client.shard_manager.clone();

    debug!(?timeout, "Waiting for the ready event");
    let connection = tokio::spawn(async move { client.start().await });

    let res = match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(report)) => Ok(report),
        // the client, and with it the sender, went away before ready
        Ok(Err(_)) => Err(Error::HealthAborted),
        Err(_) => Err(Error::HealthTimeout(timeout)),
    };

    shard_manager.lock().await.shutdown_all().await;

    if matches!(res, Err(Error::HealthAborted)) {
        if let Ok(Err(e)) = connection.await {
            return Err(e.into());
        }
    } else {
        connection.abort();
    }

    if let Ok(ref report) = res {
        info!(bot_tag = %report.bot_tag, server_count = report.server_count, "Health check passed");
    }
    res
}
