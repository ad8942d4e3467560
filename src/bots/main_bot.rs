use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serenity::{
    async_trait,
    client::bridge::gateway::event::ShardStageUpdateEvent,
    gateway::ConnectionStage,
    model::{
        application::interaction::Interaction,
        id::GuildId,
        prelude::{Ready, ResumedEvent},
    },
    prelude::{Context, EventHandler},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::{
    error::Error,
    immut_data::{consts::RULES, dynamic::BotCfg},
    platform::{ButtonPress, Platform, SerenityPlatform},
    rules::RulesService,
};

use super::{cfg_ext::impl_cfg_ext, CfgExt};

/// The bot structure that is used to
///
/// * make sure the rules message exists once [EventHandler::cache_ready] fires.
/// * route accept-button presses from [EventHandler::interaction_create].
///
/// `ready` only carries unavailable guilds; channels and members land in the
/// cache with the `GUILD_CREATE` events that follow it, and the permission
/// check needs both.
///
/// The handler holds no mutable state apart from the guard that keeps the
/// rules check to a single run; every event works from the shared [`BotCfg`].
pub struct MainBot {
    cfg: Arc<BotCfg>,
    rules_checked: AtomicBool,
    /// Where a fatal startup failure is reported when the exit policy asks
    /// for one.
    fatal: UnboundedSender<Error>,
}

impl MainBot {
    pub fn new(cfg: Arc<BotCfg>, fatal: UnboundedSender<Error>) -> Self {
        Self {
            cfg,
            rules_checked: AtomicBool::new(false),
            fatal,
        }
    }

    fn rules_service(&self, ctx: &Context) -> RulesService<SerenityPlatform> {
        let bot_id = ctx.cache.current_user_id();
        let platform = SerenityPlatform::from_context(ctx, bot_id);
        RulesService::new(platform, self.cfg.clone())
    }

    /// Runs the rules check on the first call only. A failure is passed on to
    /// the process when the exit policy asks for it.
    async fn check_rules_once<P: Platform>(&self, service: &RulesService<P>) {
        if self.rules_checked.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Err(e) = service.ensure_rules_posted(self.rules_channel(), RULES).await {
            error!(error = %e, "Error during startup rules check");
            if self.exit_on_ready_failure() && self.fatal.send(e).is_err() {
                error!("Shutdown channel closed; cannot stop after failed rules check");
            }
        }
    }
}

impl_cfg_ext!(MainBot);

#[async_trait]
impl EventHandler for MainBot {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user_id = %ready.user.id,
            server_count = ready.guilds.len(),
            "Bot logged in as {}",
            ready.user.tag()
        );
    }

    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        debug!(guild_count = guilds.len(), "Guilds cached");
        // also fires after a reconnect
        self.check_rules_once(&self.rules_service(&ctx)).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::MessageComponent(component) = interaction else {
            return;
        };
        let press = ButtonPress::from(&component);
        self.rules_service(&ctx).dispatch_button(&press).await;
    }

    async fn resume(&self, _ctx: Context, _: ResumedEvent) {
        info!("Gateway session resumed");
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        match event.new {
            ConnectionStage::Disconnected | ConnectionStage::Resuming => warn!(
                shard_id = event.shard_id.0,
                from = ?event.old,
                to = ?event.new,
                "Discord client warning: shard connection interrupted"
            ),
            _ if self.is_development() => debug!(
                shard_id = event.shard_id.0,
                from = ?event.old,
                to = ?event.new,
                "Shard stage changed"
            ),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use serenity::model::permissions::Permissions;
    use tokio::sync::mpsc;

    use super::*;
    use crate::platform::fake::{Call, FakePlatform, CHANNEL, ROLE};

    fn cfg(environment: &str) -> Arc<BotCfg> {
        let token = format!("{}.{}.{}", "a".repeat(24), "b".repeat(6), "c".repeat(27));
        let cfg = BotCfg::from_lookup(|key| match key {
            "DISCORD_TOKEN" => Some(token.clone()),
            "CHANNEL_RULES_ID" => Some(CHANNEL.0.to_string()),
            "ROLE_COMER_ID" => Some(ROLE.0.to_string()),
            "APP_ENV" => Some(environment.to_owned()),
            _ => None,
        })
        .unwrap();
        Arc::new(cfg)
    }

    #[tokio::test]
    async fn rules_check_runs_once() {
        let cfg = cfg("development");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bot = MainBot::new(cfg.clone(), tx);
        let service = RulesService::new(FakePlatform::default(), cfg);

        bot.check_rules_once(&service).await;
        bot.check_rules_once(&service).await;

        {
            let calls = service.gateway().platform().calls();
            assert_eq!(calls.first(), Some(&Call::Channel(CHANNEL)));
            assert_eq!(calls.iter().filter(|c| matches!(c, Call::Channel(_))).count(), 1);
        }
        assert_eq!(service.gateway().platform().sent().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn uncached_bot_member_is_fatal_in_production() {
        let uncached = || FakePlatform {
            permissions: None,
            ..FakePlatform::default()
        };

        let production = cfg("production");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bot = MainBot::new(production.clone(), tx);
        bot.check_rules_once(&RulesService::new(uncached(), production)).await;
        assert!(matches!(
            rx.try_recv(),
            Ok(Error::PermissionDenied { channel, .. }) if channel == CHANNEL
        ));

        let development = cfg("development");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bot = MainBot::new(development.clone(), tx);
        let service = RulesService::new(uncached(), development);
        bot.check_rules_once(&service).await;
        assert!(rx.try_recv().is_err());
        assert!(service.gateway().platform().sent().is_empty());
    }

    #[tokio::test]
    async fn cached_permissions_let_the_check_post() {
        let cfg = cfg("production");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bot = MainBot::new(cfg.clone(), tx);
        let service = RulesService::new(
            FakePlatform {
                permissions: Some(
                    Permissions::SEND_MESSAGES
                        | Permissions::EMBED_LINKS
                        | Permissions::USE_EXTERNAL_EMOJIS,
                ),
                ..FakePlatform::default()
            },
            cfg,
        );
        bot.check_rules_once(&service).await;
        assert_eq!(service.gateway().platform().sent().len(), 1);
        assert!(rx.try_recv().is_err());
    }
}
