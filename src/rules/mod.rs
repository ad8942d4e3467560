//! Posting the rules message and granting the comer role.

use std::sync::Arc;

use serenity::model::id::ChannelId;
use tracing::{debug, error, info, warn};

use crate::{
    bots::{impl_cfg_ext, CfgExt},
    error::{Error, Result},
    gateway::Gateway,
    immut_data::{
        consts::{
            ACCEPT_BUTTON_ID, ACCEPT_BUTTON_LABEL, MESSAGE_LIMIT, RULES_EMBED_COLOUR,
            RULES_EMBED_TITLE, RULES_PERMISSIONS,
        },
        dynamic::BotCfg,
    },
    platform::{ButtonPress, Platform, PostedMessage, RulesPost},
};

mod outcome;

pub use outcome::{RoleGrantOutcome, GENERIC_FAILURE_REPLY};

/// The two entry points of the rules workflow, over any [`Platform`].
///
/// A service is cheap to build; the event handler makes one per event.
pub struct RulesService<P> {
    gateway: Gateway<P>,
    cfg: Arc<BotCfg>,
}

impl_cfg_ext!(impl<P> RulesService<P>);

impl<P: Platform> RulesService<P> {
    pub fn new(platform: P, cfg: Arc<BotCfg>) -> Self {
        Self {
            gateway: Gateway::new(platform),
            cfg,
        }
    }

    pub fn gateway(&self) -> &Gateway<P> {
        &self.gateway
    }

    pub fn rules_post(rules_text: &str) -> RulesPost {
        RulesPost {
            title: RULES_EMBED_TITLE.to_owned(),
            body: rules_text.to_owned(),
            colour: RULES_EMBED_COLOUR,
            button_id: ACCEPT_BUTTON_ID.to_owned(),
            button_label: ACCEPT_BUTTON_LABEL.to_owned(),
        }
    }

    /// Makes sure the rules message is present in `channel_id`, posting it if
    /// needed.
    ///
    /// Only the newest [`MESSAGE_LIMIT`] messages are searched for an earlier
    /// post by the bot. A rules message pushed further back than that is not
    /// seen, and a second one gets posted.
    pub async fn ensure_rules_posted(
        &self,
        channel_id: ChannelId,
        rules_text: &str,
    ) -> Result<PostedMessage> {
        let res = self.try_ensure_rules_posted(channel_id, rules_text).await;
        if let Err(ref e) = res {
            error!(channel_id = %channel_id, error = %e, "Failed to send rules message");
        }
        res
    }

    async fn try_ensure_rules_posted(
        &self,
        channel_id: ChannelId,
        rules_text: &str,
    ) -> Result<PostedMessage> {
        let channel = self
            .gateway
            .fetch_channel(channel_id)
            .await
            .ok_or(Error::ChannelNotFound(channel_id))?;

        if !self.gateway.bot_has_permissions(&channel, RULES_PERMISSIONS) {
            return Err(Error::PermissionDenied {
                channel: channel_id,
                required: RULES_PERMISSIONS,
            });
        }

        if let Some(existing) = self.find_existing_rules_message(channel_id).await? {
            info!(
                channel_id = %channel_id,
                message_id = %existing.id,
                "Rules message already exists, skipping send"
            );
            return Ok(existing);
        }

        let post = Self::rules_post(rules_text);
        let msg = self.gateway.platform().send_rules(channel_id, &post).await?;
        info!(
            channel_id = %channel_id,
            message_id = %msg.id,
            "Rules message sent successfully"
        );
        Ok(msg)
    }

    async fn find_existing_rules_message(
        &self,
        channel_id: ChannelId,
    ) -> Result<Option<PostedMessage>> {
        let bot_id = self.gateway.platform().bot_id();
        let messages = self
            .gateway
            .platform()
            .recent_messages(channel_id, MESSAGE_LIMIT)
            .await
            .map_err(|e| {
                error!(channel_id = %channel_id, error = %e, "Failed to fetch messages from channel");
                e
            })?;
        Ok(messages.into_iter().find(|msg| {
            msg.author == bot_id && msg.first_embed_title.as_deref() == Some(RULES_EMBED_TITLE)
        }))
    }

    /// Routes a button press. Presses of buttons other than the accept button
    /// are logged and left alone.
    pub async fn dispatch_button(&self, press: &ButtonPress) -> Option<RoleGrantOutcome> {
        debug!(
            custom_id = %press.custom_id,
            user_id = %press.user_id,
            user_tag = %press.user_tag,
            guild_id = ?press.guild_id.map(|g| g.0),
            "Button interaction received"
        );
        if press.custom_id == ACCEPT_BUTTON_ID {
            return self.handle_acceptance(press).await;
        }
        warn!(
            custom_id = %press.custom_id,
            user_id = %press.user_id,
            "Unhandled button interaction"
        );
        None
    }

    /// Grants the comer role to whoever pressed the accept button.
    ///
    /// Returns `None` when the press could not be handled at all; the member
    /// is then sent a generic failure reply.
    pub async fn handle_acceptance(&self, press: &ButtonPress) -> Option<RoleGrantOutcome> {
        match self.grant_on_acceptance(press).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(
                    interaction_id = %press.id,
                    custom_id = %press.custom_id,
                    user_id = %press.user_id,
                    user_tag = %press.user_tag,
                    error = %e,
                    "Failed to handle rule acceptance"
                );
                if let Err(e) = self
                    .gateway
                    .platform()
                    .follow_up(press, GENERIC_FAILURE_REPLY)
                    .await
                {
                    error!(
                        interaction_id = %press.id,
                        error = %e,
                        "Failed to send error response to interaction"
                    );
                }
                None
            }
        }
    }

    async fn grant_on_acceptance(&self, press: &ButtonPress) -> Result<RoleGrantOutcome> {
        // the platform fails interactions that are not acknowledged quickly
        self.gateway.platform().acknowledge(press).await?;

        let (Some(guild_id), Some(member)) = (press.guild_id, press.member.as_ref()) else {
            return Err(Error::OutsideGuild(press.id));
        };

        let role_id = self.comer_role();
        let outcome = match self.gateway.fetch_role(guild_id, role_id) {
            None => {
                error!(role_id = %role_id, guild_id = %guild_id, "Role not found");
                RoleGrantOutcome::RoleNotFound
            }
            Some(_) if Gateway::<P>::member_has_role(member, role_id) => {
                RoleGrantOutcome::AlreadyHasRole
            }
            Some(role) => {
                if self.gateway.add_role_to_member(guild_id, member, &role).await {
                    RoleGrantOutcome::Success
                } else {
                    RoleGrantOutcome::AddFailed
                }
            }
        };

        self.gateway
            .platform()
            .follow_up(press, outcome.reply())
            .await?;
        Ok(outcome)
    }
}
