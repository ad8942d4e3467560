//! Failure-absorbing facade over a [`Platform`].
//!
//! Every method here logs platform failures and reports them as `None` or
//! `false`, so callers can be written as straight-line logic.

use serenity::model::{
    id::{ChannelId, GuildId, RoleId},
    permissions::Permissions,
};
use tracing::{error, info};

use crate::platform::{Acceptor, Platform, RoleRef, RulesChannel};

pub struct Gateway<P> {
    platform: P,
}

impl<P: Platform> Gateway<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub async fn fetch_channel(&self, channel_id: ChannelId) -> Option<RulesChannel> {
        match self.platform.channel(channel_id).await {
            Ok(channel) => Some(channel),
            Err(e) => {
                error!(channel_id = %channel_id, error = %e, "Failed to fetch channel");
                None
            }
        }
    }

    pub fn fetch_role(&self, guild_id: GuildId, role_id: RoleId) -> Option<RoleRef> {
        self.platform.cached_role(guild_id, role_id)
    }

    pub fn member_has_role(member: &Acceptor, role_id: RoleId) -> bool {
        member.roles.contains(&role_id)
    }

    pub async fn add_role_to_member(
        &self,
        guild_id: GuildId,
        member: &Acceptor,
        role: &RoleRef,
    ) -> bool {
        match self
            .platform
            .add_member_role(guild_id, member.user_id, role.id)
            .await
        {
            Ok(()) => {
                info!(
                    user_id = %member.user_id,
                    user_tag = %member.tag,
                    role_id = %role.id,
                    role_name = %role.name,
                    "Role added to member"
                );
                true
            }
            Err(e) => {
                error!(
                    user_id = %member.user_id,
                    user_tag = %member.tag,
                    role_id = %role.id,
                    role_name = %role.name,
                    error = %e,
                    "Failed to add role to member"
                );
                false
            }
        }
    }

    /// Channels outside a guild always pass. In a guild channel the bot must
    /// hold every `required` permission; an unresolvable bot member fails.
    pub fn bot_has_permissions(&self, channel: &RulesChannel, required: Permissions) -> bool {
        if channel.guild_id.is_none() {
            return true;
        }
        match self.platform.bot_permissions_in(channel) {
            Some(granted) => granted.contains(required),
            None => false,
        }
    }
}
