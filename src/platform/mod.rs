//! The seam between the rules workflow and Discord.
//!
//! [`Platform`] is the raw surface the bot needs from the chat platform.
//! Its methods report failures as they happen; turning those failures into
//! quiet `Option`/`bool` results is the job of [`Gateway`](crate::gateway::Gateway).
//! The production implementation is [`SerenityPlatform`]; tests use
//! `fake::FakePlatform`.

use serenity::{
    async_trait,
    model::{
        id::{ChannelId, GuildId, InteractionId, MessageId, RoleId, UserId},
        permissions::Permissions,
    },
};

#[cfg(test)]
pub(crate) mod fake;
mod serenity_platform;

pub use serenity_platform::SerenityPlatform;

/// A channel as far as the rules workflow cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesChannel {
    pub id: ChannelId,
    /// `None` for direct-message style channels.
    pub guild_id: Option<GuildId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRef {
    pub id: RoleId,
    pub name: String,
}

/// A message already sitting in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub id: MessageId,
    pub author: UserId,
    pub first_embed_title: Option<String>,
}

/// Everything needed to render the rules post: one embed and one button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesPost {
    pub title: String,
    pub body: String,
    pub colour: u32,
    pub button_id: String,
    pub button_label: String,
}

/// The guild member behind an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptor {
    pub user_id: UserId,
    pub tag: String,
    pub roles: Vec<RoleId>,
}

/// A button click on one of the bot's messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPress {
    pub id: InteractionId,
    pub token: String,
    pub custom_id: String,
    pub guild_id: Option<GuildId>,
    pub user_id: UserId,
    pub user_tag: String,
    /// Absent when the button was pressed outside a guild.
    pub member: Option<Acceptor>,
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// The bot's own user id.
    fn bot_id(&self) -> UserId;

    async fn channel(&self, id: ChannelId) -> serenity::Result<RulesChannel>;

    /// Looks the role up in the cached role set of the guild.
    fn cached_role(&self, guild_id: GuildId, role_id: RoleId) -> Option<RoleRef>;

    /// The bot's effective permissions in a guild channel, or `None` when the
    /// bot's own member cannot be resolved.
    fn bot_permissions_in(&self, channel: &RulesChannel) -> Option<Permissions>;

    /// At most `limit` messages, newest first.
    async fn recent_messages(
        &self,
        channel_id: ChannelId,
        limit: u64,
    ) -> serenity::Result<Vec<PostedMessage>>;

    async fn send_rules(
        &self,
        channel_id: ChannelId,
        post: &RulesPost,
    ) -> serenity::Result<PostedMessage>;

    async fn add_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()>;

    /// Acknowledges the press without changing the message it belongs to.
    async fn acknowledge(&self, press: &ButtonPress) -> serenity::Result<()>;

    /// Replies to an acknowledged press with a message only its author sees.
    async fn follow_up(&self, press: &ButtonPress, content: &str) -> serenity::Result<()>;
}
