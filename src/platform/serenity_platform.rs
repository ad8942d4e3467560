use std::sync::Arc;

use serde_json::{json, Value};
use serenity::{
    async_trait,
    cache::Cache,
    http::Http,
    model::{
        application::{
            component::ButtonStyle,
            interaction::{
                message_component::MessageComponentInteraction, InteractionResponseType,
                MessageFlags,
            },
        },
        channel::{Channel, Message},
        id::{ChannelId, GuildId, RoleId, UserId},
        permissions::Permissions,
    },
    prelude::Context,
};

use super::{Acceptor, ButtonPress, Platform, PostedMessage, RoleRef, RulesChannel, RulesPost};

/// [`Platform`] backed by serenity's HTTP client and gateway cache.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    bot_id: UserId,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>, bot_id: UserId) -> Self {
        Self { http, cache, bot_id }
    }

    pub fn from_context(ctx: &Context, bot_id: UserId) -> Self {
        Self::new(ctx.http.clone(), ctx.cache.clone(), bot_id)
    }
}

/// Acknowledges a component interaction without touching its message.
fn deferred_update_body() -> Value {
    json!({ "type": InteractionResponseType::DeferredUpdateMessage as u8 })
}

fn ephemeral_body(content: &str) -> Value {
    json!({
        "content": content,
        "flags": MessageFlags::EPHEMERAL.bits(),
    })
}

impl From<Message> for PostedMessage {
    fn from(msg: Message) -> Self {
        let first_embed_title = msg.embeds.into_iter().next().and_then(|e| e.title);
        Self {
            id: msg.id,
            author: msg.author.id,
            first_embed_title,
        }
    }
}

impl From<&MessageComponentInteraction> for ButtonPress {
    fn from(component: &MessageComponentInteraction) -> Self {
        let member = component.member.as_ref().map(|m| Acceptor {
            user_id: m.user.id,
            tag: m.user.tag(),
            roles: m.roles.clone(),
        });
        Self {
            id: component.id,
            token: component.token.clone(),
            custom_id: component.data.custom_id.clone(),
            guild_id: component.guild_id,
            user_id: component.user.id,
            user_tag: component.user.tag(),
            member,
        }
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    fn bot_id(&self) -> UserId {
        self.bot_id
    }

    async fn channel(&self, id: ChannelId) -> serenity::Result<RulesChannel> {
        let guild_id = match self.http.get_channel(id.0).await? {
            Channel::Guild(channel) => Some(channel.guild_id),
            Channel::Category(category) => Some(category.guild_id),
            _ => None,
        };
        Ok(RulesChannel { id, guild_id })
    }

    fn cached_role(&self, guild_id: GuildId, role_id: RoleId) -> Option<RoleRef> {
        self.cache.role(guild_id, role_id).map(|role| RoleRef {
            id: role.id,
            name: role.name,
        })
    }

    fn bot_permissions_in(&self, channel: &RulesChannel) -> Option<Permissions> {
        let guild_channel = self.cache.guild_channel(channel.id)?;
        guild_channel
            .permissions_for_user(&self.cache, self.bot_id)
            .ok()
    }

    async fn recent_messages(
        &self,
        channel_id: ChannelId,
        limit: u64,
    ) -> serenity::Result<Vec<PostedMessage>> {
        let messages = channel_id
            .messages(&self.http, |retriever| retriever.limit(limit))
            .await?;
        Ok(messages.into_iter().map(PostedMessage::from).collect())
    }

    async fn send_rules(
        &self,
        channel_id: ChannelId,
        post: &RulesPost,
    ) -> serenity::Result<PostedMessage> {
        let msg = channel_id
            .send_message(&self.http, |m| {
                m.embed(|e| {
                    e.title(&post.title)
                        .description(&post.body)
                        .colour(post.colour)
                })
                .components(|c| {
                    c.create_action_row(|row| {
                        row.create_button(|b| {
                            b.custom_id(&post.button_id)
                                .label(&post.button_label)
                                .style(ButtonStyle::Success)
                        })
                    })
                })
            })
            .await?;
        Ok(msg.into())
    }

    async fn add_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()> {
        self.http
            .add_member_role(guild_id.0, user_id.0, role_id.0, Some("Accepted the server rules"))
            .await
    }

    async fn acknowledge(&self, press: &ButtonPress) -> serenity::Result<()> {
        self.http
            .create_interaction_response(press.id.0, &press.token, &deferred_update_body())
            .await
    }

    async fn follow_up(&self, press: &ButtonPress, content: &str) -> serenity::Result<()> {
        let message = ephemeral_body(content);
        self.http
            .create_followup_message(&press.token, &message)
            .await?;
        Ok(())
    }
}
