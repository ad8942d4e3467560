//! In-memory [`Platform`] that records every call made against it.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use serenity::{
    async_trait,
    model::{
        id::{ChannelId, GuildId, InteractionId, MessageId, RoleId, UserId},
        permissions::Permissions,
    },
};

use super::{Acceptor, ButtonPress, Platform, PostedMessage, RoleRef, RulesChannel, RulesPost};

pub(crate) const BOT: UserId = UserId(100_000_000_000_000_001);
pub(crate) const GUILD: GuildId = GuildId(200_000_000_000_000_002);
pub(crate) const CHANNEL: ChannelId = ChannelId(300_000_000_000_000_003);
pub(crate) const ROLE: RoleId = RoleId(400_000_000_000_000_004);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Channel(ChannelId),
    RecentMessages(ChannelId, u64),
    SendRules(ChannelId, RulesPost),
    AddMemberRole(GuildId, UserId, RoleId),
    Acknowledge(InteractionId),
    FollowUp(InteractionId, String),
}

pub(crate) struct FakePlatform {
    pub(crate) channels: HashMap<ChannelId, RulesChannel>,
    pub(crate) roles: HashMap<(GuildId, RoleId), RoleRef>,
    /// `None` means the bot's own member is unknown.
    pub(crate) permissions: Option<Permissions>,
    /// Channel history, oldest first.
    pub(crate) history: Mutex<Vec<PostedMessage>>,
    pub(crate) fail_history: bool,
    pub(crate) fail_add_role: bool,
    pub(crate) fail_acknowledge: bool,
    pub(crate) fail_follow_up: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) next_message_id: Mutex<u64>,
}

impl Default for FakePlatform {
    /// A guild with the rules channel, the comer role and full permissions.
    fn default() -> Self {
        let channels = [(
            CHANNEL,
            RulesChannel {
                id: CHANNEL,
                guild_id: Some(GUILD),
            },
        )]
        .into_iter()
        .collect();
        let roles = [(
            (GUILD, ROLE),
            RoleRef {
                id: ROLE,
                name: "Comer".to_owned(),
            },
        )]
        .into_iter()
        .collect();
        Self {
            channels,
            roles,
            permissions: Some(Permissions::all()),
            history: Mutex::new(Vec::new()),
            fail_history: false,
            fail_add_role: false,
            fail_acknowledge: false,
            fail_follow_up: false,
            calls: Mutex::new(Vec::new()),
            next_message_id: Mutex::new(900_000_000_000_000_000),
        }
    }
}

impl FakePlatform {
    pub(crate) fn calls(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap()
    }

    pub(crate) fn sent(&self) -> Vec<RulesPost> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                Call::SendRules(_, post) => Some(post.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn grants(&self) -> Vec<(GuildId, UserId, RoleId)> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                Call::AddMemberRole(g, u, r) => Some((*g, *u, *r)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn replies(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                Call::FollowUp(_, content) => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    /// Appends a message to the channel history and returns it.
    pub(crate) fn post(&self, author: UserId, title: Option<&str>) -> PostedMessage {
        let msg = PostedMessage {
            id: self.next_id(),
            author,
            first_embed_title: title.map(str::to_owned),
        };
        self.history.lock().unwrap().push(msg.clone());
        msg
    }

    fn next_id(&self) -> MessageId {
        let mut next = self.next_message_id.lock().unwrap();
        *next += 1;
        MessageId(*next)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub(crate) fn press(custom_id: &str, user: UserId, roles: Vec<RoleId>) -> ButtonPress {
    ButtonPress {
        id: InteractionId(500_000_000_000_000_005),
        token: "interaction-token".to_owned(),
        custom_id: custom_id.to_owned(),
        guild_id: Some(GUILD),
        user_id: user,
        user_tag: "someone#0001".to_owned(),
        member: Some(Acceptor {
            user_id: user,
            tag: "someone#0001".to_owned(),
            roles,
        }),
    }
}

#[async_trait]
impl Platform for FakePlatform {
    fn bot_id(&self) -> UserId {
        BOT
    }

    async fn channel(&self, id: ChannelId) -> serenity::Result<RulesChannel> {
        self.record(Call::Channel(id));
        self.channels
            .get(&id)
            .copied()
            .ok_or(serenity::Error::Other("Unknown Channel"))
    }

    fn cached_role(&self, guild_id: GuildId, role_id: RoleId) -> Option<RoleRef> {
        self.roles.get(&(guild_id, role_id)).cloned()
    }

    fn bot_permissions_in(&self, _channel: &RulesChannel) -> Option<Permissions> {
        self.permissions
    }

    async fn recent_messages(
        &self,
        channel_id: ChannelId,
        limit: u64,
    ) -> serenity::Result<Vec<PostedMessage>> {
        self.record(Call::RecentMessages(channel_id, limit));
        if self.fail_history {
            return Err(serenity::Error::Other("Missing Access"));
        }
        let history = self.history.lock().unwrap();
        Ok(history.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn send_rules(
        &self,
        channel_id: ChannelId,
        post: &RulesPost,
    ) -> serenity::Result<PostedMessage> {
        self.record(Call::SendRules(channel_id, post.clone()));
        Ok(self.post(BOT, Some(&post.title)))
    }

    async fn add_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()> {
        self.record(Call::AddMemberRole(guild_id, user_id, role_id));
        if self.fail_add_role {
            return Err(serenity::Error::Other("Missing Permissions"));
        }
        Ok(())
    }

    async fn acknowledge(&self, press: &ButtonPress) -> serenity::Result<()> {
        self.record(Call::Acknowledge(press.id));
        if self.fail_acknowledge {
            return Err(serenity::Error::Other("Unknown interaction"));
        }
        Ok(())
    }

    async fn follow_up(&self, press: &ButtonPress, content: &str) -> serenity::Result<()> {
        self.record(Call::FollowUp(press.id, content.to_owned()));
        if self.fail_follow_up {
            return Err(serenity::Error::Other("Unknown Webhook"));
        }
        Ok(())
    }
}
