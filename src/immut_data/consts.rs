use std::time::Duration;

use serenity::{model::permissions::Permissions, prelude::GatewayIntents};

pub const RULES: &str = include_str!("../../rules.md");

pub const RULES_EMBED_TITLE: &str = "📜 Server Rules";
pub const RULES_EMBED_COLOUR: u32 = 0x00ff00;
/// Discord rejects embed descriptions longer than this.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

pub const ACCEPT_BUTTON_ID: &str = "accept_rules";
pub const ACCEPT_BUTTON_LABEL: &str = "✅ Accept";

/// How far back in the rules channel we look for an earlier rules post.
pub const MESSAGE_LIMIT: u64 = 50;

pub const RULES_PERMISSIONS: Permissions = {
    let send = Permissions::SEND_MESSAGES.bits();
    let embed = Permissions::EMBED_LINKS.bits();
    let emojis = Permissions::USE_EXTERNAL_EMOJIS.bits();
    Permissions::from_bits_truncate(send | embed | emojis)
};

pub const DISCORD_INTENTS: GatewayIntents = {
    let guilds = GatewayIntents::GUILDS.bits();
    let messages = GatewayIntents::GUILD_MESSAGES.bits();
    let members = GatewayIntents::GUILD_MEMBERS.bits();
    match GatewayIntents::from_bits(guilds | messages | members) {
        Some(intents) => intents,
        None => panic!("Invalid intents"),
    }
};

pub const HEALTH_CHECK_INTENTS: GatewayIntents = GatewayIntents::GUILDS;
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Time given to the log writers before a panicking process exits.
pub const PANIC_EXIT_GRACE: Duration = Duration::from_secs(1);
