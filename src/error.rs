use std::time::Duration;

use serenity::model::{
    id::{ChannelId, InteractionId},
    permissions::Permissions,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Channel not found: {0}")]
    ChannelNotFound(ChannelId),
    #[error("Bot missing required permissions {required:?} in channel {channel}")]
    PermissionDenied {
        channel: ChannelId,
        required: Permissions,
    },
    #[error("Interaction {0} was not issued from within a guild")]
    OutsideGuild(InteractionId),
    #[error("Health check timed out after {0:?}")]
    HealthTimeout(Duration),
    #[error("Client stopped before the ready event")]
    HealthAborted,
    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Problems with the process environment, detected once at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("Invalid {key} format: {reason}")]
    Format {
        key: &'static str,
        reason: &'static str,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
