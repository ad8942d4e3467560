use std::{fmt, str::FromStr};

use serenity::model::id::{ChannelId, RoleId};
use tracing::level_filters::LevelFilter;

use crate::{
    error::ConfigError,
    util::validation::{is_valid_discord_token, is_valid_snowflake, redact_token},
};

pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";
pub const CHANNEL_RULES_ID: &str = "CHANNEL_RULES_ID";
pub const ROLE_COMER_ID: &str = "ROLE_COMER_ID";
pub const APP_ENV: &str = "APP_ENV";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const EXIT_ON_READY_FAILURE: &str = "EXIT_ON_READY_FAILURE";

const REQUIRED: [&str; 3] = [DISCORD_TOKEN, CHANNEL_RULES_ID, ROLE_COMER_ID];

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const PRODUCTION: &str = "production";

/// Verbosity threshold, ordered from the quietest to the chattiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(s)
    }
}

/// The configuration of the bot.
///
/// Built once at startup and shared read-only (usually behind an `Arc`) for
/// the lifetime of the process. Read it through [`CfgExt`](crate::bots::CfgExt).
#[derive(Clone, PartialEq, Eq)]
pub struct BotCfg {
    pub(crate) discord_token: String,
    pub(crate) rules_channel: ChannelId,
    pub(crate) comer_role: RoleId,
    pub(crate) environment: String,
    pub(crate) log_level: LogLevel,
    pub(crate) exit_on_ready_failure: bool,
}

impl BotCfg {
    /// Reads the configuration from the process environment, honouring a
    /// `.env` file in the working directory if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as missing. Every missing required key is reported
    /// at once, before any format check runs.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = REQUIRED
            .into_iter()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let discord_token = get(DISCORD_TOKEN).unwrap_or_default();
        if !is_valid_discord_token(&discord_token) {
            return Err(ConfigError::Format {
                key: DISCORD_TOKEN,
                reason: "expected a dot-separated token longer than 50 characters",
            });
        }
        let rules_channel = ChannelId(snowflake(CHANNEL_RULES_ID, get(CHANNEL_RULES_ID))?);
        let comer_role = RoleId(snowflake(ROLE_COMER_ID, get(ROLE_COMER_ID))?);

        let environment = get(APP_ENV).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());
        // unknown levels fall back to the default rather than failing startup
        let log_level = get(LOG_LEVEL)
            .and_then(|level| level.parse().ok())
            .unwrap_or_default();
        let exit_on_ready_failure = match get(EXIT_ON_READY_FAILURE) {
            Some(flag) => parse_flag(EXIT_ON_READY_FAILURE, &flag)?,
            None => environment == PRODUCTION,
        };

        Ok(Self {
            discord_token,
            rules_channel,
            comer_role,
            environment,
            log_level,
            exit_on_ready_failure,
        })
    }
}

fn snowflake(key: &'static str, value: Option<String>) -> Result<u64, ConfigError> {
    let invalid = ConfigError::Format {
        key,
        reason: "expected a snowflake of 17 to 19 digits",
    };
    match value {
        Some(v) if is_valid_snowflake(&v) => v.parse().map_err(|_| invalid),
        _ => Err(invalid),
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Format {
            key,
            reason: "expected true or false",
        }),
    }
}

impl fmt::Debug for BotCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotCfg")
            .field("discord_token", &redact_token(&self.discord_token))
            .field("rules_channel", &self.rules_channel)
            .field("comer_role", &self.comer_role)
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("exit_on_ready_failure", &self.exit_on_ready_failure)
            .finish()
    }
}
