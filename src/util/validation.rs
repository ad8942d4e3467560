//! Shape checks for Discord identifiers and credentials.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens are three dot-separated segments and always longer than this.
pub const MIN_TOKEN_LEN: usize = 50;

static SNOWFLAKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{17,19}$").unwrap());

/// Whether `id` looks like a Discord snowflake: 17 to 19 ASCII digits.
pub fn is_valid_snowflake(id: &str) -> bool {
    SNOWFLAKE.is_match(id)
}

pub fn is_valid_discord_token(token: &str) -> bool {
    token.len() > MIN_TOKEN_LEN && token.contains('.')
}

/// Keeps the first segment of a token (the encoded bot id) and hides the rest.
pub fn redact_token(token: &str) -> String {
    match token.split_once('.') {
        Some((head, _)) => format!("{head}.[REDACTED]"),
        None => "[REDACTED]".to_owned(),
    }
}
