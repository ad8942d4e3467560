//! Rules-acceptance bot for a single Discord guild.
//!
//! On the first `ready` event the bot makes sure a rules message with an
//! accept button exists in the configured channel, and it grants the
//! configured role to every member who presses that button.

pub mod bots;
pub mod error;
pub mod gateway;
pub mod immut_data;
pub mod logging;
pub mod platform;
pub mod process;
pub mod rules;
pub mod util;

pub use error::{ConfigError, Error, Result};
