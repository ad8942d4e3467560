mod cfg_ext;
mod health_bot;
mod main_bot;

pub(crate) use cfg_ext::impl_cfg_ext;
pub use cfg_ext::CfgExt;
pub use health_bot::{check_health, HealthBot, HealthReport};
pub use main_bot::MainBot;
