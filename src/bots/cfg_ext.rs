use serenity::model::id::{ChannelId, RoleId};

use crate::immut_data::dynamic::{BotCfg, LogLevel, DEFAULT_ENVIRONMENT, PRODUCTION};

/// Read-only access to the [`BotCfg`].
pub trait CfgExt {
    fn discord_token(&self) -> &str;
    fn rules_channel(&self) -> ChannelId;
    fn comer_role(&self) -> RoleId;
    fn environment(&self) -> &str;
    fn log_level(&self) -> LogLevel;
    /// Whether a failed rules check on `ready` should take the process down.
    fn exit_on_ready_failure(&self) -> bool;

    fn is_development(&self) -> bool {
        self.environment() == DEFAULT_ENVIRONMENT
    }

    fn is_production(&self) -> bool {
        self.environment() == PRODUCTION
    }
}

impl CfgExt for BotCfg {
    fn discord_token(&self) -> &str {
        &self.discord_token
    }

    fn rules_channel(&self) -> ChannelId {
        self.rules_channel
    }

    fn comer_role(&self) -> RoleId {
        self.comer_role
    }

    fn environment(&self) -> &str {
        &self.environment
    }

    fn log_level(&self) -> LogLevel {
        self.log_level
    }

    fn exit_on_ready_failure(&self) -> bool {
        self.exit_on_ready_failure
    }
}

/// Implements [`CfgExt`] for a type with a `cfg` field that derefs to [`BotCfg`].
///
/// Generic types list their parameters up front: `impl_cfg_ext!(impl<P> Foo<P>)`.
macro_rules! impl_cfg_ext {
    (impl<$($g:ident),*> $t:ty) => {
        impl<$($g),*> crate::bots::CfgExt for $t {
            fn discord_token(&self) -> &str {
                crate::bots::CfgExt::discord_token(&*self.cfg)
            }

            fn rules_channel(&self) -> serenity::model::id::ChannelId {
                crate::bots::CfgExt::rules_channel(&*self.cfg)
            }

            fn comer_role(&self) -> serenity::model::id::RoleId {
                crate::bots::CfgExt::comer_role(&*self.cfg)
            }

            fn environment(&self) -> &str {
                crate::bots::CfgExt::environment(&*self.cfg)
            }

            fn log_level(&self) -> crate::immut_data::dynamic::LogLevel {
                crate::bots::CfgExt::log_level(&*self.cfg)
            }

            fn exit_on_ready_failure(&self) -> bool {
                crate::bots::CfgExt::exit_on_ready_failure(&*self.cfg)
            }
        }
    };
    ($t:ty) => {
        crate::bots::impl_cfg_ext!(impl<> $t);
    };
}

pub(crate) use impl_cfg_ext;
