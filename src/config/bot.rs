use serde::{Deserialize, Serialize};

use crate::{config::store::Configuration, error::config::ConfigError};

/// Bot account settings (`bot.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub token: String,
    pub command_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: "!".to_string(),
        }
    }
}

impl Configuration for BotConfig {
    const NAME: &'static str = "bot";
}

impl BotConfig {
    /// Rejects prefixes that collide with Discord's slash commands.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_prefix.trim().is_empty() || self.command_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "command_prefix",
                reason: format!("'{}' cannot be used as a prefix", self.command_prefix),
            });
        }

        Ok(())
    }
}
