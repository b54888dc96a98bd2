//! Process configuration and persisted bot settings.
//!
//! Environment variables only locate the settings directory and optionally supply
//! the bot token. Everything else lives in JSON files managed by [`store::ConfigStore`].

pub mod bot;
pub mod open_ai;
pub mod round_status;
pub mod store;

use std::{collections::BTreeSet, path::PathBuf, sync::Arc};

use tokio::sync::RwLock;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_CONFIG_DIR: &str = "config";

/// Settings shared between the poller and the slash command handlers.
///
/// Handlers mutate the in-memory copy and save it explicitly; the poller reads it
/// on every tick.
pub type SharedConfig<T> = Arc<RwLock<T>>;

/// Settings whose slash commands are limited to a main role plus allowed roles.
pub trait RoleGated {
    fn main_role_id(&self) -> u64;

    fn allowed_role_ids(&self) -> &BTreeSet<u64>;

    fn allowed_role_ids_mut(&mut self) -> &mut BTreeSet<u64>;

    /// Whether a member holding `roles` may use the commands.
    fn grants_access(&self, roles: impl IntoIterator<Item = u64>) -> bool {
        roles.into_iter().any(|role| {
            role == self.main_role_id() || self.allowed_role_ids().contains(&role)
        })
    }
}

pub struct Config {
    /// Directory holding `<name>.json` settings files.
    pub config_dir: PathBuf,
    /// Token from `DISCORD_BOT_TOKEN`, preferred over the one stored in `bot.json`.
    pub bot_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let config_dir = std::env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let bot_token = std::env::var("DISCORD_BOT_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Ok(Self {
            config_dir,
            bot_token,
        })
    }

    /// Picks the token to log in with.
    ///
    /// # Returns
    /// - `Ok(String)` - Environment token if set, otherwise the stored one
    /// - `Err(ConfigError::MissingEnvVar)` - Neither source provides a token
    pub fn resolve_token(&self, stored: &str) -> Result<String, ConfigError> {
        if let Some(token) = &self.bot_token {
            return Ok(token.clone());
        }

        if stored.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()));
        }

        Ok(stored.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> Config {
        Config {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            bot_token: token.map(str::to_string),
        }
    }

    /// Tests token resolution precedence.
    ///
    /// Verifies that the environment token wins over the stored token and that the
    /// stored token is used when the environment has none.
    ///
    /// Expected: "env" then "stored"
    #[test]
    fn env_token_overrides_stored() {
        assert_eq!(config(Some("env")).resolve_token("stored").unwrap(), "env");
        assert_eq!(config(None).resolve_token("stored").unwrap(), "stored");
    }

    /// Tests token resolution with no token anywhere.
    ///
    /// Expected: Err(MissingEnvVar)
    #[test]
    fn missing_token_fails() {
        let result = config(None).resolve_token("  ");

        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }
}
