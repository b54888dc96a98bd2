use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::config::{store::Configuration, RoleGated};

/// Round status settings (`round-status.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundStatusConfig {
    /// Game server address queried every tick.
    pub host: String,
    pub port: u16,
    /// Channel the status embed is posted to. `0` means unset.
    pub channel_id: u64,
    /// Role that always has access to the round status commands.
    pub main_role_id: u64,
    /// Further roles granted access to the round status commands.
    pub allowed_role_ids: BTreeSet<u64>,
    /// Role mentioned by the new-round announcement. `0` disables the mention.
    pub ping_role_id: u64,
    /// Connect link included in the new-round announcement.
    pub join_url: String,
    pub poll_interval_secs: u64,
}

impl Default for RoundStatusConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 0,
            channel_id: 0,
            main_role_id: 0,
            allowed_role_ids: BTreeSet::new(),
            ping_role_id: 0,
            join_url: String::new(),
            poll_interval_secs: 10,
        }
    }
}

impl Configuration for RoundStatusConfig {
    const NAME: &'static str = "round-status";
}

impl RoleGated for RoundStatusConfig {
    fn main_role_id(&self) -> u64 {
        self.main_role_id
    }

    fn allowed_role_ids(&self) -> &BTreeSet<u64> {
        &self.allowed_role_ids
    }

    fn allowed_role_ids_mut(&mut self) -> &mut BTreeSet<u64> {
        &mut self.allowed_role_ids
    }
}

impl RoundStatusConfig {
    /// Delay between the end of one poll and the start of the next, at least one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Text of the message posted alongside a fresh status embed.
    pub fn announcement(&self) -> String {
        let mut content = String::new();

        if self.ping_role_id != 0 {
            content.push_str(&format!("<@&{}> ", self.ping_role_id));
        }
        content.push_str("New round");
        if !self.join_url.is_empty() {
            content.push_str(&format!("```{}```", self.join_url));
        }

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests the announcement text.
    ///
    /// Verifies the role mention and join link are included only when configured.
    ///
    /// Expected: full text with both, plain "New round" with neither
    #[test]
    fn announcement_text() {
        let mut config = RoundStatusConfig {
            ping_role_id: 55,
            join_url: "byond://example.org:1337".to_string(),
            ..Default::default()
        };

        assert_eq!(
            config.announcement(),
            "<@&55> New round```byond://example.org:1337```"
        );

        config.ping_role_id = 0;
        config.join_url.clear();
        assert_eq!(config.announcement(), "New round");
    }

    /// Tests role based access.
    ///
    /// Expected: main role and allowed roles grant access, others do not
    #[test]
    fn access_by_role() {
        let config = RoundStatusConfig {
            main_role_id: 1,
            allowed_role_ids: BTreeSet::from([2, 3]),
            ..Default::default()
        };

        assert!(config.grants_access([1]));
        assert!(config.grants_access([9, 3]));
        assert!(!config.grants_access([9]));
        assert!(!config.grants_access([]));
    }

    /// Tests the poll interval floor.
    ///
    /// Expected: 0 becomes one second
    #[test]
    fn poll_interval_has_floor() {
        let config = RoundStatusConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };

        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
