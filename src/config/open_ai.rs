use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    config::{store::Configuration, RoleGated},
    error::settings::SettingsError,
};

/// How assistant answers are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantMode {
    /// Reply with the first chunk and keep editing the reply as text arrives.
    Stream,
    /// Wait for the run to finish and reply once with the full answer.
    ///
    /// Unrecognized values in the settings file fall back to this mode.
    #[default]
    #[serde(other)]
    NoStream,
}

impl AssistantMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::NoStream => "no_stream",
        }
    }
}

impl fmt::Display for AssistantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssistantMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stream" => Ok(Self::Stream),
            "no_stream" => Ok(Self::NoStream),
            _ => Err(SettingsError::InvalidMode),
        }
    }
}

/// Assistant settings (`open-ai.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Role that always has access to the assistant commands.
    pub main_role_id: u64,
    pub allowed_role_ids: BTreeSet<u64>,
    pub api_key: String,
    pub assistant_id: String,
    /// Sent as `OpenAI-Organization` when not empty.
    pub organization_id: String,
    /// Sent as `OpenAI-Project` when not empty.
    pub project_id: String,
    /// Conversation thread every prompt is appended to.
    pub thread_id: String,
    pub mode: AssistantMode,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            main_role_id: 0,
            allowed_role_ids: BTreeSet::new(),
            api_key: String::new(),
            assistant_id: String::new(),
            organization_id: String::new(),
            project_id: String::new(),
            thread_id: String::new(),
            mode: AssistantMode::NoStream,
        }
    }
}

impl Configuration for OpenAiConfig {
    const NAME: &'static str = "open-ai";
}

impl RoleGated for OpenAiConfig {
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

impl OpenAiConfig {
    /// Whether prompts can be sent: a key, an assistant and a thread are all set.
    pub fn is_configured(&self) -> bool {
        [&self.api_key, &self.assistant_id, &self.thread_id]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}
