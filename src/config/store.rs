//! JSON-file configuration store.

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::config::ConfigError;

/// A settings type persisted as `<dir>/<NAME>.json`.
pub trait Configuration: Serialize + DeserializeOwned + Default + Send + Sync {
    const NAME: &'static str;
}

/// Loads and saves [`Configuration`] values under a single directory.
///
/// Nothing is written implicitly except the defaults of a file that does not exist
/// yet; callers decide when a modified value is persisted by calling [`save`].
///
/// [`save`]: ConfigStore::save
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of<T: Configuration>(&self) -> PathBuf {
        self.dir.join(format!("{}.json", T::NAME))
    }

    /// Loads a configuration, creating the file with defaults if it is missing.
    ///
    /// Keys absent from an existing file keep their default values.
    ///
    /// # Returns
    /// - `Ok(T)` - Loaded or freshly created configuration
    /// - `Err(ConfigError::Io)` - File could not be read or the defaults not written
    /// - `Err(ConfigError::Json)` - File content is not valid for `T`
    pub async fn load<T: Configuration>(&self) -> Result<T, ConfigError> {
        let path = self.path_of::<T>();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Creating default configuration at {}", path.display());
                let defaults = T::default();
                self.save(&defaults).await?;
                return Ok(defaults);
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Json { path, source })
    }

    /// Writes a configuration as pretty-printed JSON, creating the directory if needed.
    pub async fn save<T: Configuration>(&self, config: &T) -> Result<(), ConfigError> {
        let path = self.path_of::<T>();

        let json = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.dir.clone(),
                source,
            })?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|source| ConfigError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{bot::BotConfig, round_status::RoundStatusConfig};
    use test_utils::builder::TestBuilder;

    /// Tests loading a configuration whose file does not exist.
    ///
    /// Verifies that defaults are returned and written to disk.
    ///
    /// Expected: default value, file created
    #[tokio::test]
    async fn load_missing_writes_defaults() {
        let test = TestBuilder::new().build().unwrap();
        let store = ConfigStore::new(test.config_dir());

        let config = store.load::<RoundStatusConfig>().await.unwrap();

        assert_eq!(config, RoundStatusConfig::default());
        assert!(store.path_of::<RoundStatusConfig>().exists());
    }

    /// Tests the save/load cycle.
    ///
    /// Verifies that a saved modification is visible on the next load.
    ///
    /// Expected: loaded host and roles equal the saved ones
    #[tokio::test]
    async fn save_then_load() {
        let test = TestBuilder::new().build().unwrap();
        let store = ConfigStore::new(test.config_dir());

        let mut config = store.load::<RoundStatusConfig>().await.unwrap();
        config.host = "10.0.0.5".to_string();
        config.allowed_role_ids.insert(42);
        store.save(&config).await.unwrap();

        let reloaded = store.load::<RoundStatusConfig>().await.unwrap();
        assert_eq!(reloaded.host, "10.0.0.5");
        assert!(reloaded.allowed_role_ids.contains(&42));
    }

    /// Tests loading a partial file.
    ///
    /// Verifies that keys missing from the file keep their defaults.
    ///
    /// Expected: token from file, prefix defaulted to "!"
    #[tokio::test]
    async fn partial_file_keeps_defaults() {
        let test = TestBuilder::new()
            .with_config_file("bot", r#"{ "token": "abc" }"#)
            .build()
            .unwrap();
        let store = ConfigStore::new(test.config_dir());

        let config = store.load::<BotConfig>().await.unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.command_prefix, "!");
    }

    /// Tests loading malformed JSON.
    ///
    /// Expected: Err(ConfigError::Json)
    #[tokio::test]
    async fn malformed_file_fails() {
        let test = TestBuilder::new()
            .with_config_file("round-status", "{ not json")
            .build()
            .unwrap();
        let store = ConfigStore::new(test.config_dir());

        let result = store.load::<RoundStatusConfig>().await;

        assert!(matches!(result, Err(ConfigError::Json { .. })));
    }
}
