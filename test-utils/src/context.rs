use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::TestError;

/// Test context owning a temporary configuration directory.
///
/// The directory and everything in it is deleted when the context is dropped.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Creates a context with an empty temporary directory.
    pub fn new() -> Result<Self, TestError> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Directory to root a configuration store at.
    pub fn config_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path a configuration named `name` is stored at.
    pub fn config_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{}.json", name))
    }

    /// Writes `<name>.json` with the given raw content.
    pub fn write_config(&self, name: &str, content: &str) -> Result<(), TestError> {
        std::fs::write(self.config_path(name), content)?;
        Ok(())
    }

    /// Reads `<name>.json` back as JSON.
    ///
    /// # Panics
    /// - If the file is missing or not valid JSON
    pub fn read_config(&self, name: &str) -> serde_json::Value {
        let content = std::fs::read_to_string(self.config_path(name))
            .expect("Failed to read test config file");
        serde_json::from_str(&content).expect("Test config file is not valid JSON")
    }
}
