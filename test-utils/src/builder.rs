use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with pre-written configuration files.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
///
/// let test = TestBuilder::new()
///     .with_config_file("bot", r#"{ "token": "abc" }"#)
///     .build()?;
/// ```
pub struct TestBuilder {
    /// `(name, content)` pairs written as `<name>.json` during `build()`.
    files: Vec<(String, String)>,
}

impl TestBuilder {
    /// Creates a new test builder with no configuration files.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Adds a configuration file to write into the temporary directory.
    ///
    /// # Arguments
    /// - `name` - Configuration name without the `.json` extension
    /// - `content` - Raw file content, not required to be valid JSON
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_config_file(mut self, name: &str, content: &str) -> Self {
        self.files.push((name.to_string(), content.to_string()));
        self
    }

    /// Creates the temporary directory and writes all configured files.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context owning the directory; removed when dropped
    /// - `Err(TestError::Io)` - Failed to create the directory or write a file
    pub fn build(self) -> Result<TestContext, TestError> {
        let context = TestContext::new()?;

        for (name, content) in self.files {
            context.write_config(&name, &content)?;
        }

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
