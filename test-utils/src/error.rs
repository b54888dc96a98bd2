use thiserror::Error;

/// Errors raised while preparing a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// Temporary directory, config file or test server socket could not be set up.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
