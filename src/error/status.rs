use thiserror::Error;

/// Problems interpreting a decoded `?status` response.
#[derive(Error, Debug, PartialEq)]
pub enum StatusError {
    /// A key the poller cannot work without is absent from the response.
    ///
    /// Logged and the tick is skipped; does not count as a query failure.
    #[error("Missing required field '{0}' in status response")]
    MissingField(&'static str),

    /// A required key is present but its value cannot be parsed.
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidField {
        /// Key of the offending field
        field: &'static str,
        /// Raw value as received
        value: String,
    },

    /// `gamestate` holds neither a known numeric code nor a known phase name.
    #[error("Unknown game state '{0}'")]
    UnknownPhase(String),
}
