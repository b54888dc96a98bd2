use thiserror::Error;

/// Errors raised while asking the assistant and relaying its answer.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// API key, assistant id or thread id is missing from `open-ai.json`.
    #[error("The assistant is not configured")]
    NotConfigured,

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The assistant API answered with a non-success status.
    #[error("Assistant API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The run ended with a failure event.
    #[error("Assistant run failed: {0}")]
    RunFailed(String),

    /// A response body could not be parsed.
    #[error("Invalid assistant response: {0}")]
    InvalidResponse(String),

    /// The run finished without producing a message to answer with.
    #[error("The assistant did not answer")]
    NoReply,

    /// The run did not finish within the allowed time.
    #[error("The assistant did not finish within {0:?}")]
    Timeout(std::time::Duration),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),
}

impl From<serenity::Error> for AssistantError {
    fn from(err: serenity::Error) -> Self {
        AssistantError::Discord(Box::new(err))
    }
}
