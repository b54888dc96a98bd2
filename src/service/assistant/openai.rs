//! OpenAI Assistants API backend.
//!
//! Prompts are appended to a thread and answered by a streamed run. The run's
//! server-sent events are decoded here and forwarded as [`AssistantEvent`]s.

use futures_util::StreamExt;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serenity::async_trait;
use tokio::sync::mpsc;

use crate::{
    config::open_ai::OpenAiConfig,
    error::assistant::AssistantError,
    service::assistant::{AssistantBackend, AssistantEvent},
};

const API_BASE: &str = "https://api.openai.com/v1";

/// Backend calling the OpenAI Assistants API (v2) over HTTPS.
pub struct OpenAiBackend {
    http: reqwest::Client,
    api_key: String,
    organization_id: String,
    project_id: String,
}

impl OpenAiBackend {
    /// Creates a backend with the credentials from `open-ai.json`.
    ///
    /// An empty API key is accepted here; every call then fails with
    /// `AssistantError::NotConfigured`.
    pub fn new(http: reqwest::Client, config: &OpenAiConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.trim().to_string(),
            organization_id: config.organization_id.trim().to_string(),
            project_id: config.project_id.trim().to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AssistantError> {
        if self.api_key.is_empty() {
            return Err(AssistantError::NotConfigured);
        }

        let mut request = self
            .http
            .request(method, format!("{}{}", API_BASE, path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2");

        if !self.organization_id.is_empty() {
            request = request.header("OpenAI-Organization", &self.organization_id);
        }
        if !self.project_id.is_empty() {
            request = request.header("OpenAI-Project", &self.project_id);
        }

        Ok(request)
    }
}

#[async_trait]
impl AssistantBackend for OpenAiBackend {
    async fn create_message(&self, thread_id: &str, content: &str) -> Result<(), AssistantError> {
        let response = self
            .request(Method::POST, &format!("/threads/{}/messages", thread_id))?
            .json(&serde_json::json!({ "role": "user", "content": content }))
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(())
    }

    async fn run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        events: mpsc::Sender<AssistantEvent>,
    ) -> Result<(), AssistantError> {
        let response = self
            .request(Method::POST, &format!("/threads/{}/runs", thread_id))?
            .json(&serde_json::json!({ "assistant_id": assistant_id, "stream": true }))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut forwarding = true;

        while let Some(chunk) = stream.next().await {
            for data in decoder.push(&chunk?) {
                match parse_event(&data)? {
                    RunEvent::Done => return Ok(()),
                    RunEvent::Failed(reason) => return Err(AssistantError::RunFailed(reason)),
                    RunEvent::Assistant(event) => {
                        if forwarding && events.send(event).await.is_err() {
                            tracing::debug!("Assistant event receiver closed, draining run");
                            forwarding = false;
                        }
                    }
                    RunEvent::Ignored => {}
                }
            }
        }

        Ok(())
    }

    async fn retrieve_message(
        &self,
        thread_id: &str,
        message_id: &str,
    ) -> Result<String, AssistantError> {
        let response = self
            .request(
                Method::GET,
                &format!("/threads/{}/messages/{}", thread_id, message_id),
            )?
            .send()
            .await?;
        let message: ThreadMessage = ensure_success(response).await?.json().await?;

        let text = text_of(&message.content);
        if text.is_empty() {
            return Err(AssistantError::NoReply);
        }

        Ok(text)
    }
}

async fn ensure_success(response: Response) -> Result<Response, AssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AssistantError::Api { status, body })
}

#[derive(Debug, Deserialize)]
struct ThreadMessage {
    #[serde(default)]
    content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<TextContent>,
}

#[derive(Debug, Deserialize)]
struct TextContent {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct MessageDelta {
    role: Option<String>,
    #[serde(default)]
    content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Any object carried by a run event; only the fields used for routing.
#[derive(Debug, Deserialize)]
struct StreamObject {
    #[serde(default)]
    object: String,
    #[serde(default)]
    id: String,
    role: Option<String>,
    status: Option<String>,
    delta: Option<MessageDelta>,
    last_error: Option<ApiErrorBody>,
    error: Option<ApiErrorBody>,
}

/// Meaning of one `data:` payload of a run stream.
#[derive(Debug, PartialEq)]
enum RunEvent {
    Assistant(AssistantEvent),
    Failed(String),
    Done,
    Ignored,
}

fn is_assistant(role: Option<&str>) -> bool {
    role.is_none_or(|role| role == "assistant")
}

fn text_of(content: &[MessageContent]) -> String {
    content
        .iter()
        .filter(|part| part.kind == "text")
        .filter_map(|part| part.text.as_ref())
        .map(|text| text.value.as_str())
        .collect()
}

fn parse_event(data: &str) -> Result<RunEvent, AssistantError> {
    if data == "[DONE]" {
        return Ok(RunEvent::Done);
    }

    let object: StreamObject = serde_json::from_str(data)
        .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

    if let Some(error) = object.error {
        return Ok(RunEvent::Failed(error.message));
    }

    let event = match object.object.as_str() {
        "thread.message.delta" => {
            let delta = object.delta.unwrap_or_default();
            let text = text_of(&delta.content);

            if text.is_empty() || !is_assistant(delta.role.as_deref()) {
                RunEvent::Ignored
            } else {
                RunEvent::Assistant(AssistantEvent::TextDelta(text))
            }
        }
        "thread.message" if is_assistant(object.role.as_deref()) && !object.id.is_empty() => {
            RunEvent::Assistant(AssistantEvent::MessageCreated(object.id))
        }
        "thread.run" => match object.status.as_deref() {
            Some(status @ ("failed" | "cancelled" | "expired" | "incomplete")) => {
                let reason = object
                    .last_error
                    .map(|error| error.message)
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| format!("run {}", status));
                RunEvent::Failed(reason)
            }
            _ => RunEvent::Ignored,
        },
        _ => RunEvent::Ignored,
    };

    Ok(event)
}

/// Splits a server-sent event byte stream into `data:` payloads.
///
/// Bytes are buffered until a full line is available, so payloads split across
/// chunks (including inside a UTF-8 sequence) decode intact.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\r', '\n']);

            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }

        payloads
    }
}
