//! Client for the upstream vision chat-completions API.
//!
//! Builds the fixed analysis payload around the selected photo, makes one
//! call, and extracts `choices[0].message.content`. No retries, no
//! streaming; any failure is terminal for the request.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{AnalysisConfig, UpstreamConfig};
use crate::error::RelayError;
use crate::photos::SelectedImage;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct VisionService {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    system_prompt: String,
    prompt: String,
}

impl VisionService {
    pub fn new(upstream: &UpstreamConfig, analysis: &AnalysisConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(upstream.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: upstream.api_key.clone(),
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
            model: upstream.model.clone(),
            max_tokens: upstream.max_tokens,
            system_prompt: analysis.system_prompt.clone(),
            prompt: analysis.prompt.clone(),
        })
    }

    /// Forward one image for analysis and return the response text.
    pub async fn analyze(&self, image: &SelectedImage) -> Result<String, RelayError> {
        let payload = self.build_payload(image);

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "Upstream vision API returned an error");
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        info!("Upstream response received");

        // A malformed body is a format error, not a transport error
        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|_| RelayError::UnrecognizedFormat)?;

        extract_content(parsed).ok_or(RelayError::UnrecognizedFormat)
    }

    fn build_payload(&self, image: &SelectedImage) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(self.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: self.prompt.clone(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: image.data_uri(),
                            },
                        },
                    ]),
                },
            ],
            max_tokens: self.max_tokens,
        }
    }
}

/// `choices[0].message.content`, if present and non-empty.
fn extract_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
}
