//! Gemini API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{FunctionDeclaration, Message, ModelResponse, TokenUsage};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Defensive cap on a single model call; the service sets no timeout of
/// its own and the loop must not hang on a stalled connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Abstraction over the model service, so the agent loop can be driven by
/// scripted responses in tests.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the conversation history plus tool declarations and system
    /// instruction, returning the model's reply.
    async fn generate_content(
        &self,
        model: &str,
        history: &[Message],
        tools: &[FunctionDeclaration],
        system_instruction: &str,
    ) -> anyhow::Result<ModelResponse>;
}

/// Production client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Create a client pointed at a custom endpoint (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        history: &[Message],
        tools: &[FunctionDeclaration],
        system_instruction: &str,
    ) -> anyhow::Result<ModelResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let request = GenerateContentRequest {
            contents: history,
            tools: vec![ToolDeclarations {
                function_declarations: tools,
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: system_instruction,
                }],
            },
        };

        tracing::debug!(model, turns = history.len(), "calling model");

        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Model request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Model request failed with status {}: {}", status, body);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to decode model response: {}", e))?;

        Ok(ModelResponse {
            candidates: body
                .candidates
                .into_iter()
                .filter_map(|c| c.content)
                .collect(),
            usage: body.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count.unwrap_or(0),
                response_tokens: u.candidates_token_count.unwrap_or(0),
            }),
        })
    }
}

// ── Wire envelope ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Message],
    tools: Vec<ToolDeclarations<'a>>,
    system_instruction: SystemInstruction<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclarations<'a> {
    function_declarations: &'a [FunctionDeclaration],
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Message>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_wire_shape() {
        let history = vec![Message::user_text("hello")];
        let tools = vec![FunctionDeclaration {
            name: "list_files".to_string(),
            description: "List files".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }];
        let request = GenerateContentRequest {
            contents: &history,
            tools: vec![ToolDeclarations {
                function_declarations: &tools,
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart { text: "be helpful" }],
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["contents"],
            json!([{"role": "user", "parts": [{"text": "hello"}]}])
        );
        assert_eq!(
            value["tools"][0]["functionDeclarations"][0]["name"],
            json!("list_files")
        );
        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            json!("be helpful")
        );
    }

    #[test]
    fn response_deserializes_usage_and_candidates() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "done"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        }))
        .unwrap();

        assert_eq!(body.candidates.len(), 1);
        let usage = body.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, Some(12));
        assert_eq!(usage.candidates_token_count, Some(3));
    }
}
