//! Gemini LLM client implementation (API key authentication).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::Error;
use crate::Result;

use super::super::message::{Role, Turn};
use super::{GeminiResponse, LlmClient};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client using API key authentication.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client with API key.
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Client::new(),
        }
    }

    fn build_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_URL, self.model, self.api_key
        )
    }

    fn convert_turns(turns: &[Turn]) -> Vec<Value> {
        turns
            .iter()
            .map(|t| {
                let role = match t.role {
                    Role::User => "user",
                    Role::Companion => "model",
                };

                json!({
                    "role": role,
                    "parts": [{"text": t.text}]
                })
            })
            .collect()
    }

    fn parse_response(response: &GeminiResponse) -> Result<String> {
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| Error::Llm("No candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(Error::Llm("Candidate contains no text".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, instruction: &str, turns: &[Turn]) -> Result<String> {
        let request = json!({
            "contents": Self::convert_turns(turns),
            "systemInstruction": {
                "parts": [{"text": instruction}]
            },
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 8192
            }
        });

        let response = self.client.post(self.build_url()).json(&request).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(Error::Llm(format!("Gemini API error: {error_text}")));
        }

        let envelope: GeminiResponse = response.json().await?;

        if let Some(usage) = &envelope.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count.unwrap_or(0),
                completion_tokens = usage.candidates_token_count.unwrap_or(0),
                "token usage"
            );
        }

        Self::parse_response(&envelope)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_turns_maps_roles() {
        let turns = vec![Turn::user("hi"), Turn::companion("hello")];
        let contents = GeminiClient::convert_turns(&turns);

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "hi");
        assert_eq!(contents[1]["role"], "model");
    }

    #[test]
    fn test_parse_response_joins_text_parts() {
        let envelope: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "Hello, "}, {"text": "world"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5}
            }"#,
        )
        .unwrap();

        let text = GeminiClient::parse_response(&envelope).unwrap();
        assert_eq!(text, "Hello, world");
    }

    #[test]
    fn test_parse_response_errors_without_candidates() {
        let envelope: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(GeminiClient::parse_response(&envelope).is_err());
    }
}
