use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::{CompletionClient, CompletionError, CompletionRequest};
use crate::util::SecretString;

/// Cap on Retry-After values we honor, so a hostile or confused server
/// can't park the pipeline for hours.
const MAX_RETRY_AFTER_SECS: u64 = 60;

fn build_http_client(timeout_secs: u64) -> Result<Client, CompletionError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(CompletionError::Transport)
}

/// Map a non-success HTTP response to a CompletionError, pulling the
/// Retry-After header out of 429 responses.
async fn error_from_response(response: Response) -> CompletionError {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs.min(MAX_RETRY_AFTER_SECS));
        return CompletionError::RateLimited { retry_after };
    }
    let message = response.text().await.unwrap_or_default();
    CompletionError::Api {
        status: status.as_u16(),
        message,
    }
}

// ============================================================================
// OpenAI-compatible chat-completion client
// ============================================================================

#[derive(Debug)]
pub struct OpenAiCompatibleClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn chat_messages(request: &CompletionRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: request.system.clone(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        },
    ]
}

fn first_choice(response: ChatResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| CompletionError::Parse("no choices in response".to_string()))
}

impl OpenAiCompatibleClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            base_url,
            client: build_http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: chat_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            "Calling chat-completion API at {} with model: {}",
            self.base_url, self.model
        );

        let url = format!("{}/chat/completions", self.base_url);
        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body);

        // Only add authorization if API key is not empty (local gateways)
        if !self.api_key.expose().is_empty() {
            req = req.header("authorization", format!("Bearer {}", self.api_key.expose()));
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;
        first_choice(parsed)
    }
}

// ============================================================================
// Azure OpenAI client
// ============================================================================

#[derive(Debug)]
pub struct AzureOpenAiClient {
    api_key: SecretString,
    endpoint: String,
    deployment: String,
    api_version: String,
    client: Client,
}

/// Azure routes by deployment in the URL, so the body carries no model.
#[derive(Debug, Serialize)]
struct AzureChatRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

impl AzureOpenAiClient {
    pub fn new(
        api_key: String,
        endpoint: String,
        deployment: String,
        api_version: String,
        timeout_secs: u64,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            api_key: api_key.into(),
            endpoint,
            deployment,
            api_version,
            client: build_http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = AzureChatRequest {
            messages: chat_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!("Calling Azure OpenAI deployment: {}", self.deployment);

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", self.api_key.expose())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;
        first_choice(parsed)
    }
}

// ============================================================================
// Ollama text-generation client
// ============================================================================

#[derive(Debug)]
pub struct OllamaClient {
    endpoint: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(endpoint: String, model: String, timeout_secs: u64) -> Result<Self, CompletionError> {
        Ok(Self {
            endpoint,
            model,
            client: build_http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        // Ollama's generate endpoint has no system-message slot; fold the
        // system instruction into the prompt.
        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: format!("{}\n\n{}", request.system, request.prompt),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        debug!(
            "Calling Ollama at {} with model: {}",
            self.endpoint, self.model
        );

        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;
        Ok(parsed.response)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            system: "You are a Java code analysis expert.".to_string(),
            prompt: "Analyze this".to_string(),
            max_tokens: 512,
            temperature: 0.7,
        }
    }

    #[test]
    fn test_openai_compatible_client_creation() {
        let client = OpenAiCompatibleClient::new(
            "test_key".to_string(),
            "microsoft/codebert-base".to_string(),
            "https://router.huggingface.co/v1".to_string(),
            120,
        )
        .unwrap();
        assert!(client.api_key == "test_key");
        assert_eq!(client.base_url, "https://router.huggingface.co/v1");
    }

    #[test]
    fn test_chat_request_structure() {
        let request = sample_request();
        let body = ChatRequest {
            model: "microsoft/codebert-base".to_string(),
            messages: chat_messages(&request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "microsoft/codebert-base");
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Analyze this");
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 0.0001);
    }

    #[test]
    fn test_azure_request_has_no_model_field() {
        let request = sample_request();
        let body = AzureChatRequest {
            messages: chat_messages(&request),
            max_tokens: 800,
            temperature: 0.3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["max_tokens"], 800);
    }

    #[test]
    fn test_ollama_request_structure() {
        let body = OllamaRequest {
            model: "llama3".to_string(),
            prompt: "system\n\nuser".to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: 0.7,
                num_predict: 512,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 512);
    }

    #[test]
    fn test_chat_response_parsing() {
        let json = r#"{
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "Summary text"
                    }
                }
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_choice(response).unwrap(), "Summary text");
    }

    #[test]
    fn test_chat_response_empty_choices() {
        let json = r#"{"choices": []}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        let err = first_choice(response).unwrap_err();
        assert!(matches!(err, CompletionError::Parse(_)));
    }

    #[test]
    fn test_ollama_response_parsing() {
        let json = r#"{"response": "Generated text", "done": true}"#;
        let response: OllamaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.response, "Generated text");
    }
}
