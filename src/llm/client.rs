use async_trait::async_trait;
use thiserror::Error;

/// Provider-agnostic request shape for one completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// How the retry loop should treat a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Provider signalled throttling — back off and retry.
    RateLimited,
    /// Network/server/parse failure — retry within the attempt budget.
    Transient,
    /// Malformed request or auth failure — retrying won't help.
    Fatal,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rate limited")]
    RateLimited { retry_after: Option<u64> },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl CompletionError {
    /// Structured classification for the retry loop. Status codes, not
    /// error-message substrings, decide retryability.
    pub fn class(&self) -> ErrorClass {
        match self {
            CompletionError::RateLimited { .. } => ErrorClass::RateLimited,
            CompletionError::Transport(_) | CompletionError::Parse(_) => ErrorClass::Transient,
            CompletionError::Api { status: 429, .. } => ErrorClass::RateLimited,
            CompletionError::Api { status, .. } if *status >= 500 => ErrorClass::Transient,
            CompletionError::Api { .. } => ErrorClass::Fatal,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync + std::fmt::Debug {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Deterministic canned completions for --dry-run and tests.
#[derive(Debug)]
pub struct MockCompletionClient;

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if request.prompt.contains("functional and non-functional requirements") {
            Ok("Functional Requirements:\n\
                - FR1: The system shall allow users to search records by number or name.\n\
                - FR2: The system shall display matching records in a tabular view.\n\n\
                Non-Functional Requirements:\n\
                - NFR1: Search results shall be returned within 2 seconds.\n\
                - NFR2: The system shall log all data-access operations."
                .to_string())
        } else {
            Ok("This class implements a request handler over raw JDBC, a legacy pattern. \
                Migrate to a modern web framework with an ORM layer for maintainability."
                .to_string())
        }
    }
}
