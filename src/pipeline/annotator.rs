use std::time::Duration;
use tracing::{debug, info, warn};

use super::fallback::FallbackAnnotator;
use super::{AnnotationRequest, AnnotationResult, Provenance};
use crate::llm::{CompletionClient, CompletionError, ErrorClass};

/// Bookkeeping for one annotate() invocation; discarded afterwards.
#[derive(Debug)]
struct RetryState {
    attempts: u32,
    last_error: Option<ErrorClass>,
}

impl RetryState {
    fn new() -> Self {
        Self {
            attempts: 0,
            last_error: None,
        }
    }

    fn record(&mut self, class: ErrorClass) {
        self.attempts += 1;
        self.last_error = Some(class);
    }
}

/// Wraps the remote inference call behind a uniform contract: bounded
/// retries, exponential backoff, structured rate-limit handling, and a
/// guaranteed delegation to the fallback annotator on exhaustion. Never
/// errors past its boundary and always returns non-empty text.
pub struct RemoteAnnotator {
    client: Option<Box<dyn CompletionClient>>,
    fallback: FallbackAnnotator,
    max_attempts: u32,
    backoff_base: Duration,
}

impl RemoteAnnotator {
    pub fn new(client: Option<Box<dyn CompletionClient>>) -> Self {
        Self {
            client,
            fallback: FallbackAnnotator::new(),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Base unit for the exponential backoff (base * 2^attempt).
    /// Injectable so tests never sleep for real.
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackAnnotator) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> &FallbackAnnotator {
        &self.fallback
    }

    pub async fn annotate(&self, request: &AnnotationRequest) -> AnnotationResult {
        // No client configured, or nothing to analyze: skip the network
        // entirely and answer locally.
        let Some(client) = &self.client else {
            debug!(
                "No remote client configured, using fallback for {}",
                request.artifact_id
            );
            return self.fallback.annotate(&request.text, &request.artifact_id);
        };
        if request.text.trim().is_empty() {
            warn!("No content for {}, using fallback", request.artifact_id);
            return self.fallback.annotate(&request.text, &request.artifact_id);
        }

        let completion_request = request.task.build_request(&request.artifact_id, &request.text);
        let mut state = RetryState::new();

        while state.attempts < self.max_attempts {
            let attempt = state.attempts;
            let mut delay = self.backoff_delay(attempt);
            match client.complete(&completion_request).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!(
                        "Annotated {} remotely on attempt {}",
                        request.artifact_id,
                        attempt + 1
                    );
                    return AnnotationResult {
                        artifact_id: request.artifact_id.clone(),
                        text: text.trim().to_string(),
                        provenance: Provenance::Remote,
                    };
                }
                // Blank completion counts as a failed attempt
                Ok(_) => {
                    warn!(
                        "Empty completion for {} (attempt {})",
                        request.artifact_id,
                        attempt + 1
                    );
                    state.record(ErrorClass::Transient);
                }
                Err(e) => {
                    let class = e.class();
                    warn!(
                        "Remote annotation failed for {} (attempt {}): {}",
                        request.artifact_id,
                        attempt + 1,
                        e
                    );
                    if class == ErrorClass::Fatal {
                        // Retrying a malformed request wastes the budget
                        state.record(class);
                        break;
                    }
                    // A server-provided Retry-After replaces the
                    // exponential delay for this attempt.
                    if let CompletionError::RateLimited {
                        retry_after: Some(secs),
                    } = &e
                    {
                        delay = Duration::from_secs(*secs);
                    }
                    state.record(class);
                }
            }

            if state.attempts < self.max_attempts {
                tokio::time::sleep(delay).await;
            }
        }

        warn!(
            "Remote annotation exhausted for {} after {} attempt(s) (last error: {:?}), using fallback",
            request.artifact_id, state.attempts, state.last_error
        );
        self.fallback.annotate(&request.text, &request.artifact_id)
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let annotator =
            RemoteAnnotator::new(None).with_backoff_base(Duration::from_millis(100));
        assert_eq!(annotator.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(annotator.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(annotator.backoff_delay(2), Duration::from_millis(400));
    }

    #[test]
    fn test_max_attempts_floor_is_one() {
        let annotator = RemoteAnnotator::new(None).with_max_attempts(0);
        assert_eq!(annotator.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_no_client_uses_fallback() {
        let annotator = RemoteAnnotator::new(None);
        let request = AnnotationRequest {
            artifact_id: "Foo.java".to_string(),
            text: "import java.sql.*;".to_string(),
            char_budget: 2000,
            task: crate::pipeline::AnnotationTask::summary(),
        };
        let result = annotator.annotate(&request).await;
        assert_eq!(result.provenance, Provenance::Fallback);
        assert!(result.text.contains("lacks ORM abstraction"));
    }
}
