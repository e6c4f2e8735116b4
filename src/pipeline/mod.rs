//! Resilient annotation pipeline: read → truncate → annotate (remote
//! with local fallback) → ordered results.

pub mod annotator;
pub mod fallback;
pub mod orchestrator;
pub mod reader;
pub mod truncate;

pub use annotator::RemoteAnnotator;
pub use fallback::FallbackAnnotator;
pub use orchestrator::Pipeline;
pub use reader::{read_artifact, ReadStatus, SourceArtifact};
pub use truncate::truncate;

use crate::llm::{prompts, CompletionRequest};

/// Where an annotation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Produced by the remote inference endpoint.
    Remote,
    /// Produced by the local rule-based annotator.
    Fallback,
    /// Synthesized because the artifact could not be read.
    Unreadable,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Remote => write!(f, "remote"),
            Provenance::Fallback => write!(f, "fallback"),
            Provenance::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// One annotation request, consumed once by the remote annotator.
#[derive(Debug, Clone)]
pub struct AnnotationRequest {
    pub artifact_id: String,
    /// Already truncated to char_budget by the orchestrator.
    pub text: String,
    pub char_budget: usize,
    pub task: AnnotationTask,
}

/// One annotation per artifact. Text is non-empty by invariant.
#[derive(Debug, Clone)]
pub struct AnnotationResult {
    pub artifact_id: String,
    pub text: String,
    pub provenance: Provenance,
}

/// Which report variant's prompt to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Summary,
    Requirements,
}

/// Task descriptor: instruction context plus generation parameters.
/// Builds the provider-agnostic completion request for one artifact.
#[derive(Debug, Clone)]
pub struct AnnotationTask {
    pub kind: TaskKind,
    pub system: String,
    pub entity: Option<String>,
    pub industry: Option<String>,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl AnnotationTask {
    pub fn summary() -> Self {
        Self {
            kind: TaskKind::Summary,
            system: prompts::SUMMARY_SYSTEM.to_string(),
            entity: None,
            industry: None,
            max_output_tokens: 512,
            temperature: 0.7,
        }
    }

    pub fn requirements(entity: &str, industry: &str) -> Self {
        Self {
            kind: TaskKind::Requirements,
            system: prompts::REQUIREMENTS_SYSTEM.to_string(),
            entity: Some(entity.to_string()),
            industry: Some(industry.to_string()),
            max_output_tokens: 800,
            temperature: 0.3,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn build_request(&self, artifact_id: &str, text: &str) -> CompletionRequest {
        let prompt = match self.kind {
            TaskKind::Summary => prompts::summary(artifact_id, text),
            TaskKind::Requirements => prompts::requirements(
                text,
                self.entity.as_deref().unwrap_or("domain"),
                self.industry.as_deref().unwrap_or("business"),
            ),
        };
        CompletionRequest {
            system: self.system.clone(),
            prompt,
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }
}
