use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use super::annotator::RemoteAnnotator;
use super::reader::{read_artifact, ReadStatus};
use super::truncate::truncate;
use super::{AnnotationRequest, AnnotationResult, AnnotationTask, Provenance};
use crate::scan;

/// Enumerates artifacts and drives read → truncate → annotate for each,
/// strictly sequentially. Output order follows artifact id order, and
/// the result count always equals the artifact count (with a single
/// placeholder when nothing was enumerated).
pub struct Pipeline {
    annotator: RemoteAnnotator,
    max_chars: usize,
}

impl Pipeline {
    pub fn new(annotator: RemoteAnnotator) -> Self {
        Self {
            annotator,
            max_chars: 2000,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub async fn run(
        &self,
        root: &Path,
        extensions: &[String],
        task: &AnnotationTask,
    ) -> Result<Vec<AnnotationResult>> {
        let paths = scan::scan_sources(root, extensions)?;
        info!(
            "Annotating {} artifact(s) under {}",
            paths.len(),
            root.display()
        );

        let mut results = Vec::with_capacity(paths.len());
        for path in &paths {
            let artifact = read_artifact(root, path);

            if artifact.status == ReadStatus::Unreadable {
                results.push(AnnotationResult {
                    artifact_id: artifact.id.clone(),
                    text: format!(
                        "{} could not be read, possibly due to file access issues.",
                        artifact.id
                    ),
                    provenance: Provenance::Unreadable,
                });
                continue;
            }

            let request = AnnotationRequest {
                artifact_id: artifact.id.clone(),
                text: truncate(&artifact.text, self.max_chars),
                char_budget: self.max_chars,
                task: task.clone(),
            };
            results.push(self.annotator.annotate(&request).await);
        }

        // Downstream report writers always receive at least one record.
        if results.is_empty() {
            warn!("No matching source files found in {}", root.display());
            results.push(AnnotationResult {
                artifact_id: "N/A".to_string(),
                text: format!(
                    "No source files matching [{}] were found under {}. Check the source \
                     root and the configured extension allow-list.",
                    extensions.join(", "),
                    root.display()
                ),
                provenance: Provenance::Fallback,
            });
        }

        Ok(results)
    }
}
