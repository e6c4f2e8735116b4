use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::PipelineArgs;
use crate::pipeline::{AnnotationTask, Pipeline, Provenance};
use crate::report;

pub async fn run(source_root: String, output: String, title: String, args: PipelineArgs) -> Result<()> {
    let config = super::resolve_config(&args)?;
    let annotator = super::build_annotator(&config, &args)?;

    let mut task = AnnotationTask::summary();
    if let Some(max_tokens) = config.llm.max_tokens {
        task = task.with_max_output_tokens(max_tokens);
    }

    let pipeline = Pipeline::new(annotator).with_max_chars(config.scan.max_chars);
    let results = pipeline
        .run(Path::new(&source_root), &config.scan.extensions, &task)
        .await?;

    let remote = results
        .iter()
        .filter(|r| r.provenance == Provenance::Remote)
        .count();
    info!(
        "Summarized {} file(s) ({} remote, {} local)",
        results.len(),
        remote,
        results.len() - remote
    );

    report::write_summary_report(Path::new(&output), &title, &results)
}
