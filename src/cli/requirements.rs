use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::PipelineArgs;
use crate::pipeline::{AnnotationTask, Pipeline};
use crate::report;

pub async fn run(
    source_root: String,
    entity: String,
    industry: String,
    output: String,
    title: Option<String>,
    args: PipelineArgs,
) -> Result<()> {
    let config = super::resolve_config(&args)?;
    let annotator = super::build_annotator(&config, &args)?;

    let mut task = AnnotationTask::requirements(&entity, &industry);
    if let Some(max_tokens) = config.llm.max_tokens {
        task = task.with_max_output_tokens(max_tokens);
    }

    let pipeline = Pipeline::new(annotator).with_max_chars(config.scan.max_chars);
    let results = pipeline
        .run(Path::new(&source_root), &config.scan.extensions, &task)
        .await?;

    info!("Extracted requirements from {} file(s)", results.len());

    let title = title.unwrap_or_else(|| format!("{} {} Requirements", industry, entity));
    report::write_requirements_report(Path::new(&output), &title, &results)
}
