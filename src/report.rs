//! Report writer: persists ordered annotation records as markdown.
//! Write failures are the one error class that aborts a run — a report
//! that cannot be written has no recovery path.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::pipeline::AnnotationResult;

/// A static modernization-gap entry for the gap-analysis report.
#[derive(Debug, Clone)]
pub struct Gap {
    pub title: String,
    pub impact: String,
    pub desired_state: String,
}

impl Gap {
    pub fn new(
        title: impl Into<String>,
        impact: impl Into<String>,
        desired_state: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            impact: impact.into(),
            desired_state: desired_state.into(),
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn write(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Wrote report to {}", path.display());
    Ok(())
}

/// Per-file summary report: repeated File/Summary blocks.
pub fn write_summary_report(path: &Path, title: &str, results: &[AnnotationResult]) -> Result<()> {
    let mut content = format!("# {}\n\n", title);
    for result in results {
        content.push_str(&format!("File: {}\n", result.artifact_id));
        content.push_str(&format!("Summary: {}\n\n", result.text));
    }
    write(path, &content)
}

/// Requirements report: one heading per file with the extracted text.
pub fn write_requirements_report(
    path: &Path,
    title: &str,
    results: &[AnnotationResult],
) -> Result<()> {
    let mut content = format!("# {}\n\n", title);
    if results.is_empty() {
        content.push_str("No requirements extracted.");
    } else {
        let blocks: Vec<String> = results
            .iter()
            .map(|r| format!("### File: {}\n{}\n", r.artifact_id, r.text))
            .collect();
        content.push_str(&blocks.join("\n"));
    }
    write(path, &content)
}

/// Gap-analysis report with Impact / Desired State lines per entry.
pub fn write_gap_report(path: &Path, title: &str, gaps: &[Gap]) -> Result<()> {
    let mut content = format!("# {}\n\n", title);
    let blocks: Vec<String> = gaps
        .iter()
        .enumerate()
        .map(|(i, gap)| {
            format!(
                "Gap {}: {}\n  Impact: {}\n  Desired State: {}",
                i + 1,
                gap.title,
                gap.impact,
                gap.desired_state
            )
        })
        .collect();
    content.push_str(&blocks.join("\n"));
    write(path, &content)
}

/// System-inventory report: one bullet per item.
pub fn write_inventory_report(path: &Path, title: &str, items: &[String]) -> Result<()> {
    let mut content = format!("# {}\n\n", title);
    let lines: Vec<String> = items.iter().map(|item| format!("- {}", item)).collect();
    content.push_str(&lines.join("\n"));
    write(path, &content)
}
