//! CLI output formatting.
//!
//! stdout is reserved for the JSON responses, so everything here is the
//! human-readable side channel printed to stderr. Each entity follows the
//! same two-level pattern:
//!
//! 1. **Header line**: the object key or file name
//! 2. **Context lines**: indented `Label: value` details
//!
//! # Output Format
//!
//! ## Classify
//!
//! ```text
//! IMG_0042.jpg
//!     Raw: 4000x3000 (orientation 6)
//!     Corrected: 3000x4000
//!     Category: portrait
//!     Resize: width 3000
//! ```
//!
//! ## Run
//!
//! ```text
//! a1/m2/p3.jpg → panorama, width 2500
//!     Published: 81234 bytes (etag 9f86d081884c)
//!     Cleanup: done
//!     Record: failed (Store unavailable: timeout)
//! ```
//!
//! Every `format_*` function is pure and returns lines so tests can assert on
//! them directly; the `print_*` wrappers only write.

use crate::classify::{AspectCategory, CorrectedDimensions, ImageMetrics};
use crate::pipeline::{BestEffort, PipelineError, RunReport};
use crate::plan::ResizeSpec;
use std::error::Error;

/// Leading hex digits of an etag shown in summaries.
const ETAG_PREFIX_LEN: usize = 12;

fn resize_label(resize: &ResizeSpec) -> String {
    match resize.target_height {
        Some(height) => format!("{}x{} (cover)", resize.target_width, height),
        None => format!("width {}", resize.target_width),
    }
}

fn outcome_label(outcome: &BestEffort) -> String {
    match outcome {
        BestEffort::Done => "done".to_string(),
        BestEffort::Failed(error) => format!("failed ({error})"),
    }
}

/// Format the classification of a local image file.
pub fn format_classification(
    name: &str,
    metrics: &ImageMetrics,
    dimensions: &CorrectedDimensions,
    category: AspectCategory,
    resize: &ResizeSpec,
) -> Vec<String> {
    let orientation = match metrics.orientation {
        Some(code) => format!(" (orientation {code})"),
        None => String::new(),
    };
    vec![
        name.to_string(),
        format!(
            "    Raw: {}x{}{}",
            metrics.raw_width, metrics.raw_height, orientation
        ),
        format!("    Corrected: {}x{}", dimensions.width, dimensions.height),
        format!("    Category: {category}"),
        format!("    Resize: {}", resize_label(resize)),
    ]
}

pub fn print_classification(
    name: &str,
    metrics: &ImageMetrics,
    dimensions: &CorrectedDimensions,
    category: AspectCategory,
    resize: &ResizeSpec,
) {
    for line in format_classification(name, metrics, dimensions, category, resize) {
        eprintln!("{line}");
    }
}

/// Format a completed run, including degraded best-effort steps.
pub fn format_run_report(report: &RunReport) -> Vec<String> {
    let etag = &report.published.etag;
    let etag = &etag[..etag.len().min(ETAG_PREFIX_LEN)];
    vec![
        format!(
            "{} → {}, {}",
            report.key,
            report.category,
            resize_label(&report.resize)
        ),
        format!(
            "    Published: {} bytes (etag {})",
            report.published.size, etag
        ),
        format!("    Cleanup: {}", outcome_label(&report.cleanup)),
        format!("    Record: {}", outcome_label(&report.record)),
    ]
}

pub fn print_run_report(report: &RunReport) {
    for line in format_run_report(report) {
        eprintln!("{line}");
    }
}

/// Format a fatal run failure with its cause chain, one cause per line.
pub fn format_failure(key: &str, error: &PipelineError) -> Vec<String> {
    let mut lines = vec![format!("{key} ✗ {error}")];
    let mut cause = error.source();
    while let Some(inner) = cause {
        lines.push(format!("    Caused by: {inner}"));
        cause = inner.source();
    }
    lines
}

pub fn print_failure(key: &str, error: &PipelineError) {
    for line in format_failure(key, error) {
        eprintln!("{line}");
    }
}
