// Project summarization module.
// Defines the summarizer seam and the DashScope-backed implementation.

pub mod dashscope;
pub mod markdown;

pub use dashscope::DashScope;

use crate::trending::Project;

/// Produces a rich text summary for a trending project.
///
/// Implementations must never fail the run: any backend error degrades to
/// [`fallback_summary`].
pub trait Summarize {
    async fn summarize(&self, project: &Project) -> String;
}

/// Summary used when the generation backend is unavailable or errors out:
/// just the project's own description under the background header.
pub fn fallback_summary(project: &Project) -> String {
    format!("【项目背景】{}", project.desc)
}
