//! studyforge-report: study session reports.
//!
//! Builds a [`StudyReport`] from notes and recorded answers, persists it as
//! JSON, renders it as Markdown or a self-contained HTML dashboard, and
//! compares two sessions for per-topic progress.

pub mod html;
pub mod report;

pub use html::{generate_html, write_html_report};
pub use report::{ProgressReport, StudyReport, TopicAccuracy, TopicChange};
