//! The `studyforge report` command.

use std::path::PathBuf;

use anyhow::Result;

use studyforge_core::outcomes::load_outcomes_from;
use studyforge_core::planner::DifficultyPlanner;
use studyforge_core::tracker::PerformanceTracker;
use studyforge_report::html::write_html_report;
use studyforge_report::report::StudyReport;

use crate::config::load_config_from;

pub fn execute(
    notes_path: PathBuf,
    outcomes_path: PathBuf,
    title: Option<String>,
    threshold: Option<f64>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let planner = DifficultyPlanner::new(config.planner())?;
    let threshold = threshold.unwrap_or(config.weak_threshold);
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let notes = super::read_notes(&notes_path)?;
    let outcomes = load_outcomes_from(&outcomes_path)?;
    tracing::info!(
        "loaded {} outcome(s) from {}",
        outcomes.len(),
        outcomes_path.display()
    );
    let mut tracker = PerformanceTracker::new();
    tracker.record_outcomes(&outcomes);

    let title = title.unwrap_or_else(|| {
        notes_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Study report".to_string())
    });

    let report = StudyReport::build(title, &notes, &tracker, &planner, threshold)?;
    eprintln!(
        "{}: mastery {}, {} weak topic(s)",
        report.title,
        report.mastery,
        report.weak_topics.len()
    );

    std::fs::create_dir_all(&output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "markdown"]
    } else {
        format.split(',').collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("report-{timestamp}.md"));
                std::fs::write(&path, report.to_markdown())?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}
