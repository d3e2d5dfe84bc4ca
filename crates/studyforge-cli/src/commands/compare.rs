//! The `studyforge compare` command.

use std::path::PathBuf;

use anyhow::Result;

use studyforge_report::report::StudyReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = StudyReport::load_json(&baseline_path)?;
    let current = StudyReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Mastery: {} -> {}",
                report.baseline_mastery, report.current_mastery
            );
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &report.regressions {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1}%)",
                        r.topic,
                        r.baseline_accuracy * 100.0,
                        r.current_accuracy * 100.0,
                        r.delta * 100.0
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &report.improvements {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1}%)",
                        i.topic,
                        i.baseline_accuracy * 100.0,
                        i.current_accuracy * 100.0,
                        i.delta * 100.0
                    );
                }
            }

            if report.new_topics > 0 {
                println!("\n{} new topic(s)", report.new_topics);
            }
            if report.removed_topics > 0 {
                println!("{} removed topic(s)", report.removed_topics);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
