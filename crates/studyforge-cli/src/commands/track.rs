//! The `studyforge track` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyforge_core::outcomes::load_outcomes_from;
use studyforge_core::tracker::PerformanceTracker;

use crate::config::load_config_from;

pub fn execute(
    outcomes_path: PathBuf,
    threshold: Option<f64>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let threshold = threshold.unwrap_or(config.weak_threshold);

    let outcomes = load_outcomes_from(&outcomes_path)?;
    tracing::info!(
        "loaded {} outcome(s) from {}",
        outcomes.len(),
        outcomes_path.display()
    );
    let mut tracker = PerformanceTracker::new();
    tracker.record_outcomes(&outcomes);

    let weak = tracker.weak_topics(threshold)?;
    let mastery = tracker.mastery_level();

    match format.as_str() {
        "json" => {
            let out = serde_json::json!({
                "mastery": mastery,
                "aggregate_accuracy": tracker.aggregate_accuracy(),
                "attempts": tracker.total_attempts(),
                "weak_threshold": threshold,
                "weak_topics": weak,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => {
            match tracker.aggregate_accuracy() {
                Some(accuracy) => println!(
                    "Mastery: {mastery} ({:.1}% over {} answer(s))",
                    accuracy * 100.0,
                    tracker.total_attempts()
                ),
                None => println!("Mastery: {mastery}"),
            }

            if weak.is_empty() {
                println!("No weak topics below {:.0}%.", threshold * 100.0);
                return Ok(());
            }

            println!("\nWeak topics (below {:.0}%):", threshold * 100.0);
            let mut table = Table::new();
            table.set_header(vec!["Topic", "Accuracy", "Questions"]);
            for w in &weak {
                table.add_row(vec![
                    Cell::new(&w.topic),
                    Cell::new(format!("{:.1}%", w.accuracy * 100.0)),
                    Cell::new(w.questions),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
