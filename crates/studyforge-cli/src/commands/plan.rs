//! The `studyforge plan` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyforge_core::concepts;
use studyforge_core::planner::DifficultyPlanner;

use crate::config::load_config_from;

pub fn execute(notes_path: PathBuf, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let planner = DifficultyPlanner::new(config.planner())?;

    let text = super::read_notes(&notes_path)?;
    let topics = concepts::build_quiz_topics(&text);
    let plan = planner.tier(&topics);
    let sequence = plan.sequence();

    match format.as_str() {
        "json" => {
            let out = serde_json::json!({
                "tiers": plan,
                "sequence": sequence,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => {
            println!("Study plan: {} topic(s)", topics.len());

            let mut table = Table::new();
            table.set_header(vec!["Tier", "Topics"]);
            for (tier, members) in plan.iter() {
                let listed = if members.is_empty() {
                    "-".to_string()
                } else {
                    members.join("\n")
                };
                table.add_row(vec![Cell::new(tier), Cell::new(listed)]);
            }
            println!("{table}");

            if !sequence.is_empty() {
                println!("\nProgressive sequence:");
                for (i, topic) in sequence.iter().enumerate() {
                    println!("  {}. {topic}", i + 1);
                }
            }
        }
    }

    Ok(())
}
