//! The `studyforge analyze` command.

use std::path::PathBuf;

use anyhow::Result;

use studyforge_core::concepts;

pub fn execute(notes_path: PathBuf, format: String) -> Result<()> {
    let text = super::read_notes(&notes_path)?;
    let concept_map = concepts::extract(&text);
    let summary = concepts::summarize(&concept_map);

    match format.as_str() {
        "json" => {
            let out = serde_json::json!({
                "concepts": concept_map,
                "total_main_concepts": summary.total_main_concepts,
                "total_subconcepts": summary.total_subconcepts,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => {
            if concept_map.is_empty() {
                println!("No concepts found in {}.", notes_path.display());
                println!("Main concepts are `##` or `###` headings.");
                return Ok(());
            }

            for (concept, subs) in concept_map.iter() {
                println!("{concept}");
                for sub in subs {
                    println!("  - {sub}");
                }
            }
            println!(
                "\n{} main concept(s), {} subconcept(s)",
                summary.total_main_concepts, summary.total_subconcepts
            );
        }
    }

    Ok(())
}
