//! The `studyforge init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("studyforge.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("notes")?;
    write_if_missing(Path::new("notes/example.md"), EXAMPLE_NOTES)?;
    write_if_missing(Path::new("notes/example-outcomes.toml"), EXAMPLE_OUTCOMES)?;

    println!("\nNext steps:");
    println!("  1. Run: studyforge analyze --notes notes/example.md");
    println!("  2. Run: studyforge plan --notes notes/example.md");
    println!("  3. Run: studyforge report --notes notes/example.md --outcomes notes/example-outcomes.toml --format all");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studyforge configuration

# Seed for topic clustering; the same notes always give the same tiers.
seed = 42
max_iterations = 300
tolerance = 0.0001

# Topics answered correctly less often than this are reported as weak.
weak_threshold = 0.7

output_dir = "./studyforge-results"
"#;

const EXAMPLE_NOTES: &str = r#"# Biology review

## Photosynthesis
- light reaction
- dark reaction
**chlorophyll**

## Cellular respiration
- glycolysis
- krebs cycle
- electron transport chain

## Cell division
- mitosis
- meiosis

### Genetics
- alleles
- dominance
**punnett squares**

## Ecology
- food webs
- nutrient cycles
"#;

const EXAMPLE_OUTCOMES: &str = r#"[[outcomes]]
topic = "Photosynthesis"
correct = true

[[outcomes]]
topic = "Photosynthesis"
correct = true

[[outcomes]]
topic = "Cellular respiration"
correct = false

[[outcomes]]
topic = "Cellular respiration"
correct = true

[[outcomes]]
topic = "Genetics"
correct = false

[[outcomes]]
topic = "Ecology"
correct = true
"#;
