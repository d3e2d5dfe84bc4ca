//! Outcome event file parser.
//!
//! Loads answered quiz items from TOML or JSON files:
//!
//! ```toml
//! [[outcomes]]
//! topic = "Photosynthesis"
//! correct = true
//! ```
//!
//! ```json
//! {"outcomes": [{"topic": "Photosynthesis", "correct": true}]}
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::Outcome;

/// On-disk format of an outcome file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeFormat {
    Toml,
    Json,
}

impl OutcomeFormat {
    /// `.json` files are JSON; everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "json") {
            OutcomeFormat::Json
        } else {
            OutcomeFormat::Toml
        }
    }
}

/// Intermediate structure; `correct` stays untyped so a non-boolean can be
/// reported as an invalid argument rather than a generic parse error.
#[derive(Debug, Deserialize)]
struct RawOutcomeFile {
    #[serde(default)]
    outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Deserialize)]
struct RawOutcome {
    topic: String,
    correct: Value,
}

fn convert(raw: RawOutcome, position: usize) -> Result<Outcome, CoreError> {
    let topic = raw.topic.trim();
    if topic.is_empty() {
        return Err(CoreError::invalid_argument(
            "topic",
            format!("outcome #{position} has an empty topic"),
        ));
    }
    let correct = match raw.correct {
        Value::Bool(b) => b,
        other => {
            return Err(CoreError::invalid_argument(
                "correct",
                format!("outcome #{position} ({topic}): expected a boolean, got {other}"),
            ))
        }
    };
    Ok(Outcome {
        topic: topic.to_string(),
        correct,
    })
}

/// Parse outcome events from a string in the given format.
pub fn parse_outcomes_str(content: &str, format: OutcomeFormat) -> Result<Vec<Outcome>> {
    let parsed: RawOutcomeFile = match format {
        OutcomeFormat::Toml => toml::from_str(content).context("failed to parse outcome TOML")?,
        OutcomeFormat::Json => {
            serde_json::from_str(content).context("failed to parse outcome JSON")?
        }
    };

    let outcomes = parsed
        .outcomes
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| convert(raw, idx + 1))
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(outcomes)
}

/// Parse a single outcome file; the format follows its extension.
pub fn load_outcomes(path: &Path) -> Result<Vec<Outcome>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read outcome file: {}", path.display()))?;

    parse_outcomes_str(&content, OutcomeFormat::from_path(path))
        .with_context(|| format!("invalid outcome file: {}", path.display()))
}

/// Recursively load every `.toml`/`.json` outcome file under `dir`.
///
/// Files are visited in sorted path order so the resulting stream is stable.
/// Files that fail to parse are skipped with a warning.
pub fn load_outcome_directory(dir: &Path) -> Result<Vec<Outcome>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    let mut outcomes = Vec::new();
    for path in entries {
        if path.is_dir() {
            outcomes.extend(load_outcome_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match load_outcomes(&path) {
                Ok(found) => outcomes.extend(found),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(outcomes)
}

/// Load a file, or every outcome file in a directory.
pub fn load_outcomes_from(path: &Path) -> Result<Vec<Outcome>> {
    if path.is_dir() {
        load_outcome_directory(path)
    } else {
        load_outcomes(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOML: &str = r#"
[[outcomes]]
topic = "Photosynthesis"
correct = true

[[outcomes]]
topic = "Respiration"
correct = false
"#;

    #[test]
    fn parse_valid_toml() {
        let outcomes = parse_outcomes_str(VALID_TOML, OutcomeFormat::Toml).unwrap();
        assert_eq!(
            outcomes,
            vec![
                Outcome::new("Photosynthesis", true),
                Outcome::new("Respiration", false)
            ]
        );
    }

    #[test]
    fn parse_valid_json() {
        let json = r#"{"outcomes": [{"topic": " Genes ", "correct": false}]}"#;
        let outcomes = parse_outcomes_str(json, OutcomeFormat::Json).unwrap();
        assert_eq!(outcomes, vec![Outcome::new("Genes", false)]);
    }

    #[test]
    fn empty_file_has_no_outcomes() {
        assert!(parse_outcomes_str("", OutcomeFormat::Toml).unwrap().is_empty());
        assert!(parse_outcomes_str("{}", OutcomeFormat::Json).unwrap().is_empty());
    }

    #[test]
    fn non_boolean_correct_is_invalid_argument() {
        let toml = "[[outcomes]]\ntopic = \"Cells\"\ncorrect = \"yes\"\n";
        let err = parse_outcomes_str(toml, OutcomeFormat::Toml).unwrap_err();
        let core = err.downcast_ref::<CoreError>().unwrap();
        assert_eq!(core.argument(), "correct");

        let json = r#"{"outcomes": [{"topic": "Cells", "correct": 1}]}"#;
        let err = parse_outcomes_str(json, OutcomeFormat::Json).unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_some());
    }

    #[test]
    fn blank_topic_is_invalid_argument() {
        let toml = "[[outcomes]]\ntopic = \"  \"\ncorrect = true\n";
        let err = parse_outcomes_str(toml, OutcomeFormat::Toml).unwrap_err();
        assert_eq!(err.downcast_ref::<CoreError>().unwrap().argument(), "topic");
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_outcomes_str("this is not [valid toml }{", OutcomeFormat::Toml);
        assert!(result.is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutcomeFormat::from_path(Path::new("a.json")), OutcomeFormat::Json);
        assert_eq!(OutcomeFormat::from_path(Path::new("a.toml")), OutcomeFormat::Toml);
        assert_eq!(OutcomeFormat::from_path(Path::new("a")), OutcomeFormat::Toml);
    }

    #[test]
    fn load_directory_in_sorted_order_skipping_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.toml"),
            "[[outcomes]]\ntopic = \"second\"\ncorrect = true\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"outcomes": [{"topic": "first", "correct": false}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [valid").unwrap();
        std::fs::write(dir.path().join("notes.md"), "## ignored").unwrap();

        let outcomes = load_outcome_directory(dir.path()).unwrap();
        assert_eq!(
            outcomes,
            vec![Outcome::new("first", false), Outcome::new("second", true)]
        );
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load_outcomes(Path::new("does-not-exist.toml")).is_err());
        assert!(load_outcome_directory(Path::new("does-not-exist")).is_err());
    }
}
