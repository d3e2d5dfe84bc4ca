//! Concept extraction from markdown-style study notes.
//!
//! `##`/`###` headings open main concepts. Bullet lines (`- `, `* `) and
//! fully bolded lines (`**text**`) under a heading become its subconcepts.
//! Heading levels are flattened: a `###` after a `##` replaces the current
//! parent rather than nesting under it.

use crate::model::{ConceptMap, ConceptSummary, Topic};

/// A classified, trimmed line of notes text.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// A level 2 or 3 heading with its title (possibly empty).
    Heading(&'a str),
    /// A bullet or bold line with its subconcept text (possibly empty).
    Subconcept(String),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 2 || hashes == 3 {
        return Line::Heading(line[hashes..].trim());
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Line::Subconcept(rest.trim().to_string());
    }

    if line.len() >= 2 && line.starts_with("**") && line.ends_with("**") {
        return Line::Subconcept(line.replace("**", "").trim().to_string());
    }

    Line::Other
}

/// Parse notes text into a [`ConceptMap`].
///
/// Blank lines, lines before the first heading, and lines matching neither
/// subconcept form are ignored. A heading with an empty title creates no
/// entry and leaves the current parent unchanged. Empty input gives an empty
/// map.
pub fn extract(text: &str) -> ConceptMap {
    let mut concepts = ConceptMap::new();
    let mut current: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match classify(line) {
            Line::Heading(title) => {
                if !title.is_empty() {
                    concepts.open(title);
                    current = Some(title);
                }
            }
            Line::Subconcept(sub) => {
                if let Some(parent) = current {
                    if !sub.is_empty() {
                        concepts.push_subconcept(parent, sub);
                    }
                }
            }
            Line::Other => {}
        }
    }

    tracing::debug!(
        main_concepts = concepts.len(),
        subconcepts = concepts.total_subconcepts(),
        "extracted concept map"
    );

    concepts
}

/// One [`Topic`] per main concept, in document order.
pub fn build_quiz_topics(text: &str) -> Vec<Topic> {
    topics_from_map(&extract(text))
}

/// Topics for an already extracted concept map.
pub fn topics_from_map(concepts: &ConceptMap) -> Vec<Topic> {
    concepts.concepts().map(Topic::new).collect()
}

/// Count main concepts and subconcepts in `text`.
pub fn analyze(text: &str) -> ConceptSummary {
    summarize(&extract(text))
}

/// Counts for an already extracted concept map.
pub fn summarize(concepts: &ConceptMap) -> ConceptSummary {
    ConceptSummary {
        total_main_concepts: concepts.len(),
        total_subconcepts: concepts.total_subconcepts(),
    }
}
