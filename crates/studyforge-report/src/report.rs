//! Study report types with JSON persistence and progress comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studyforge_core::concepts;
use studyforge_core::model::{
    ConceptSummary, DifficultyTier, MasteryLevel, TierPlan, WeakTopic,
};
use studyforge_core::planner::DifficultyPlanner;
use studyforge_core::tracker::PerformanceTracker;

/// A snapshot of one study session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Title of the notes the session studied.
    pub title: String,
    /// Concept counts from the notes.
    pub concepts: ConceptSummary,
    /// Topics grouped by difficulty tier.
    pub tiers: TierPlan,
    /// Progressive study order.
    pub sequence: Vec<String>,
    /// Per-topic accuracy in first-answered order.
    pub topic_stats: Vec<TopicAccuracy>,
    /// Threshold used to select weak topics.
    pub weak_threshold: f64,
    /// Topics below the threshold, lowest accuracy first.
    pub weak_topics: Vec<WeakTopic>,
    /// Overall mastery label.
    pub mastery: MasteryLevel,
    /// Aggregate accuracy, absent when nothing was answered.
    #[serde(default)]
    pub aggregate_accuracy: Option<f64>,
}

/// Accuracy of a single topic within a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAccuracy {
    pub topic: String,
    pub correct: u32,
    pub total: u32,
    pub accuracy: f64,
    /// Tier the topic was planned into, if it appears in the notes.
    #[serde(default)]
    pub tier: Option<DifficultyTier>,
}

impl StudyReport {
    /// Build a report from notes text and a session's recorded answers.
    ///
    /// Fails if `weak_threshold` is not a ratio in `[0.0, 1.0]`.
    pub fn build(
        title: impl Into<String>,
        notes: &str,
        tracker: &PerformanceTracker,
        planner: &DifficultyPlanner,
        weak_threshold: f64,
    ) -> Result<Self> {
        let concept_map = concepts::extract(notes);
        let topics = concepts::topics_from_map(&concept_map);
        let tiers = planner.tier(&topics);
        let sequence = tiers.sequence();

        let tier_of = |topic: &str| {
            tiers
                .iter()
                .find(|(_, members)| members.iter().any(|m| m == topic))
                .map(|(tier, _)| tier)
        };

        let topic_stats = tracker
            .stats()
            .map(|(topic, stat)| TopicAccuracy {
                topic: topic.to_string(),
                correct: stat.correct,
                total: stat.total,
                accuracy: stat.accuracy(),
                tier: tier_of(topic),
            })
            .collect();

        let weak_topics = tracker
            .weak_topics(weak_threshold)
            .context("failed to select weak topics")?;
        tracing::debug!(
            topics = topics.len(),
            answered = tracker.topic_count(),
            weak = weak_topics.len(),
            "assembled study report"
        );

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: title.into(),
            concepts: concepts::summarize(&concept_map),
            sequence,
            tiers,
            topic_stats,
            weak_threshold,
            weak_topics,
            mastery: tracker.mastery_level(),
            aggregate_accuracy: tracker.aggregate_accuracy(),
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::debug!("saved report {} to {}", self.id, path.display());
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: StudyReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", self.title));
        md.push_str(&format!(
            "**Mastery:** {}{} | {} concepts, {} subconcepts\n\n",
            self.mastery,
            self.aggregate_accuracy
                .map(|a| format!(" ({:.1}%)", a * 100.0))
                .unwrap_or_default(),
            self.concepts.total_main_concepts,
            self.concepts.total_subconcepts
        ));

        md.push_str("### Study plan\n\n");
        md.push_str("| Tier | Topics |\n");
        md.push_str("|------|--------|\n");
        for (tier, members) in self.tiers.iter() {
            let listed = if members.is_empty() {
                "-".to_string()
            } else {
                members.join(", ")
            };
            md.push_str(&format!("| {tier} | {listed} |\n"));
        }
        md.push('\n');

        if self.weak_topics.is_empty() {
            md.push_str(&format!(
                "No topics below {:.0}% accuracy.\n",
                self.weak_threshold * 100.0
            ));
        } else {
            md.push_str(&format!(
                "### Weak topics (below {:.0}%)\n\n",
                self.weak_threshold * 100.0
            ));
            md.push_str("| Topic | Accuracy | Questions |\n");
            md.push_str("|-------|----------|-----------|\n");
            for w in &self.weak_topics {
                md.push_str(&format!(
                    "| {} | {:.1}% | {} |\n",
                    w.topic,
                    w.accuracy * 100.0,
                    w.questions
                ));
            }
        }

        md
    }

    /// Compare this session against a baseline session.
    ///
    /// A topic regresses when its accuracy dropped by more than `threshold`
    /// and improves when it rose by more than `threshold`.
    pub fn compare(&self, baseline: &StudyReport, threshold: f64) -> ProgressReport {
        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_topics = 0usize;

        for current in &self.topic_stats {
            let previous = baseline
                .topic_stats
                .iter()
                .find(|b| b.topic == current.topic);

            match previous {
                Some(previous) => {
                    let delta = current.accuracy - previous.accuracy;
                    let change = TopicChange {
                        topic: current.topic.clone(),
                        baseline_accuracy: previous.accuracy,
                        current_accuracy: current.accuracy,
                        delta,
                    };
                    if delta < -threshold {
                        regressions.push(change);
                    } else if delta > threshold {
                        improvements.push(change);
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_topics += 1,
            }
        }

        let removed_topics = baseline
            .topic_stats
            .iter()
            .filter(|b| !self.topic_stats.iter().any(|c| c.topic == b.topic))
            .count();

        ProgressReport {
            baseline_mastery: baseline.mastery,
            current_mastery: self.mastery,
            regressions,
            improvements,
            unchanged,
            new_topics,
            removed_topics,
        }
    }
}

/// Result of comparing two study sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub baseline_mastery: MasteryLevel,
    pub current_mastery: MasteryLevel,
    /// Topics whose accuracy went down.
    pub regressions: Vec<TopicChange>,
    /// Topics whose accuracy went up.
    pub improvements: Vec<TopicChange>,
    /// Topics with no significant change.
    pub unchanged: usize,
    /// Topics answered in the current session only.
    pub new_topics: usize,
    /// Topics answered in the baseline session only.
    pub removed_topics: usize,
}

/// A per-topic accuracy change between two sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicChange {
    pub topic: String,
    pub baseline_accuracy: f64,
    pub current_accuracy: f64,
    pub delta: f64,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Mastery:** {} -> {}\n\n",
            self.baseline_mastery, self.current_mastery
        ));
        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        let sections = [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ];
        for (heading, changes) in sections {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {heading}\n\n"));
            md.push_str("| Topic | Baseline | Current | Delta |\n");
            md.push_str("|-------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:+.1}% |\n",
                    c.topic,
                    c.baseline_accuracy * 100.0,
                    c.current_accuracy * 100.0,
                    c.delta * 100.0
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if any topic regressed.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "## Photosynthesis\n- light reaction\n- dark reaction\n## Respiration\n**aerobic**";

    fn make_report(outcomes: &[(&str, bool)]) -> StudyReport {
        let mut tracker = PerformanceTracker::new();
        tracker.record(outcomes.iter().copied());
        StudyReport::build(
            "Biology",
            NOTES,
            &tracker,
            &DifficultyPlanner::default(),
            0.7,
        )
        .unwrap()
    }

    #[test]
    fn build_collects_every_stage() {
        let report = make_report(&[
            ("Photosynthesis", true),
            ("Photosynthesis", false),
            ("Respiration", true),
        ]);
        assert_eq!(report.concepts.total_main_concepts, 2);
        assert_eq!(report.concepts.total_subconcepts, 3);
        assert_eq!(report.tiers.bronze, vec!["Photosynthesis", "Respiration"]);
        assert_eq!(report.sequence, vec!["Photosynthesis", "Respiration"]);
        assert_eq!(report.weak_topics.len(), 1);
        assert_eq!(report.weak_topics[0].topic, "Photosynthesis");
        assert_eq!(report.topic_stats[0].tier, Some(DifficultyTier::Bronze));
        assert_eq!(report.mastery, MasteryLevel::Beginner);
    }

    #[test]
    fn build_without_answers_has_no_data() {
        let report = make_report(&[]);
        assert_eq!(report.mastery, MasteryLevel::NoData);
        assert!(report.aggregate_accuracy.is_none());
        assert!(report.topic_stats.is_empty());
    }

    #[test]
    fn build_rejects_bad_threshold() {
        let tracker = PerformanceTracker::new();
        let result = StudyReport::build("x", NOTES, &tracker, &DifficultyPlanner::default(), 2.0);
        assert!(result.is_err());
    }

    #[test]
    fn topics_outside_notes_have_no_tier() {
        let report = make_report(&[("Genetics", true)]);
        assert_eq!(report.topic_stats[0].tier, None);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(&[("Respiration", true)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = StudyReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.tiers, report.tiers);
        assert_eq!(loaded.mastery, MasteryLevel::Expert);
    }

    #[test]
    fn compare_identical_sessions() {
        let outcomes = [("Photosynthesis", true), ("Respiration", false)];
        let baseline = make_report(&outcomes);
        let current = make_report(&outcomes);

        let progress = current.compare(&baseline, 0.05);
        assert!(progress.regressions.is_empty());
        assert!(progress.improvements.is_empty());
        assert_eq!(progress.unchanged, 2);
    }

    #[test]
    fn compare_detects_regression_and_improvement() {
        let baseline = make_report(&[("Photosynthesis", true), ("Respiration", false)]);
        let current = make_report(&[("Photosynthesis", false), ("Respiration", true)]);

        let progress = current.compare(&baseline, 0.05);
        assert!(progress.has_regressions());
        assert_eq!(progress.regressions[0].topic, "Photosynthesis");
        assert_eq!(progress.improvements[0].topic, "Respiration");
        assert!((progress.improvements[0].delta - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn compare_with_new_and_removed() {
        let baseline = make_report(&[("Photosynthesis", true)]);
        let current = make_report(&[("Respiration", true)]);

        let progress = current.compare(&baseline, 0.05);
        assert_eq!(progress.new_topics, 1);
        assert_eq!(progress.removed_topics, 1);
    }

    #[test]
    fn markdown_output() {
        let baseline = make_report(&[("Photosynthesis", true)]);
        let current = make_report(&[("Photosynthesis", false)]);

        let md = current.to_markdown();
        assert!(md.contains("# Biology"));
        assert!(md.contains("| Bronze | Photosynthesis, Respiration |"));
        assert!(md.contains("Weak topics"));

        let progress = current.compare(&baseline, 0.05).to_markdown();
        assert!(progress.contains("Regressions"));
        assert!(progress.contains("Expert -> Beginner"));
    }
}
