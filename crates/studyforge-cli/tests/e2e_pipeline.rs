//! End-to-end pipeline tests: notes and outcome files through extraction,
//! planning, tracking and report assembly.

use std::path::Path;

use studyforge_core::concepts;
use studyforge_core::model::MasteryLevel;
use studyforge_core::outcomes::load_outcomes_from;
use studyforge_core::planner::{DifficultyPlanner, PlannerConfig};
use studyforge_core::tracker::PerformanceTracker;
use studyforge_report::report::StudyReport;

fn biology_notes() -> String {
    std::fs::read_to_string("../../notes/biology.md").unwrap()
}

#[test]
fn e2e_extracts_biology_notes() {
    let map = concepts::extract(&biology_notes());

    let names: Vec<&str> = map.concepts().collect();
    assert_eq!(
        names,
        vec![
            "Photosynthesis",
            "Cellular respiration",
            "Cell division",
            "Genetics",
            "Ecology"
        ]
    );
    assert_eq!(
        map.get("Photosynthesis").unwrap().to_vec(),
        vec!["light reaction", "dark reaction", "chlorophyll"]
    );
    assert_eq!(map.total_subconcepts(), 13);
}

#[test]
fn e2e_plan_places_each_topic_once() {
    let topics = concepts::build_quiz_topics(&biology_notes());
    let plan = DifficultyPlanner::default().tier(&topics);

    assert_eq!(plan.populated_tiers(), 4);
    let mut placed = plan.sequence();
    assert_eq!(placed.len(), topics.len());
    placed.sort();
    placed.dedup();
    assert_eq!(placed.len(), topics.len());
}

#[test]
fn e2e_plan_is_deterministic_for_a_seed() {
    let topics = concepts::build_quiz_topics(&biology_notes());
    let config = PlannerConfig {
        seed: 7,
        ..PlannerConfig::default()
    };

    let first = DifficultyPlanner::new(config.clone()).unwrap().tier(&topics);
    let second = DifficultyPlanner::new(config).unwrap().tier(&topics);
    assert_eq!(first, second);
}

#[test]
fn e2e_outcome_file_feeds_tracker() {
    let outcomes = load_outcomes_from(Path::new("../../notes/biology-outcomes.toml")).unwrap();
    assert_eq!(outcomes.len(), 7);

    let mut tracker = PerformanceTracker::new();
    tracker.record_outcomes(&outcomes);

    assert_eq!(tracker.topic_count(), 4);
    assert_eq!(tracker.total_correct(), 4);
    assert_eq!(tracker.mastery_level(), MasteryLevel::Beginner);

    let weak: Vec<String> = tracker
        .weak_topics(0.7)
        .unwrap()
        .into_iter()
        .map(|w| w.topic)
        .collect();
    assert_eq!(weak, vec!["Genetics", "Cellular respiration"]);
}

#[test]
fn e2e_session_directory_accumulates_in_file_order() {
    let outcomes = load_outcomes_from(Path::new("../../notes/sessions")).unwrap();
    let topics: Vec<&str> = outcomes.iter().map(|o| o.topic.as_str()).collect();
    assert_eq!(topics, vec!["Photosynthesis", "Genetics", "Genetics", "Ecology"]);

    let mut tracker = PerformanceTracker::new();
    tracker.record_outcomes(&outcomes);
    let genetics = tracker.topic_stat("Genetics").unwrap();
    assert_eq!((genetics.correct, genetics.total), (1, 2));
}

#[test]
fn e2e_report_links_stats_to_tiers() {
    let notes = biology_notes();
    let outcomes = load_outcomes_from(Path::new("../../notes/biology-outcomes.toml")).unwrap();
    let mut tracker = PerformanceTracker::new();
    tracker.record_outcomes(&outcomes);

    let report = StudyReport::build(
        "Biology",
        &notes,
        &tracker,
        &DifficultyPlanner::default(),
        0.7,
    )
    .unwrap();

    assert_eq!(report.concepts.total_main_concepts, 5);
    assert_eq!(report.sequence.len(), 5);
    assert_eq!(report.topic_stats.len(), 4);
    for stat in &report.topic_stats {
        let tier = stat.tier.unwrap();
        assert!(report.tiers.get(tier).contains(&stat.topic));
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biology.json");
    report.save_json(&path).unwrap();
    let loaded = StudyReport::load_json(&path).unwrap();
    assert_eq!(loaded.tiers, report.tiers);
    assert_eq!(loaded.mastery, MasteryLevel::Beginner);
}
