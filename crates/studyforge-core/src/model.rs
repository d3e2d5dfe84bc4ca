//! Core data model types for studyforge.
//!
//! These are the values passed between the concept extractor, the difficulty
//! planner and the performance tracker.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Two-level outline parsed from study notes: main concept → subconcepts.
///
/// Keys keep document order. Subconcept lists keep document order and may
/// contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptMap {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl ConceptMap {
    /// Create an empty concept map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a main concept. Re-opening an existing key keeps its position and
    /// clears its subconcepts.
    pub(crate) fn open(&mut self, concept: &str) {
        match self.index.get(concept) {
            Some(&idx) => self.entries[idx].1.clear(),
            None => {
                self.index.insert(concept.to_string(), self.entries.len());
                self.entries.push((concept.to_string(), Vec::new()));
            }
        }
    }

    /// Append a subconcept to an already opened main concept.
    pub(crate) fn push_subconcept(&mut self, concept: &str, subconcept: String) {
        if let Some(&idx) = self.index.get(concept) {
            self.entries[idx].1.push(subconcept);
        }
    }

    /// Number of main concepts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no main concept was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subconcepts of `concept`, if it exists.
    pub fn get(&self, concept: &str) -> Option<&[String]> {
        self.index
            .get(concept)
            .map(|&idx| self.entries[idx].1.as_slice())
    }

    /// Iterate `(concept, subconcepts)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(concept, subs)| (concept.as_str(), subs.as_slice()))
    }

    /// Main concept names in document order.
    pub fn concepts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(concept, _)| concept.as_str())
    }

    /// Total number of subconcepts across all main concepts.
    pub fn total_subconcepts(&self) -> usize {
        self.entries.iter().map(|(_, subs)| subs.len()).sum()
    }
}

impl Serialize for ConceptMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (concept, subs) in &self.entries {
            map.serialize_entry(concept, subs)?;
        }
        map.end()
    }
}

/// A main concept treated as a unit of study.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic {
    /// The main concept name.
    pub main: String,
}

impl Topic {
    pub fn new(main: impl Into<String>) -> Self {
        Self { main: main.into() }
    }
}

/// Concept counts for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSummary {
    pub total_main_concepts: usize,
    pub total_subconcepts: usize,
}

/// Ordered difficulty buckets, lowest rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl DifficultyTier {
    /// All tiers in rank order.
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Bronze,
        DifficultyTier::Silver,
        DifficultyTier::Gold,
        DifficultyTier::Platinum,
    ];

    /// Zero-based rank of this tier.
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyTier::Bronze => write!(f, "Bronze"),
            DifficultyTier::Silver => write!(f, "Silver"),
            DifficultyTier::Gold => write!(f, "Gold"),
            DifficultyTier::Platinum => write!(f, "Platinum"),
        }
    }
}

impl FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bronze" => Ok(DifficultyTier::Bronze),
            "silver" => Ok(DifficultyTier::Silver),
            "gold" => Ok(DifficultyTier::Gold),
            "platinum" => Ok(DifficultyTier::Platinum),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

/// Topics grouped into the four difficulty tiers.
///
/// Every tier is always present; unused tiers hold an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPlan {
    #[serde(default)]
    pub bronze: Vec<String>,
    #[serde(default)]
    pub silver: Vec<String>,
    #[serde(default)]
    pub gold: Vec<String>,
    #[serde(default)]
    pub platinum: Vec<String>,
}

impl TierPlan {
    /// Members of `tier`.
    pub fn get(&self, tier: DifficultyTier) -> &[String] {
        match tier {
            DifficultyTier::Bronze => &self.bronze,
            DifficultyTier::Silver => &self.silver,
            DifficultyTier::Gold => &self.gold,
            DifficultyTier::Platinum => &self.platinum,
        }
    }

    pub(crate) fn get_mut(&mut self, tier: DifficultyTier) -> &mut Vec<String> {
        match tier {
            DifficultyTier::Bronze => &mut self.bronze,
            DifficultyTier::Silver => &mut self.silver,
            DifficultyTier::Gold => &mut self.gold,
            DifficultyTier::Platinum => &mut self.platinum,
        }
    }

    /// Iterate tiers in rank order with their members.
    pub fn iter(&self) -> impl Iterator<Item = (DifficultyTier, &[String])> {
        DifficultyTier::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    /// Number of tiers holding at least one topic.
    pub fn populated_tiers(&self) -> usize {
        self.iter().filter(|(_, members)| !members.is_empty()).count()
    }

    /// Progressive study order: Bronze, then Silver, Gold, Platinum.
    pub fn sequence(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(_, members)| members.iter().cloned())
            .collect()
    }
}

/// Per-topic answer counters. `total >= correct` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicStat {
    pub correct: u32,
    pub total: u32,
}

impl TopicStat {
    /// `correct / total`, or 0.0 when nothing was recorded.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// A topic whose accuracy fell below the weak threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakTopic {
    pub topic: String,
    pub accuracy: f64,
    /// Number of recorded attempts.
    pub questions: u32,
}

/// Coarse aggregate skill label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MasteryLevel {
    #[serde(rename = "No Data")]
    NoData,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl MasteryLevel {
    /// Classify an aggregate accuracy. `None` means no attempts were recorded.
    ///
    /// Each band includes its lower edge: 0.9 is Expert, 0.8 is Advanced,
    /// 0.7 is Intermediate.
    pub fn from_accuracy(accuracy: Option<f64>) -> Self {
        match accuracy {
            None => MasteryLevel::NoData,
            Some(a) if a >= 0.9 => MasteryLevel::Expert,
            Some(a) if a >= 0.8 => MasteryLevel::Advanced,
            Some(a) if a >= 0.7 => MasteryLevel::Intermediate,
            Some(_) => MasteryLevel::Beginner,
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasteryLevel::NoData => write!(f, "No Data"),
            MasteryLevel::Beginner => write!(f, "Beginner"),
            MasteryLevel::Intermediate => write!(f, "Intermediate"),
            MasteryLevel::Advanced => write!(f, "Advanced"),
            MasteryLevel::Expert => write!(f, "Expert"),
        }
    }
}

/// One answered quiz item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub topic: String,
    pub correct: bool,
}

impl Outcome {
    pub fn new(topic: impl Into<String>, correct: bool) -> Self {
        Self {
            topic: topic.into(),
            correct,
        }
    }
}
