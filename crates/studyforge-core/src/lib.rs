//! studyforge-core: concept extraction, difficulty tiering, and performance
//! tracking.
//!
//! The pipeline runs in three stages: notes text is parsed into a concept
//! map, the resulting topics are clustered into Bronze/Silver/Gold/Platinum
//! tiers, and answered quiz items are folded into per-topic statistics that
//! yield weak topics and a mastery level. Nothing here persists state.

pub mod concepts;
pub mod error;
pub mod kmeans;
pub mod model;
pub mod outcomes;
pub mod planner;
pub mod tracker;
pub mod vectorize;

pub use error::CoreError;
pub use model::{
    ConceptMap, ConceptSummary, DifficultyTier, MasteryLevel, Outcome, TierPlan, Topic, TopicStat,
    WeakTopic,
};
pub use planner::{DifficultyPlanner, PlannerConfig};
pub use tracker::{PerformanceTracker, DEFAULT_WEAK_THRESHOLD};
