//! Difficulty planning: similarity clustering and tiered study order.
//!
//! Topic names are embedded with TF-IDF and grouped with seeded k-means.
//! Clusters are then ranked by ascending label and poured into the Bronze,
//! Silver, Gold and Platinum tiers in that order. Label magnitude is the only
//! ordering signal; it is not a measure of how hard a cluster's topics are.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::kmeans::{KMeans, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, DEFAULT_TOLERANCE};
use crate::model::{DifficultyTier, TierPlan, Topic};
use crate::vectorize::TfIdf;

/// Below this many topics everything goes into cluster 0.
pub const MIN_TOPICS_FOR_CLUSTERING: usize = 4;

/// Upper bound on the number of clusters, one per tier.
pub const MAX_CLUSTERS: usize = DifficultyTier::ALL.len();

/// Tuning for the clustering step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Seed for k-means++ initialization.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Cap on Lloyd iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Convergence threshold on total squared centroid shift.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl PlannerConfig {
    /// Check the iteration cap and tolerance.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_iterations == 0 {
            return Err(CoreError::invalid_argument(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(CoreError::invalid_argument(
                "tolerance",
                format!("expected a finite, non-negative number, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// Groups topics by name similarity and orders them into difficulty tiers.
#[derive(Debug, Clone, Default)]
pub struct DifficultyPlanner {
    config: PlannerConfig,
}

impl DifficultyPlanner {
    /// Build a planner, rejecting an invalid configuration.
    pub fn new(config: PlannerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Cluster topics by name similarity.
    ///
    /// With fewer than [`MIN_TOPICS_FOR_CLUSTERING`] topics every name lands
    /// in cluster 0. Otherwise `min(4, n)` clusters are formed. Members keep
    /// input order within their cluster. Labels may have gaps when k-means
    /// leaves a cluster empty.
    pub fn cluster(&self, topics: &[Topic]) -> BTreeMap<usize, Vec<String>> {
        let names: Vec<&str> = topics.iter().map(|t| t.main.as_str()).collect();
        let mut clusters: BTreeMap<usize, Vec<String>> = BTreeMap::new();

        if names.len() < MIN_TOPICS_FOR_CLUSTERING {
            clusters.insert(0, names.iter().map(|n| n.to_string()).collect());
            return clusters;
        }

        let (_, vectors) = TfIdf::fit_transform(&names);
        let k = MAX_CLUSTERS.min(names.len());
        let kmeans = KMeans::new(k)
            .with_seed(self.config.seed)
            .with_max_iterations(self.config.max_iterations)
            .with_tolerance(self.config.tolerance);

        let labels = match kmeans.fit(&vectors) {
            Ok(fit) => fit.labels,
            Err(e) => {
                // Unreachable with a validated config and k <= n.
                tracing::warn!(error = %e, "k-means rejected its input, using one cluster");
                vec![0; names.len()]
            }
        };

        for (name, label) in names.iter().zip(labels) {
            clusters.entry(label).or_default().push(name.to_string());
        }

        tracing::debug!(
            topics = names.len(),
            clusters = clusters.len(),
            "clustered topics"
        );

        clusters
    }

    /// Assign clusters to tiers in ascending label order.
    ///
    /// The first cluster goes to Bronze, the second to Silver and so on.
    /// Tiers past the last cluster stay empty. Empty input gives four empty
    /// tiers.
    pub fn tier(&self, topics: &[Topic]) -> TierPlan {
        let mut plan = TierPlan::default();
        if topics.is_empty() {
            return plan;
        }

        let clusters = self.cluster(topics);
        for (tier, (_, members)) in DifficultyTier::ALL.into_iter().zip(clusters) {
            *plan.get_mut(tier) = members;
        }

        tracing::debug!(
            bronze = plan.bronze.len(),
            silver = plan.silver.len(),
            gold = plan.gold.len(),
            platinum = plan.platinum.len(),
            "tiered topics"
        );

        plan
    }

    /// Progressive study order: Bronze + Silver + Gold + Platinum.
    pub fn sequence(&self, topics: &[Topic]) -> Vec<String> {
        self.tier(topics).sequence()
    }
}
