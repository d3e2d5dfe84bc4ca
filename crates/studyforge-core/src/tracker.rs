//! Quiz performance tracking.
//!
//! A frequency-ratio estimator: per-topic `correct / total` counters,
//! thresholded into weak topics, plus an aggregate accuracy banded into a
//! [`MasteryLevel`]. One tracker belongs to one study session.

use std::collections::HashMap;

use crate::error::{check_unit_interval, CoreError};
use crate::model::{MasteryLevel, Outcome, TopicStat, WeakTopic};

/// Accuracy below which a topic counts as weak when no threshold is given.
pub const DEFAULT_WEAK_THRESHOLD: f64 = 0.7;

/// Running per-topic answer statistics for one session.
#[derive(Debug, Clone, Default)]
pub struct PerformanceTracker {
    /// Insertion order is first-seen order.
    stats: Vec<(String, TopicStat)>,
    index: HashMap<String, usize>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every recorded attempt.
    pub fn reset(&mut self) {
        self.stats.clear();
        self.index.clear();
    }

    fn stat_mut(&mut self, topic: &str) -> &mut TopicStat {
        let idx = match self.index.get(topic) {
            Some(&idx) => idx,
            None => {
                let idx = self.stats.len();
                self.index.insert(topic.to_string(), idx);
                self.stats.push((topic.to_string(), TopicStat::default()));
                idx
            }
        };
        &mut self.stats[idx].1
    }

    /// Record a single answer.
    pub fn record_one(&mut self, topic: &str, correct: bool) {
        let stat = self.stat_mut(topic);
        stat.total += 1;
        if correct {
            stat.correct += 1;
        }
    }

    /// Record a stream of `(topic, correct)` answers in order.
    ///
    /// Every attempt counts; repeating a stream doubles its counts.
    pub fn record<I, S>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut recorded = 0usize;
        for (topic, correct) in outcomes {
            self.record_one(topic.as_ref(), correct);
            recorded += 1;
        }
        tracing::debug!(recorded, topics = self.stats.len(), "recorded outcomes");
    }

    /// Record parsed [`Outcome`] values.
    pub fn record_outcomes<'a, I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = &'a Outcome>,
    {
        self.record(outcomes.into_iter().map(|o| (o.topic.as_str(), o.correct)));
    }

    /// Counters for `topic`, if any attempt was recorded.
    pub fn topic_stat(&self, topic: &str) -> Option<TopicStat> {
        self.index.get(topic).map(|&idx| self.stats[idx].1)
    }

    /// All counters in first-seen order.
    pub fn stats(&self) -> impl Iterator<Item = (&str, TopicStat)> {
        self.stats.iter().map(|(topic, stat)| (topic.as_str(), *stat))
    }

    /// Number of topics with at least one recorded attempt.
    pub fn topic_count(&self) -> usize {
        self.stats.len()
    }

    /// Total answers recorded across all topics.
    pub fn total_attempts(&self) -> u64 {
        self.stats.iter().map(|(_, s)| s.total as u64).sum()
    }

    /// Total correct answers across all topics.
    pub fn total_correct(&self) -> u64 {
        self.stats.iter().map(|(_, s)| s.correct as u64).sum()
    }

    /// Aggregate accuracy, or `None` if nothing was recorded.
    pub fn aggregate_accuracy(&self) -> Option<f64> {
        let total = self.total_attempts();
        if total == 0 {
            None
        } else {
            Some(self.total_correct() as f64 / total as f64)
        }
    }

    /// Topics with accuracy strictly below `threshold`, lowest first.
    ///
    /// Equal accuracies keep first-seen order. `threshold` must be a finite
    /// value in `[0.0, 1.0]`.
    pub fn weak_topics(&self, threshold: f64) -> Result<Vec<WeakTopic>, CoreError> {
        let threshold = check_unit_interval("threshold", threshold)?;

        let mut weak: Vec<WeakTopic> = self
            .stats
            .iter()
            .filter_map(|(topic, stat)| {
                let accuracy = stat.accuracy();
                (accuracy < threshold).then(|| WeakTopic {
                    topic: topic.clone(),
                    accuracy,
                    questions: stat.total,
                })
            })
            .collect();

        // Stable, so ties stay in first-seen order.
        weak.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
        Ok(weak)
    }

    /// [`weak_topics`](Self::weak_topics) with [`DEFAULT_WEAK_THRESHOLD`].
    pub fn weak_topics_default(&self) -> Vec<WeakTopic> {
        self.weak_topics(DEFAULT_WEAK_THRESHOLD)
            .unwrap_or_default()
    }

    /// Overall mastery from aggregate accuracy.
    pub fn mastery_level(&self) -> MasteryLevel {
        MasteryLevel::from_accuracy(self.aggregate_accuracy())
    }
}
