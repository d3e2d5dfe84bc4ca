//! Seeded k-means clustering.
//!
//! Centroids are seeded with k-means++ from a `StdRng` built with
//! `seed_from_u64`, then refined with Lloyd iterations. Identical input and
//! seed always give identical labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CoreError;

/// Default RNG seed for reproducible clustering.
pub const DEFAULT_SEED: u64 = 42;
/// Default cap on Lloyd iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
/// Default convergence threshold on total squared centroid shift.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// K-means parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    k: usize,
    seed: u64,
    max_iterations: usize,
    tolerance: f64,
}

/// Result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster label per input point, in input order.
    pub labels: Vec<usize>,
    /// Final centroid per label.
    pub centroids: Vec<Vec<f64>>,
    /// Lloyd iterations performed.
    pub iterations: usize,
    /// Whether the centroid shift dropped below the tolerance.
    pub converged: bool,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the nearest centroid; ties go to the lowest index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best.1 {
            best = (idx, dist);
        }
    }
    best
}

impl KMeans {
    /// K-means with `k` clusters and default seed, iteration cap and tolerance.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Cluster `points`.
    ///
    /// Fails if `k` is zero or larger than the number of points, if the
    /// iteration cap is zero, or if the points have differing dimensions.
    pub fn fit(&self, points: &[Vec<f64>]) -> Result<KMeansFit, CoreError> {
        if self.k == 0 || self.k > points.len() {
            return Err(CoreError::invalid_argument(
                "k",
                format!("expected 1..={} clusters, got {}", points.len(), self.k),
            ));
        }
        if self.max_iterations == 0 {
            return Err(CoreError::invalid_argument(
                "max_iterations",
                "must be at least 1",
            ));
        }
        let dim = points[0].len();
        if points.iter().any(|p| p.len() != dim) {
            return Err(CoreError::invalid_argument(
                "points",
                "all points must have the same dimension",
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.seed_centroids(points, &mut rng);
        let mut labels = vec![0; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            for (label, point) in labels.iter_mut().zip(points) {
                *label = nearest(point, &centroids).0;
            }

            let mut sums = vec![vec![0.0; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (&label, point) in labels.iter().zip(points) {
                counts[label] += 1;
                for (sum, value) in sums[label].iter_mut().zip(point) {
                    *sum += value;
                }
            }

            let mut shift = 0.0;
            for (idx, (sum, count)) in sums.into_iter().zip(counts).enumerate() {
                // An emptied cluster keeps its previous centroid.
                if count == 0 {
                    continue;
                }
                let updated: Vec<f64> = sum.into_iter().map(|s| s / count as f64).collect();
                shift += squared_distance(&centroids[idx], &updated);
                centroids[idx] = updated;
            }

            if shift <= self.tolerance {
                converged = true;
                break;
            }
        }

        let mut inertia = 0.0;
        for (label, point) in labels.iter_mut().zip(points) {
            let (idx, dist) = nearest(point, &centroids);
            *label = idx;
            inertia += dist;
        }

        tracing::debug!(
            k = self.k,
            points = points.len(),
            iterations,
            converged,
            inertia,
            "k-means finished"
        );

        Ok(KMeansFit {
            labels,
            centroids,
            iterations,
            converged,
            inertia,
        })
    }

    /// k-means++ seeding: each new centroid is drawn with probability
    /// proportional to its squared distance from the nearest chosen one.
    fn seed_centroids(&self, points: &[Vec<f64>], rng: &mut StdRng) -> Vec<Vec<f64>> {
        let mut centroids = Vec::with_capacity(self.k);
        centroids.push(points[rng.gen_range(0..points.len())].clone());

        let mut closest: Vec<f64> = points
            .iter()
            .map(|p| squared_distance(p, &centroids[0]))
            .collect();

        while centroids.len() < self.k {
            let total: f64 = closest.iter().sum();
            let chosen = if total > 0.0 {
                let mut target = rng.gen::<f64>() * total;
                let mut chosen = None;
                let mut last_positive = 0;
                for (idx, &dist) in closest.iter().enumerate() {
                    if dist <= 0.0 {
                        continue;
                    }
                    last_positive = idx;
                    if target < dist {
                        chosen = Some(idx);
                        break;
                    }
                    target -= dist;
                }
                chosen.unwrap_or(last_positive)
            } else {
                // Every point coincides with a centroid already.
                rng.gen_range(0..points.len())
            };

            let centroid = points[chosen].clone();
            for (best, point) in closest.iter_mut().zip(points) {
                *best = best.min(squared_distance(point, &centroid));
            }
            centroids.push(centroid);
        }

        centroids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.0],
            vec![10.0, 10.1],
        ]
    }

    #[test]
    fn separates_obvious_blobs() {
        let fit = KMeans::new(2).fit(&blobs()).unwrap();
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[0], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_eq!(fit.labels[3], fit.labels[5]);
        assert_ne!(fit.labels[0], fit.labels[3]);
        assert!(fit.converged);
        assert!(fit.inertia < 0.1);
    }

    #[test]
    fn same_seed_same_labels() {
        let points = blobs();
        let a = KMeans::new(3).with_seed(7).fit(&points).unwrap();
        let b = KMeans::new(3).with_seed(7).fit(&points).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn every_point_gets_a_label_in_range() {
        let fit = KMeans::new(4).fit(&blobs()).unwrap();
        assert_eq!(fit.labels.len(), 6);
        assert!(fit.labels.iter().all(|&l| l < 4));
        assert_eq!(fit.centroids.len(), 4);
    }

    #[test]
    fn identical_points_do_not_panic() {
        let points = vec![vec![1.0, 1.0]; 5];
        let fit = KMeans::new(4).fit(&points).unwrap();
        assert_eq!(fit.labels.len(), 5);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn rejects_bad_k() {
        assert!(KMeans::new(0).fit(&blobs()).is_err());
        assert!(KMeans::new(7).fit(&blobs()).is_err());
    }

    #[test]
    fn rejects_ragged_points() {
        let points = vec![vec![0.0, 0.0], vec![1.0]];
        let err = KMeans::new(1).fit(&points).unwrap_err();
        assert_eq!(err.argument(), "points");
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = KMeans::new(2)
            .with_max_iterations(0)
            .fit(&blobs())
            .unwrap_err();
        assert_eq!(err.argument(), "max_iterations");
    }
}
