//! studyforge configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studyforge_core::kmeans::{DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, DEFAULT_TOLERANCE};
use studyforge_core::planner::PlannerConfig;
use studyforge_core::tracker::DEFAULT_WEAK_THRESHOLD;

/// Top-level studyforge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyforgeConfig {
    /// Seed for topic clustering.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Cap on k-means iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// k-means convergence tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Accuracy below which a topic is reported as weak.
    #[serde(default = "default_weak_threshold")]
    pub weak_threshold: f64,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
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
fn default_weak_threshold() -> f64 {
    DEFAULT_WEAK_THRESHOLD
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./studyforge-results")
}

impl Default for StudyforgeConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            weak_threshold: default_weak_threshold(),
            output_dir: default_output_dir(),
        }
    }
}

impl StudyforgeConfig {
    /// Clustering parameters for the difficulty planner.
    pub fn planner(&self) -> PlannerConfig {
        PlannerConfig {
            seed: self.seed,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `studyforge.toml` in the current directory
/// 2. `~/.config/studyforge/config.toml`
///
/// Environment variable overrides: `STUDYFORGE_SEED`, `STUDYFORGE_WEAK_THRESHOLD`.
pub fn load_config_from(path: Option<&Path>) -> Result<StudyforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studyforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<StudyforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => StudyforgeConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

/// Apply `STUDYFORGE_*` overrides using `lookup` to read variables.
fn apply_env_overrides(
    config: &mut StudyforgeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(seed) = lookup("STUDYFORGE_SEED") {
        config.seed = seed
            .trim()
            .parse()
            .with_context(|| format!("STUDYFORGE_SEED is not an unsigned integer: {seed}"))?;
    }

    if let Some(threshold) = lookup("STUDYFORGE_WEAK_THRESHOLD") {
        config.weak_threshold = threshold.trim().parse().with_context(|| {
            format!("STUDYFORGE_WEAK_THRESHOLD is not a number: {threshold}")
        })?;
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studyforge"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let config = StudyforgeConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_iterations, 300);
        assert!((config.weak_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.planner(), PlannerConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let config: StudyforgeConfig = toml::from_str("seed = 7\nweak_threshold = 0.5\n").unwrap();
        assert_eq!(config.seed, 7);
        assert!((config.weak_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 300);
        assert_eq!(config.output_dir, PathBuf::from("./studyforge-results"));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("STUDYFORGE_SEED", "99"),
            ("STUDYFORGE_WEAK_THRESHOLD", " 0.6 "),
        ]
        .into_iter()
        .collect();
        let mut config = StudyforgeConfig::default();
        apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.seed, 99);
        assert!((config.weak_threshold - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_env_override_is_an_error() {
        let mut config = StudyforgeConfig::default();
        let result = apply_env_overrides(&mut config, |k| {
            (k == "STUDYFORGE_SEED").then(|| "not-a-number".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "max_iterations = 50\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = load_config_from(Some(Path::new("definitely-missing.toml")));
        assert!(result.is_err());
    }
}
