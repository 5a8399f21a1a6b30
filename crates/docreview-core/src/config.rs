use crate::error::DocReviewError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the persisted state location.
pub const STORE_ENV_VAR: &str = "DOCREVIEW_STORE";

/// Default location of the persisted state, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = ".docreview/state.json";

/// Tolerances used when reconstructing lines from positioned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Maximum horizontal distance between an item and a column center.
    pub column_tolerance: f64,
    /// Maximum vertical distance between an item and its line's reference y.
    pub line_tolerance: f64,
    /// A gap larger than `gap_threshold` times the median gap gets virtual lines.
    pub gap_threshold: f64,
    /// Upper bound on the virtual lines placed in a single gap; 0 disables padding.
    pub max_virtual_per_gap: usize,
    /// Height assigned to a line that has no measurable items.
    pub fallback_line_height: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            column_tolerance: 24.0,
            line_tolerance: 2.0,
            gap_threshold: 1.6,
            max_virtual_per_gap: 50,
            fallback_line_height: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Where a jumped-to heading lands, as a fraction of the viewport height.
    pub jump_offset_fraction: f64,
    /// Delay of the follow-up recomputation after a layout burst.
    pub follow_up_delay_ms: u64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            jump_offset_fraction: 0.35,
            follow_up_delay_ms: 120,
        }
    }
}

impl AnchorConfig {
    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub index: IndexConfig,
    /// Search radius of the nearest-line lookup.
    pub locate_radius: f64,
    pub anchors: AnchorConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            locate_radius: 8.0,
            anchors: AnchorConfig::default(),
            store_path: None,
        }
    }
}

impl ReviewConfig {
    /// Resolve the state file: explicit path, then `DOCREVIEW_STORE`, then
    /// the config value, then the default.
    pub fn resolve_store_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Ok(env_path) = std::env::var(STORE_ENV_VAR) {
            if !env_path.trim().is_empty() {
                return PathBuf::from(env_path);
            }
        }
        self.store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<ReviewConfig, DocReviewError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocReviewError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: ReviewConfig =
        serde_json::from_str(&content).map_err(|e| DocReviewError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<ReviewConfig, DocReviewError> {
    let config: ReviewConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &ReviewConfig) -> Result<(), DocReviewError> {
    let index = &config.index;
    let positive = [
        ("index.column_tolerance", index.column_tolerance),
        ("index.line_tolerance", index.line_tolerance),
        ("index.fallback_line_height", index.fallback_line_height),
        ("locate_radius", config.locate_radius),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(DocReviewError::ConfigInvalid(format!(
                "{name} must be a positive number (got {value})"
            )));
        }
    }

    if !(index.gap_threshold.is_finite() && index.gap_threshold > 1.0) {
        return Err(DocReviewError::ConfigInvalid(format!(
            "index.gap_threshold must be greater than 1 (got {})",
            index.gap_threshold
        )));
    }

    let fraction = config.anchors.jump_offset_fraction;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(DocReviewError::ConfigInvalid(format!(
            "anchors.jump_offset_fraction must be within [0, 1] (got {fraction})"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = parse_config_str("{}").unwrap();
        assert_eq!(config, ReviewConfig::default());
        assert_eq!(config.index.column_tolerance, 24.0);
        assert_eq!(config.index.gap_threshold, 1.6);
        assert_eq!(config.locate_radius, 8.0);
        assert_eq!(config.anchors.follow_up_delay(), Duration::from_millis(120));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse_config_str(r#"{"index": {"line_tolerance": 3.5}}"#).unwrap();
        assert_eq!(config.index.line_tolerance, 3.5);
        assert_eq!(config.index.column_tolerance, 24.0);
    }

    #[test]
    fn virtual_cap_defaults_and_overrides() {
        assert_eq!(IndexConfig::default().max_virtual_per_gap, 50);
        let config = parse_config_str(r#"{"index": {"max_virtual_per_gap": 5}}"#).unwrap();
        assert_eq!(config.index.max_virtual_per_gap, 5);
        assert_eq!(config.index.gap_threshold, 1.6);
    }

    #[test]
    fn rejects_threshold_at_or_below_one() {
        let err = parse_config_str(r#"{"index": {"gap_threshold": 1.0}}"#).unwrap_err();
        assert!(err.to_string().contains("gap_threshold"));
    }

    #[test]
    fn rejects_fraction_outside_unit_interval() {
        assert!(parse_config_str(r#"{"anchors": {"jump_offset_fraction": 1.5}}"#).is_err());
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert!(parse_config_str(r#"{"locate_radius": 0}"#).is_err());
    }

    #[test]
    fn explicit_store_path_wins() {
        let config = ReviewConfig {
            store_path: Some(PathBuf::from("from-config.json")),
            ..Default::default()
        };
        let resolved = config.resolve_store_path(Some(Path::new("explicit.json")));
        assert_eq!(resolved, PathBuf::from("explicit.json"));
    }

    #[test]
    fn load_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        match load_config(&path) {
            Err(DocReviewError::ConfigLoad { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ConfigLoad, got {other:?}"),
        }
    }
}
