//! CLI settings from environment.

use pathplan_core::CoveragePlanner;
use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub overlap_multiplier: f64,
    pub min_points_per_ring: usize,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let planner = CoveragePlanner::default();
        Self {
            overlap_multiplier: planner.overlap_multiplier,
            min_points_per_ring: planner.min_points_per_ring,
            log_json: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            overlap_multiplier: lookup("PATHPLAN_OVERLAP_MULTIPLIER")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.overlap_multiplier),
            min_points_per_ring: lookup("PATHPLAN_MIN_RING_POINTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_points_per_ring),
            log_json: lookup("PATHPLAN_LOG_JSON")
                .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn planner(&self) -> CoveragePlanner {
        CoveragePlanner {
            overlap_multiplier: self.overlap_multiplier,
            min_points_per_ring: self.min_points_per_ring,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.overlap_multiplier, 1.2);
        assert_eq!(settings.min_points_per_ring, 3);
        assert!(!settings.log_json);
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PATHPLAN_OVERLAP_MULTIPLIER", "1.5"),
            ("PATHPLAN_MIN_RING_POINTS", "8"),
            ("PATHPLAN_LOG_JSON", "1"),
        ]));
        assert_eq!(settings.overlap_multiplier, 1.5);
        assert_eq!(settings.min_points_per_ring, 8);
        assert!(settings.log_json);

        let planner = settings.planner();
        assert_eq!(planner.overlap_multiplier, 1.5);
        assert_eq!(planner.min_points_per_ring, 8);
    }

    #[test]
    fn garbage_falls_back() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PATHPLAN_OVERLAP_MULTIPLIER", "lots"),
            ("PATHPLAN_MIN_RING_POINTS", "-4"),
        ]));
        assert_eq!(settings.overlap_multiplier, 1.2);
        assert_eq!(settings.min_points_per_ring, 3);
    }
}
