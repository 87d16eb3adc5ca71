//! Service configuration loaded from environment variables.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::LocationBounds;

/// How strictly `complete` and `prepare` requests are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// The order must exist and may only move forward through
    /// `Created -> Completed -> Prepared`. Repeating the current state is a no-op.
    #[default]
    Strict,

    /// The requested state is written unconditionally, even for unknown ids.
    Permissive,
}

impl FromStr for TransitionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TransitionPolicy::Strict),
            "permissive" => Ok(TransitionPolicy::Permissive),
            _ => Err(ConfigError::Invalid {
                key: "PANCAKE_TRANSITIONS",
                value: s.to_string(),
            }),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Order service configuration.
///
/// Reads from environment variables:
/// - `PANCAKE_MIN_BUILDING` / `PANCAKE_MAX_BUILDING` (default: `1` / `10`)
/// - `PANCAKE_MIN_ROOM` / `PANCAKE_MAX_ROOM` (default: `1` / `1000`)
/// - `PANCAKE_TRANSITIONS` — `strict` or `permissive` (default: `strict`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub bounds: LocationBounds,
    pub transitions: TransitionPolicy,
}

impl ServiceConfig {
    /// Loads configuration from the process environment.
    ///
    /// Missing variables fall back to defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LocationBounds::default();
        let bound = |key: &'static str, default: u32| -> Result<u32, ConfigError> {
            match lookup(key) {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
                None => Ok(default),
            }
        };

        let bounds = LocationBounds::new(
            bound("PANCAKE_MIN_BUILDING", defaults.min_building)?,
            bound("PANCAKE_MAX_BUILDING", defaults.max_building)?,
            bound("PANCAKE_MIN_ROOM", defaults.min_room)?,
            bound("PANCAKE_MAX_ROOM", defaults.max_room)?,
        );

        let transitions = match lookup("PANCAKE_TRANSITIONS") {
            Some(value) => value.parse()?,
            None => TransitionPolicy::default(),
        };

        Ok(Self {
            bounds,
            transitions,
        })
    }

    pub fn with_bounds(mut self, bounds: LocationBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_transitions(mut self, transitions: TransitionPolicy) -> Self {
        self.transitions = transitions;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.bounds, LocationBounds::new(1, 10, 1, 1000));
        assert_eq!(config.transitions, TransitionPolicy::Strict);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("PANCAKE_MIN_BUILDING", "2"),
            ("PANCAKE_MAX_BUILDING", "20"),
            ("PANCAKE_MIN_ROOM", "100"),
            ("PANCAKE_MAX_ROOM", " 499 "),
            ("PANCAKE_TRANSITIONS", "Permissive"),
        ]))
        .unwrap();

        assert_eq!(config.bounds, LocationBounds::new(2, 20, 100, 499));
        assert_eq!(config.transitions, TransitionPolicy::Permissive);
    }

    #[test]
    fn test_negative_bound_is_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[("PANCAKE_MIN_ROOM", "-1")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PANCAKE_MIN_ROOM",
                value: "-1".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = ServiceConfig::from_lookup(lookup(&[("PANCAKE_TRANSITIONS", "lenient")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "PANCAKE_TRANSITIONS",
                ..
            })
        ));
    }

    #[test]
    fn test_builder_methods() {
        let config = ServiceConfig::default()
            .with_bounds(LocationBounds::new(0, 1, 0, 1))
            .with_transitions(TransitionPolicy::Permissive);
        assert_eq!(config.bounds.max_room, 1);
        assert_eq!(config.transitions, TransitionPolicy::Permissive);
    }

    #[test]
    fn test_policy_serializes_in_lowercase() {
        assert_eq!(serde_json::to_string(&TransitionPolicy::Strict).unwrap(), "\"strict\"");
        let policy: TransitionPolicy = serde_json::from_str("\"permissive\"").unwrap();
        assert_eq!(policy, TransitionPolicy::Permissive);
    }

    #[test]
    fn test_service_config_serde() {
        let config = ServiceConfig::default()
            .with_bounds(LocationBounds::new(2, 4, 10, 20))
            .with_transitions(TransitionPolicy::Permissive);

        let value = serde_json::to_value(config).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "bounds": {
                    "min_building": 2,
                    "max_building": 4,
                    "min_room": 10,
                    "max_room": 20
                },
                "transitions": "permissive"
            })
        );

        let back: ServiceConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }
}
