//! Checker configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use qc_18_quorum_intersection::domain::{CheckerConfigBuilder, TieBreak};
//!
//! let config = CheckerConfigBuilder::new()
//!     .max_calls(5_000_000)
//!     .time_limit(Duration::from_secs(60))
//!     .tie_break(TieBreak::LowestIndex)
//!     .build()
//!     .expect("Valid config");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::QuorumIntersectionError;

/// How the enumerator chooses among equally constraining split nodes.
///
/// The choice only changes how fast the search converges, never the
/// verdict. The randomness here has no security role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Uniformly random among the candidates with maximal in-degree
    #[default]
    Random,
    /// Lowest node index among the candidates with maximal in-degree
    LowestIndex,
}

/// Quorum intersection checker configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Maximum enumerator calls before the run is reported undetermined
    pub max_calls: Option<u64>,
    /// Wall-clock budget before the run is reported undetermined
    pub time_limit: Option<Duration>,
    /// Split-node tie-break rule
    pub tie_break: TieBreak,
    /// Seed for the random tie-break (entropy when unset)
    pub seed: Option<u64>,
    /// Log the statistics block after each run
    pub log_stats: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_calls: None,
            time_limit: None,
            tie_break: TieBreak::Random,
            seed: None,
            log_stats: true,
        }
    }
}

impl CheckerConfig {
    /// Validate budget settings
    pub fn validate(&self) -> Result<(), QuorumIntersectionError> {
        if self.max_calls == Some(0) {
            return Err(QuorumIntersectionError::InvalidConfig(
                "max_calls cannot be 0".to_string(),
            ));
        }

        if self.time_limit.is_some_and(|limit| limit.is_zero()) {
            return Err(QuorumIntersectionError::InvalidConfig(
                "time_limit cannot be zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the call budget
    pub fn with_max_calls(mut self, calls: u64) -> Self {
        self.max_calls = Some(calls);
        self
    }

    /// Builder-style method to set the time budget
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Builder-style method for a reproducible deterministic search
    pub fn deterministic(mut self) -> Self {
        self.tie_break = TieBreak::LowestIndex;
        self
    }
}

/// Builder for CheckerConfig with validation
#[derive(Default)]
pub struct CheckerConfigBuilder {
    max_calls: Option<u64>,
    time_limit: Option<Duration>,
    tie_break: Option<TieBreak>,
    seed: Option<u64>,
    log_stats: Option<bool>,
}

impl CheckerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_calls(mut self, calls: u64) -> Self {
        self.max_calls = Some(calls);
        self
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = Some(tie_break);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn log_stats(mut self, enabled: bool) -> Self {
        self.log_stats = Some(enabled);
        self
    }

    /// Build the CheckerConfig, validating all parameters
    pub fn build(self) -> Result<CheckerConfig, QuorumIntersectionError> {
        let defaults = CheckerConfig::default();

        let config = CheckerConfig {
            max_calls: self.max_calls.or(defaults.max_calls),
            time_limit: self.time_limit.or(defaults.time_limit),
            tie_break: self.tie_break.unwrap_or(defaults.tie_break),
            seed: self.seed.or(defaults.seed),
            log_stats: self.log_stats.unwrap_or(defaults.log_stats),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CheckerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tie_break, TieBreak::Random);
        assert!(config.max_calls.is_none());
    }

    #[test]
    fn test_config_rejects_zero_call_budget() {
        let config = CheckerConfig::default().with_max_calls(0);
        assert!(matches!(
            config.validate(),
            Err(QuorumIntersectionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_time_limit() {
        let result = CheckerConfigBuilder::new()
            .time_limit(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(QuorumIntersectionError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = CheckerConfigBuilder::new()
            .max_calls(100)
            .time_limit(Duration::from_secs(3))
            .tie_break(TieBreak::LowestIndex)
            .seed(42)
            .log_stats(false)
            .build()
            .expect("Should create valid config");

        assert_eq!(config.max_calls, Some(100));
        assert_eq!(config.time_limit, Some(Duration::from_secs(3)));
        assert_eq!(config.tie_break, TieBreak::LowestIndex);
        assert_eq!(config.seed, Some(42));
        assert!(!config.log_stats);
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = CheckerConfigBuilder::new().build().unwrap();
        assert_eq!(config, CheckerConfig::default());
    }

    #[test]
    fn test_deterministic_shortcut() {
        let config = CheckerConfig::default().deterministic();
        assert_eq!(config.tie_break, TieBreak::LowestIndex);
    }

    #[test]
    fn test_config_json_roundtrip_uses_snake_case() {
        let config = CheckerConfig::default().deterministic();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"lowest_index\""));
        let back: CheckerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
