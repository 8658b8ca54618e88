//! Validator configuration
//!
//! All knobs have defaults, so a partial JSON document is enough:
//!
//! ```rust
//! use structval::{DuplicatePolicy, ValidatorConfig};
//!
//! let config = ValidatorConfig::from_json(r#"{ "on_duplicate": "reject" }"#).unwrap();
//! assert_eq!(config.on_duplicate, DuplicatePolicy::Reject);
//! assert_eq!(config.max_alias_depth, 16);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default bound on transitive alias expansion.
pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 16;

/// Default bound on walker nesting (structs, collections and mappings combined).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default number of distinct rule specs whose compiled plans are cached.
pub const DEFAULT_MAX_CACHED_PLANS: usize = 1024;

/// What the registry does when a name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Replace the previous entry and emit a warning.
    #[default]
    Replace,
    /// Fail with [`Error::DuplicateRule`](crate::Error::DuplicateRule).
    Reject,
}

/// How many failures a single field may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// Stop at the first failing rule of a field.
    #[default]
    FirstFailure,
    /// Evaluate every rule of a field and report each failure.
    AllFailures,
}

/// Engine and registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Policy for re-registering an existing rule or alias name.
    pub on_duplicate: DuplicatePolicy,
    /// Maximum alias expansion depth before an alias is treated as cyclic.
    pub max_alias_depth: usize,
    /// Maximum walker nesting depth.
    pub max_depth: usize,
    /// Per-field failure reporting.
    pub field_mode: FieldMode,
    /// Maximum number of cached rule-spec plans.
    pub max_cached_plans: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            on_duplicate: DuplicatePolicy::default(),
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            field_mode: FieldMode::default(),
            max_cached_plans: DEFAULT_MAX_CACHED_PLANS,
        }
    }
}

impl ValidatorConfig {
    /// Parses a configuration from JSON; missing keys take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Sets the duplicate-registration policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    /// Sets the alias expansion depth limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    /// Sets the walker nesting limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the per-field failure mode.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field_mode(mut self, mode: FieldMode) -> Self {
        self.field_mode = mode;
        self
    }

    /// Sets the plan-cache capacity.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_cached_plans(mut self, capacity: usize) -> Self {
        self.max_cached_plans = capacity;
        self
    }
}
