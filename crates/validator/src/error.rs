//! Configuration errors
//!
//! Everything in this module is a programmer mistake: an unknown rule name,
//! a cyclic alias, a malformed rule spec, a bad rule parameter. These abort
//! the enclosing call. Data-dependent validation failures never show up
//! here; they are returned as [`ValidationErrors`](crate::ValidationErrors).

use thiserror::Error;

/// Result type for registry and engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error raised by the registry, the rule-spec compiler or the engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A rule spec or alias expansion names neither a rule nor an alias.
    #[error("unknown rule '{name}'")]
    UnknownRule {
        /// The unresolved name
        name: String,
    },

    /// Alias expansion did not terminate within the configured depth.
    #[error("alias '{name}' does not terminate within {depth} expansions")]
    CyclicAlias {
        /// The alias being expanded when the limit was hit
        name: String,
        /// The configured expansion depth
        depth: usize,
    },

    /// The rule spec does not follow the grammar.
    #[error("malformed rule spec '{spec}': {reason}")]
    MalformedRuleSpec {
        /// The offending spec text
        spec: String,
        /// What is wrong with it
        reason: String,
    },

    /// A rule or alias with this name exists and the registry rejects overrides.
    #[error("rule '{name}' is already registered")]
    DuplicateRule {
        /// The clashing name
        name: String,
    },

    /// The name is a traversal directive or contains spec syntax.
    #[error("'{name}' cannot be used as a rule name")]
    ReservedName {
        /// The rejected name
        name: String,
    },

    /// A rule parameter could not be interpreted by its rule.
    #[error("invalid parameter '{param}' for rule '{rule}': {reason}")]
    InvalidParameter {
        /// The rule receiving the parameter
        rule: String,
        /// The raw parameter text
        param: String,
        /// Why it was rejected
        reason: String,
    },

    /// The rule has no meaning for this kind of value (e.g. `min` on a boolean).
    #[error("rule '{rule}' cannot be applied to a {kind} value")]
    UnsupportedType {
        /// The rule or directive
        rule: String,
        /// JSON kind of the value
        kind: &'static str,
    },

    /// The walker descended deeper than `max_depth`.
    #[error("nesting depth limit of {limit} exceeded at '{path}'")]
    DepthLimitExceeded {
        /// Path at which the limit was hit
        path: String,
        /// The configured limit
        limit: usize,
    },

    /// The value could not be converted to or from JSON.
    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRuleSpec {
            spec: spec.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_rule(name: &str) -> Self {
        Self::UnknownRule {
            name: name.to_owned(),
        }
    }

    pub(crate) fn invalid_param(rule: &str, param: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule: rule.to_owned(),
            param: param.to_owned(),
            reason: reason.into(),
        }
    }
}
