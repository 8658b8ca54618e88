//! Prelude module for convenient imports.
//!
//! ```rust
//! use structval::prelude::*;
//!
//! let validator = Validator::new();
//! let errors = validator.validate_var("dakasakti99", "required,alpha")?;
//! assert_eq!(errors.first().map(|e| e.tag.as_str()), Some("alpha"));
//! # Ok::<(), structval::Error>(())
//! ```

// ============================================================================
// FOUNDATION: Traits, failures, paths
// ============================================================================

pub use crate::foundation::{FieldContext, FieldError, FieldPath, Validatable, ValidationErrors};

// ============================================================================
// ENGINE: Validator, registry, schema, configuration
// ============================================================================

pub use crate::config::{DuplicatePolicy, FieldMode, ValidatorConfig};
pub use crate::engine::{Validator, default_validator};
pub use crate::error::{Error, Result};
pub use crate::registry::{Arity, RuleRegistry};
pub use crate::schema::{NestedSchema, Schema};

// ============================================================================
// DERIVE-GATED: #[derive(Validatable)]
// ============================================================================

#[cfg(feature = "derive")]
pub use structval_macros::Validatable;
