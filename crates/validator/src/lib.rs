//! # structval
//!
//! Declarative struct validation driven by rule-spec tags.
//!
//! Fields declare their rules as comma-separated specs (`required,min=5`,
//! `required,email|numeric`, `dive,keys,required,endkeys,gt=1000`). A
//! [`Validator`] walks a serialized value, evaluates every field's rules and
//! returns the failures as data.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use structval::prelude::*;
//!
//! #[derive(Serialize, Validatable)]
//! #[serde(rename_all = "PascalCase")]
//! struct Address {
//!     #[validate(rules = "required")]
//!     street: String,
//!     #[validate(rules = "required")]
//!     city: String,
//! }
//!
//! #[derive(Serialize, Validatable)]
//! #[serde(rename_all = "PascalCase")]
//! struct Customer {
//!     #[validate(rules = "required,min=5,max=25")]
//!     name: String,
//!     #[validate(rules = "required,dive", nested)]
//!     addresses: Vec<Address>,
//! }
//!
//! let customer = Customer {
//!     name: "Daka Sakti".into(),
//!     addresses: vec![Address { street: "Jl. Merdeka".into(), city: String::new() }],
//! };
//!
//! let errors = Validator::new().validate_struct(&customer)?;
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.errors()[0].namespace, "Customer.Addresses[0].City");
//! # Ok::<(), structval::Error>(())
//! ```
//!
//! ## Rule specs
//!
//! - `name` or `name=param`, separated by `,` and evaluated left to right;
//! - `a|b` passes when either rule passes;
//! - `dive` applies the remaining rules to each element or mapping value;
//! - `dive,keys,...,endkeys` checks mapping keys;
//! - `omitempty` skips the remaining rules for empty values.
//!
//! Unknown rule names and malformed specs are configuration errors
//! ([`Error`]) and abort the call; failed rules are reported as
//! [`ValidationErrors`].
//!
//! ## Custom rules and aliases
//!
//! See [`Validator::register_fn`], [`Validator::register_rule`] and
//! [`Validator::register_alias`].

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod foundation;
pub mod plan;
pub mod prelude;
pub mod registry;
mod rules;
pub mod schema;
pub mod walker;

pub use config::{DuplicatePolicy, FieldMode, ValidatorConfig};
pub use engine::{Validator, default_validator};
pub use error::{Error, Result};
pub use foundation::{
    FieldContext, FieldError, FieldPath, PathSegment, Validatable, ValidationErrors,
};
pub use registry::{Arity, RuleEntry, RuleFn, RuleRegistry};
pub use schema::{FieldSpec, NestedSchema, Schema};

#[cfg(feature = "derive")]
pub use structval_macros::Validatable;
