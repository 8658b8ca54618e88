//! Core validation types
//!
//! - **Paths**: [`FieldPath`], [`PathSegment`]
//! - **Failures**: [`FieldError`], [`ValidationErrors`]
//! - **Rule input**: [`FieldContext`]
//! - **Traits**: [`Validatable`]
//!
//! Configuration errors live in [`crate::error`]; everything here describes
//! data-dependent outcomes.

pub mod context;
pub mod error;
pub mod path;
pub mod traits;

pub use context::FieldContext;
pub use error::{FieldError, ValidationErrors};
pub use path::{FieldPath, PathSegment};
pub use traits::Validatable;
