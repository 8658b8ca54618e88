//! Internal support utilities for proc-macros.
//!
//! Attribute parsing, diagnostics and type inspection shared by the derives.

pub mod attrs;
pub mod diag;
pub mod types;
