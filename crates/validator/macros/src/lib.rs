//! # structval-macros
//!
//! `#[derive(Validatable)]` for structval. Use it through the `structval`
//! crate, which re-exports it under the default `derive` feature.
//!
//! ```ignore
//! use serde::Serialize;
//! use structval::Validatable;
//!
//! #[derive(Serialize, Validatable)]
//! #[serde(rename_all = "PascalCase")]
//! struct RegisterRequest {
//!     #[validate(rules = "required,email")]
//!     username: String,
//!     #[validate(rules = "required,min=10")]
//!     password: String,
//!     #[validate(rules = "required,min=10,eqfield=Password")]
//!     confirm_password: String,
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod support;
mod validatable;

/// Derive macro for the `Validatable` trait.
///
/// Generates `fn schema() -> structval::Schema` listing every field that
/// carries a `#[validate]` attribute, keyed by its serialized name.
///
/// # Attributes
///
/// ## Container attributes (`#[validate(...)]` on the struct)
///
/// - `name = "..."` - Type name used as the root of error namespaces (default: the struct name)
///
/// ## Field attributes
///
/// - `#[validate(rules = "...")]` - Rule spec, e.g. `"required,min=5,max=25"`
/// - `#[validate(nested)]` - Descend into the field's struct type; containers
///   such as `Option`, `Vec` and maps are looked through
/// - `#[validate(nested = Type)]` - Descend using an explicit type's schema
/// - `#[validate(skip)]` - Leave the field out of the schema
///
/// `#[serde(rename_all = "...")]`, `#[serde(rename = "...")]` and
/// `#[serde(skip)]` are honoured so schema keys match the serialized value.
/// Fields without a `#[validate]` attribute are not checked.
///
/// # Example
///
/// ```ignore
/// #[derive(Serialize, Validatable)]
/// #[serde(rename_all = "PascalCase")]
/// struct Customer {
///     #[validate(rules = "required,dive,keys,required,min=2,endkeys,dive", nested)]
///     schools: BTreeMap<String, School>,
/// }
/// ```
#[proc_macro_derive(Validatable, attributes(validate))]
pub fn derive_validatable(input: TokenStream) -> TokenStream {
    validatable::derive(input)
}
