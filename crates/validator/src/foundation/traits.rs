//! The `Validatable` trait

use serde::Serialize;

use crate::engine::default_validator;
use crate::error::Result;
use crate::foundation::ValidationErrors;
use crate::schema::Schema;

// ============================================================================
// VALIDATABLE
// ============================================================================

/// A type that declares per-field rule specs.
///
/// Usually derived:
///
/// ```rust
/// use serde::Serialize;
/// use structval::Validatable;
///
/// #[derive(Serialize, Validatable)]
/// #[serde(rename_all = "PascalCase")]
/// struct LoginRequest {
///     #[validate(rules = "required,email")]
///     username: String,
///     #[validate(rules = "required,min=10")]
///     password: String,
/// }
///
/// let request = LoginRequest {
///     username: "daka@example.com".into(),
///     password: "rahasia".into(),
/// };
/// let errors = request.validate().unwrap();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.errors()[0].namespace, "LoginRequest.Password");
/// ```
///
/// Hand-written implementations only need [`schema`](Validatable::schema).
pub trait Validatable {
    /// The rule-specification table for this type.
    fn schema() -> Schema;

    /// Validates `self` with the shared [`default_validator`].
    ///
    /// Configuration errors (unknown rule, malformed spec) are returned as
    /// `Err`; data failures are returned inside `Ok`.
    fn validate(&self) -> Result<ValidationErrors>
    where
        Self: Serialize + Sized,
    {
        default_validator().validate_struct(self)
    }
}
