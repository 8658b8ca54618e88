//! Validation failures
//!
//! A [`FieldError`] is data, not a control-flow interruption: the engine
//! appends one per failing rule and keeps walking. [`ValidationErrors`] is
//! the ordered result of a pass; an empty collection means the value is valid.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::path::{FieldPath, PathSegment};

// ============================================================================
// FIELD ERROR
// ============================================================================

/// A single failed rule on a single field.
///
/// # Examples
///
/// ```rust
/// use structval::{FieldError, FieldPath};
///
/// let path = FieldPath::root().child("Password");
/// let error = FieldError::new(Some("LoginRequest"), &path, "min")
///     .with_param("10")
///     .with_value("rahasia".into());
///
/// assert_eq!(error.namespace, "LoginRequest.Password");
/// assert_eq!(
///     error.message,
///     "Key: 'LoginRequest.Password' Error:Field validation for 'Password' failed on the 'min' tag",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Root type name joined with the path, e.g. `RegisterRequest.Address.City`.
    pub namespace: String,

    /// Path relative to the root, e.g. `Addresses[0].City`. Empty for a bare value.
    pub path: String,

    /// Leaf field name, e.g. `City` or `Hobbies[2]`.
    pub field: String,

    /// The rule as written in the rule spec: an alias name, a plain rule
    /// name, or a whole alternation such as `email|numeric`.
    pub tag: String,

    /// The concrete rule that failed. Equals `tag` unless `tag` is an alias
    /// or an alternation.
    pub actual_tag: String,

    /// Parameter of the failing rule, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    /// The offending value.
    pub value: Value,

    /// Set when the failing value is a mapping key rather than a mapping value.
    pub on_key: bool,

    /// Rendered message.
    pub message: String,
}

impl FieldError {
    /// Creates an error for `tag` at `path` under an optional root type name.
    pub fn new(root: Option<&str>, path: &FieldPath, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let namespace = namespace(root, path);
        let field = path.leaf();
        let message = render_message(&namespace, &field, &tag);
        Self {
            namespace,
            path: path.to_string(),
            field,
            actual_tag: tag.clone(),
            tag,
            param: None,
            value: Value::Null,
            on_key: false,
            message,
        }
    }

    /// Sets the concrete failing rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_actual_tag(mut self, actual_tag: impl Into<String>) -> Self {
        self.actual_tag = actual_tag.into();
        self
    }

    /// Sets the rule parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Sets the offending value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Marks the error as raised on a mapping key.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_key(mut self, on_key: bool) -> Self {
        self.on_key = on_key;
        self
    }

    /// Replaces the rendered message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

fn namespace(root: Option<&str>, path: &FieldPath) -> String {
    match root {
        Some(root) if path.is_root() => root.to_owned(),
        Some(root) => match path.segments().first() {
            Some(PathSegment::Field(_)) => format!("{root}.{path}"),
            _ => format!("{root}{path}"),
        },
        None => path.to_string(),
    }
}

fn render_message(namespace: &str, field: &str, tag: &str) -> String {
    format!("Key: '{namespace}' Error:Field validation for '{field}' failed on the '{tag}' tag")
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldError {}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Ordered failures of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error.
    pub fn add(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Appends every error from `other`, preserving order.
    pub fn extend(&mut self, other: impl IntoIterator<Item = FieldError>) {
        self.errors.extend(other);
    }

    /// Returns `true` when the pass found no failures.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` when the pass found at least one failure.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Failures in walk order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Iterates failures in walk order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Failures whose relative path equals `path`.
    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.path == path)
    }

    /// The first failure, if any.
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl FromIterator<FieldError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}
