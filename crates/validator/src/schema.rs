//! Rule-specification tables
//!
//! A [`Schema`] lists the fields of one structured type in declaration order,
//! each with its rule spec and, for struct-valued fields, the schema to
//! descend into. Schemas are normally produced by `#[derive(Validatable)]`
//! but can be assembled by hand:
//!
//! ```rust
//! use structval::Schema;
//!
//! let address = Schema::new("Address")
//!     .field("Street", "required")
//!     .field("City", "required");
//!
//! let user = Schema::new("User")
//!     .field("Name", "required,min=2")
//!     .nested("Addresses", "required,dive", address);
//!
//! assert_eq!(user.fields().len(), 2);
//! assert!(user.get("Addresses").unwrap().nested.is_some());
//! ```

use std::fmt;
use std::sync::Arc;

/// Schema of a nested structured value.
///
/// `Deferred` builds the schema on demand, which is how self-referential
/// types avoid infinite construction.
#[derive(Clone)]
pub enum NestedSchema {
    /// An already-built schema.
    Shared(Arc<Schema>),
    /// A schema constructor, called when the walker reaches the value.
    Deferred(fn() -> Schema),
}

impl NestedSchema {
    /// Wraps a schema constructor, typically `<T as Validatable>::schema`.
    pub fn deferred(build: fn() -> Schema) -> Self {
        Self::Deferred(build)
    }

    /// Returns the schema, building it if deferred.
    pub fn resolve(&self) -> Arc<Schema> {
        match self {
            Self::Shared(schema) => Arc::clone(schema),
            Self::Deferred(build) => Arc::new(build()),
        }
    }
}

impl fmt::Debug for NestedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(schema) => f.debug_tuple("Shared").field(&schema.name).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Schema> for NestedSchema {
    fn from(schema: Schema) -> Self {
        Self::Shared(Arc::new(schema))
    }
}

impl From<Arc<Schema>> for NestedSchema {
    fn from(schema: Arc<Schema>) -> Self {
        Self::Shared(schema)
    }
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Key of the field in the serialized value.
    pub name: String,
    /// Rule spec, e.g. `required,dive,keys,min=2,endkeys`.
    pub rules: String,
    /// Schema for struct values reached through this field.
    pub nested: Option<NestedSchema>,
}

/// Ordered rule-specification table of one structured type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: Option<String>,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates an empty schema for the type `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            fields: Vec::new(),
        }
    }

    /// Creates an empty schema without a type name; namespaces then start at the field.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Adds a scalar field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rules: impl Into<String>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            rules: rules.into(),
            nested: None,
        });
        self
    }

    /// Adds a field whose value (or whose elements, under `dive`) are structs.
    #[must_use]
    pub fn nested(
        mut self,
        name: impl Into<String>,
        rules: impl Into<String>,
        schema: impl Into<NestedSchema>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            rules: rules.into(),
            nested: Some(schema.into()),
        });
        self
    }

    /// Appends a prepared field.
    pub fn push(&mut self, field: FieldSpec) {
        self.fields.push(field);
    }

    /// Type name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Finds a field by serialized name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Schema {
        Schema::new("Node")
            .field("Label", "required")
            .nested("Children", "dive", NestedSchema::deferred(node))
    }

    #[test]
    fn test_deferred_schema_resolves_lazily() {
        let schema = node();
        let children = schema.get("Children").unwrap();
        let nested = children.nested.as_ref().unwrap().resolve();
        assert_eq!(nested.name(), Some("Node"));
        assert_eq!(nested.fields().len(), 2);
    }

    #[test]
    fn test_shared_schema_is_reused() {
        let inner = Arc::new(Schema::new("Address").field("City", "required"));
        let nested = NestedSchema::from(Arc::clone(&inner));
        assert!(Arc::ptr_eq(&nested.resolve(), &inner));
    }

    #[test]
    fn test_anonymous_schema() {
        let mut schema = Schema::anonymous();
        schema.push(FieldSpec {
            name: "x".into(),
            rules: "gt=1".into(),
            nested: None,
        });
        assert_eq!(schema.name(), None);
        assert_eq!(schema.get("x").map(|f| f.rules.as_str()), Some("gt=1"));
        assert!(schema.get("y").is_none());
    }
}
