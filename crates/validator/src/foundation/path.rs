//! Field paths
//!
//! A [`FieldPath`] is the location of a value relative to the validated root.
//! It renders as `Addresses[0].City` or `Schools[SMA].Name`: struct fields
//! are dot-joined, collection indices and mapping keys are bracketed onto
//! the preceding segment.

use std::fmt;

use smallvec::SmallVec;

/// One step from a parent value to a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named struct field.
    Field(String),
    /// Position in an ordered collection.
    Index(usize),
    /// Key of a mapping entry.
    Key(String),
}

impl PathSegment {
    fn is_field(&self) -> bool {
        matches!(self, Self::Field(_))
    }
}

/// Location of a value inside the validated root.
///
/// Most paths are shallow, so segments are stored inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[PathSegment; 4]>,
}

impl FieldPath {
    /// The empty path, i.e. the root value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends a struct field.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Field(name.into()))
    }

    /// Appends a collection index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    /// Appends a mapping key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(PathSegment::Key(key.into()))
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`is_root`](Self::is_root).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last field name together with any index/key suffixes after it.
    ///
    /// `Addresses[0].City` has leaf `City`; `Hobbies[2]` has leaf `Hobbies[2]`.
    pub fn leaf(&self) -> String {
        let start = self
            .segments
            .iter()
            .rposition(PathSegment::is_field)
            .unwrap_or(0);
        let mut out = String::new();
        render(&mut out, &self.segments[start..]);
        out
    }
}

fn render(out: &mut String, segments: &[PathSegment]) {
    for segment in segments {
        match segment {
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            PathSegment::Key(k) => {
                out.push('[');
                out.push_str(k);
                out.push(']');
            }
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        render(&mut out, &self.segments);
        f.write_str(&out)
    }
}
