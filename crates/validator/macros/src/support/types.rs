//! Type peeling for nested schemas
//!
//! A field marked `nested` may be `Address`, `Option<Address>`,
//! `Vec<Address>`, `BTreeMap<String, Address>` or any nesting of these; the
//! schema to descend into is always the innermost struct type.

use syn::{GenericArgument, PathArguments, Type};

/// Wrappers whose first type argument is the payload.
const WRAPPERS: &[&str] = &[
    "Option",
    "Box",
    "Arc",
    "Rc",
    "Cow",
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "IndexSet",
    "SmallVec",
];

/// Mappings whose second type argument is the value type.
const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// Strips containers, references and arrays until a plain type remains.
pub fn element_type(ty: &Type) -> &Type {
    match ty {
        Type::Reference(r) => element_type(&r.elem),
        Type::Array(a) => element_type(&a.elem),
        Type::Slice(s) => element_type(&s.elem),
        Type::Paren(p) => element_type(&p.elem),
        Type::Group(g) => element_type(&g.elem),
        Type::Path(p) => {
            let Some(segment) = p.path.segments.last() else {
                return ty;
            };
            let PathArguments::AngleBracketed(args) = &segment.arguments else {
                return ty;
            };
            let mut types = args.args.iter().filter_map(|arg| match arg {
                GenericArgument::Type(t) => Some(t),
                _ => None,
            });

            let name = segment.ident.to_string();
            let inner = if WRAPPERS.contains(&name.as_str()) {
                types.next()
            } else if MAPS.contains(&name.as_str()) {
                types.nth(1)
            } else {
                None
            };
            inner.map_or(ty, element_type)
        }
        _ => ty,
    }
}
