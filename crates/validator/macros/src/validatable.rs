use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, FieldsNamed, parse_macro_input};

use crate::support::{attrs, diag, types};

const CONTAINER_OPTIONS: &[&str] = &["name"];
const FIELD_OPTIONS: &[&str] = &["rules", "nested", "skip"];

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => diag::to_compile_error(err),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = require_named_fields(input)?;

    let container = attrs::parse_attrs(&input.attrs, "validate")?;
    container.deny_unknown("validate", CONTAINER_OPTIONS)?;
    let serde_container = attrs::parse_attrs(&input.attrs, "serde")?;

    let ident = &input.ident;
    let schema_name = container
        .get_string("name")
        .unwrap_or_else(|| ident.unraw().to_string());
    let rename_all = rename_rule(&serde_container)?;

    let mut entries = Vec::new();
    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let args = attrs::parse_attrs(&field.attrs, "validate")?;
        args.deny_unknown("validate", FIELD_OPTIONS)?;
        let serde = attrs::parse_attrs(&field.attrs, "serde")?;

        if args.has_flag("skip") || serde.has_flag("skip") || serde.has_flag("skip_serializing") {
            continue;
        }
        if !args.has_key("rules") && !args.has_key("nested") {
            continue;
        }
        if serde.has_key("flatten") {
            return Err(diag::error_spanned(
                field_ident,
                "`#[serde(flatten)]` fields cannot carry `#[validate]` rules",
            ));
        }

        let key = match serialized_rename(&serde) {
            Some(name) => name,
            None => apply_rename(rename_all, &field_ident.unraw().to_string()),
        };

        let rules = match args.get_lit_str("rules") {
            Some(lit) => {
                let rules = lit.value();
                if !rules.trim().is_empty() && rules.split(',').any(|item| item.trim().is_empty()) {
                    return Err(diag::error_spanned(lit, "rule spec contains an empty rule"));
                }
                rules
            }
            None if args.has_key("rules") => {
                return Err(diag::error_spanned(
                    field_ident,
                    "expected `rules = \"...\"` with a string literal",
                ));
            }
            None => String::new(),
        };

        let nested = match args.get_type("nested")? {
            Some(ty) => Some(ty),
            None if args.has_flag("nested") => Some(types::element_type(&field.ty).clone()),
            None => None,
        };

        entries.push(match nested {
            Some(ty) => quote! {
                .nested(
                    #key,
                    #rules,
                    ::structval::NestedSchema::deferred(<#ty as ::structval::Validatable>::schema),
                )
            },
            None => quote! { .field(#key, #rules) },
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::structval::Validatable for #ident #ty_generics #where_clause {
            fn schema() -> ::structval::Schema {
                ::structval::Schema::new(#schema_name)
                    #(#entries)*
            }
        }
    })
}

fn require_named_fields(input: &DeriveInput) -> syn::Result<&FieldsNamed> {
    match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => Ok(named),
            _ => Err(syn::Error::new(
                input.ident.span(),
                "`Validatable` can only be derived for structs with named fields",
            )),
        },
        _ => Err(syn::Error::new(
            input.ident.span(),
            "`Validatable` can only be derived for structs",
        )),
    }
}

// ============================================================================
// SERDE NAMING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

fn rename_rule(serde: &attrs::AttrArgs) -> syn::Result<Option<RenameRule>> {
    let lit = serde.get_lit_str("rename_all").cloned().or_else(|| {
        serde
            .get_list("rename_all")
            .and_then(|list| list.get_lit_str("serialize").cloned())
    });
    let Some(lit) = lit else {
        return Ok(None);
    };

    let rule = match lit.value().as_str() {
        "lowercase" => RenameRule::Lower,
        "UPPERCASE" => RenameRule::Upper,
        "PascalCase" => RenameRule::Pascal,
        "camelCase" => RenameRule::Camel,
        "snake_case" => RenameRule::Snake,
        "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
        "kebab-case" => RenameRule::Kebab,
        "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
        other => {
            return Err(diag::error_spanned(
                &lit,
                format!("unknown serde rename rule `{other}`"),
            ));
        }
    };
    Ok(Some(rule))
}

fn serialized_rename(serde: &attrs::AttrArgs) -> Option<String> {
    serde.get_string("rename").or_else(|| {
        serde
            .get_list("rename")
            .and_then(|list| list.get_string("serialize"))
    })
}

fn apply_rename(rule: Option<RenameRule>, field: &str) -> String {
    let Some(rule) = rule else {
        return field.to_owned();
    };
    match rule {
        RenameRule::Lower | RenameRule::Snake => field.to_ascii_lowercase(),
        RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
        RenameRule::Pascal => pascal(field),
        RenameRule::Camel => {
            let pascal = pascal(field);
            let mut chars = pascal.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_lowercase().to_string() + chars.as_str()
            })
        }
        RenameRule::Kebab => field.replace('_', "-"),
        RenameRule::ScreamingKebab => field.replace('_', "-").to_ascii_uppercase(),
    }
}

fn pascal(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect()
}
