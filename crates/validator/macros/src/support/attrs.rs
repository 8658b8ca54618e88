use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use syn::{
    Attribute, Ident, Lit, Meta, Result, Token, Type,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

use crate::support::diag;

/// Parsed attribute arguments container.
#[derive(Debug, Clone, Default)]
pub struct AttrArgs {
    pub items: Vec<AttrItem>,
}

/// A single attribute item.
#[derive(Debug, Clone)]
pub enum AttrItem {
    /// A flag like `nested` or `skip`
    Flag(Ident),
    /// Key-value pair like `rules = "required"`
    KeyValue { key: Ident, value: AttrValue },
    /// Nested list like `rename(serialize = "a")`
    List { key: Ident, items: Vec<AttrItem> },
}

/// Right-hand side of a key-value pair.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Lit(Lit),
    Tokens(TokenStream2),
}

impl AttrItem {
    fn key(&self) -> &Ident {
        match self {
            Self::Flag(key) | Self::KeyValue { key, .. } | Self::List { key, .. } => key,
        }
    }
}

impl AttrArgs {
    /// Find a key-value pair by key name.
    pub fn get_value(&self, key: &str) -> Option<&AttrValue> {
        self.items.iter().find_map(|item| match item {
            AttrItem::KeyValue { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    /// Get a string value by key.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_lit_str(key).map(syn::LitStr::value)
    }

    /// Get the string literal itself, for spanned diagnostics.
    pub fn get_lit_str(&self, key: &str) -> Option<&syn::LitStr> {
        self.get_value(key).and_then(|value| match value {
            AttrValue::Lit(Lit::Str(s)) => Some(s),
            _ => None,
        })
    }

    /// Parse a type from a key-value pair, given as a path or a string.
    pub fn get_type(&self, key: &str) -> Result<Option<Type>> {
        let Some(value) = self.get_value(key) else {
            return Ok(None);
        };

        let ty = match value {
            AttrValue::Lit(Lit::Str(s)) => syn::parse_str::<Type>(&s.value())
                .map_err(|e| diag::error_spanned(s, format!("invalid type for `{key}`: {e}")))?,
            AttrValue::Tokens(tokens) => syn::parse2::<Type>(tokens.clone()).map_err(|e| {
                diag::error_spanned(tokens, format!("invalid type for `{key}`: {e}"))
            })?,
            AttrValue::Lit(other) => {
                return Err(diag::error_spanned(
                    other,
                    format!("expected a type for `{key}`"),
                ));
            }
        };

        Ok(Some(ty))
    }

    /// Check if a flag is present.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, AttrItem::Flag(f) if f == flag))
    }

    /// Check if any item uses `key`, in any form.
    pub fn has_key(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key() == key)
    }

    /// Get the items of a list attribute like `rename(serialize = "a")`.
    pub fn get_list(&self, key: &str) -> Option<AttrArgs> {
        self.items.iter().find_map(|item| match item {
            AttrItem::List { key: k, items } if k == key => Some(AttrArgs {
                items: items.clone(),
            }),
            _ => None,
        })
    }

    /// Reject keys outside `allowed`.
    pub fn deny_unknown(&self, attr: &str, allowed: &[&str]) -> Result<()> {
        match self.items.iter().find(|item| !allowed.iter().any(|a| item.key() == a)) {
            Some(item) => Err(diag::error_spanned(
                item.key(),
                format!(
                    "unknown `#[{attr}]` option `{}`; expected one of: {}",
                    item.key(),
                    allowed.join(", ")
                ),
            )),
            None => Ok(()),
        }
    }
}

/// Parse attribute like `#[validate(...)]` (the whole Attribute, not only args).
pub fn parse_attr(attr: &Attribute, expected: &str) -> Result<Option<AttrArgs>> {
    if !attr.path().is_ident(expected) {
        return Ok(None);
    }

    match &attr.meta {
        Meta::Path(_) => Ok(Some(AttrArgs::default())),
        Meta::List(list) => {
            let args = syn::parse2::<AttrArgsParser>(list.tokens.clone())?;
            Ok(Some(args.0))
        }
        Meta::NameValue(nv) => Err(diag::error_spanned(
            nv,
            format!("#[{expected}] must be #[{expected}(...)] or #[{expected}] (not name-value)"),
        )),
    }
}

/// Parse all attributes of a given type and merge them.
pub fn parse_attrs(attrs: &[Attribute], name: &str) -> Result<AttrArgs> {
    let mut result = AttrArgs::default();

    for attr in attrs {
        if let Some(args) = parse_attr(attr, name)? {
            result.items.extend(args.items);
        }
    }

    Ok(result)
}

struct AttrArgsParser(AttrArgs);

impl Parse for AttrArgsParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let items = if input.is_empty() {
            vec![]
        } else {
            Punctuated::<AttrItemParser, Token![,]>::parse_terminated(input)?
                .into_iter()
                .map(|x| x.0)
                .collect()
        };
        Ok(Self(AttrArgs { items }))
    }
}

struct AttrItemParser(AttrItem);

impl Parse for AttrItemParser {
    fn parse(input: ParseStream) -> Result<Self> {
        // `crate = "..."` is a valid serde option
        let key = Ident::parse_any(input)?;

        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            let value: AttrValue = input.parse::<AttrValueParser>()?.0;
            return Ok(Self(AttrItem::KeyValue { key, value }));
        }

        if input.peek(syn::token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            let items = content.parse::<AttrArgsParser>()?.0.items;
            return Ok(Self(AttrItem::List { key, items }));
        }

        Ok(Self(AttrItem::Flag(key)))
    }
}

struct AttrValueParser(AttrValue);

impl Parse for AttrValueParser {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Lit) && (input.peek2(Token![,]) || is_last_token(input)) {
            return Ok(Self(AttrValue::Lit(input.parse()?)));
        }

        // anything else (paths, generic types) runs up to the next top-level comma
        let mut tokens = TokenStream2::new();
        let mut depth = 0usize;
        while !input.is_empty() {
            if depth == 0 && input.peek(Token![,]) {
                break;
            }
            let tt: TokenTree = input.parse()?;
            if let TokenTree::Punct(p) = &tt {
                match p.as_char() {
                    '<' => depth += 1,
                    '>' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            tokens.extend(std::iter::once(tt));
        }
        Ok(Self(AttrValue::Tokens(tokens)))
    }
}

fn is_last_token(input: ParseStream) -> bool {
    let fork = input.fork();
    fork.parse::<TokenTree>().is_ok() && fork.is_empty()
}
