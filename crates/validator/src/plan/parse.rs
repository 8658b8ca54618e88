//! Rule-spec tokenizer
//!
//! ```text
//! rules := item ("," item)*
//! item  := "dive" | "keys" | "endkeys" | "omitempty" | group
//! group := call ("|" call)*
//! call  := name ["=" param]
//! ```
//!
//! Inside a parameter `0x2C` stands for a literal `,` and `0x7C` for a literal `|`.

use crate::error::{Error, Result};

/// Traversal directive names. They cannot be registered as rules.
pub const DIRECTIVES: [&str; 4] = [DIVE, KEYS, END_KEYS, OMIT_EMPTY];

pub(crate) const DIVE: &str = "dive";
pub(crate) const KEYS: &str = "keys";
pub(crate) const END_KEYS: &str = "endkeys";
pub(crate) const OMIT_EMPTY: &str = "omitempty";

/// One rule invocation, `name` or `name=param`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCall {
    /// Rule or alias name
    pub name: String,
    /// Parameter text after `=`, unescaped
    pub param: Option<String>,
}

/// One comma-separated item of a rule spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `dive`
    Dive,
    /// `keys`
    Keys,
    /// `endkeys`
    EndKeys,
    /// `omitempty`
    OmitEmpty,
    /// A rule or an alternation of rules. `raw` is the item as written.
    Group {
        /// Item text as written, used as the error tag
        raw: String,
        /// Alternatives, at least one
        calls: Vec<RuleCall>,
    },
}

fn directive(item: &str) -> Option<Token> {
    match item {
        DIVE => Some(Token::Dive),
        KEYS => Some(Token::Keys),
        END_KEYS => Some(Token::EndKeys),
        OMIT_EMPTY => Some(Token::OmitEmpty),
        _ => None,
    }
}

fn unescape(param: &str) -> String {
    param.replace("0x2C", ",").replace("0x7C", "|")
}

fn parse_call(spec: &str, text: &str) -> Result<RuleCall> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::malformed(spec, "empty alternative"));
    }
    let (name, param) = match text.split_once('=') {
        Some((name, param)) => (name.trim(), Some(param.trim())),
        None => (text, None),
    };
    if name.is_empty() {
        return Err(Error::malformed(spec, format!("missing rule name in '{text}'")));
    }
    if param.is_some_and(str::is_empty) {
        return Err(Error::malformed(spec, format!("empty parameter for '{name}'")));
    }
    Ok(RuleCall {
        name: name.to_owned(),
        param: param.map(unescape),
    })
}

/// Splits a rule spec into tokens. A blank spec yields no tokens.
pub fn tokenize(spec: &str) -> Result<Vec<Token>> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    for item in spec.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(Error::malformed(spec, "empty rule"));
        }
        if let Some(token) = directive(item) {
            tokens.push(token);
            continue;
        }

        let calls = item
            .split('|')
            .map(|text| parse_call(spec, text))
            .collect::<Result<Vec<_>>>()?;
        if let Some(call) = calls.iter().find(|c| directive(&c.name).is_some()) {
            let reason = if calls.len() > 1 {
                "is not allowed inside an alternation"
            } else {
                "cannot take a parameter"
            };
            return Err(Error::malformed(
                spec,
                format!("directive '{}' {reason}", call.name),
            ));
        }

        tokens.push(Token::Group {
            raw: item.to_owned(),
            calls,
        });
    }
    Ok(tokens)
}
