//! Route pattern tokenizer.
//!
//! A pattern such as `/users/:id/files/*` is split into literal text and
//! parameter tokens before it reaches the trie. Three parameter forms exist:
//!
//! - `:name` captures one path segment (up to the next `/`)
//! - `<name>` / `<name:regex>` captures a segment, or exactly what the anchored
//!   constraint matches
//! - a trailing `/*` captures the remainder of the path, `/` included; a `*`
//!   glued to other text (`/files*`, `/a*b`) is literal
//!
//! The delimiters are configurable through [`PatternSyntax`], so the OpenAPI
//! flavour (`{id}`, `{id:[0-9]+}`) is available via [`PatternSyntax::braces`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ConfigError;

/// Delimiters recognised by the pattern tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSyntax {
    /// Prefix of a segment parameter (`:` in `/users/:id`). `None` disables the form.
    pub param_prefix: Option<char>,
    /// Opening delimiter of a bracketed parameter
    pub open: char,
    /// Closing delimiter of a bracketed parameter
    pub close: char,
    /// Separates the name from the constraint inside brackets
    pub separator: char,
    /// Trailing wildcard marker
    pub wildcard: char,
}

impl Default for PatternSyntax {
    fn default() -> Self {
        Self {
            param_prefix: Some(':'),
            open: '<',
            close: '>',
            separator: ':',
            wildcard: '*',
        }
    }
}

impl PatternSyntax {
    /// OpenAPI style brackets: `/pets/{id}` and `/pets/{id:[0-9]+}`.
    #[must_use]
    pub fn braces() -> Self {
        Self {
            open: '{',
            close: '}',
            ..Self::default()
        }
    }
}

/// How a parameter node consumes request bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParamKind {
    /// One or more bytes up to the next `/`
    Segment,
    /// Exactly the anchored match of the constraint source
    Constrained(String),
    /// Everything that is left, possibly nothing
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParamToken {
    pub(crate) name: Arc<str>,
    pub(crate) kind: ParamKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Literal(&'a str),
    Param(ParamToken),
}

/// Split `pattern` into literal and parameter tokens.
///
/// Adjacent literal text is always merged into a single token, so two
/// `Literal`s never follow each other.
pub(crate) fn tokenize<'a>(
    pattern: &'a str,
    syntax: &PatternSyntax,
    wildcard_name: &str,
) -> Result<Vec<Token<'a>>, ConfigError> {
    if !pattern.starts_with('/') {
        return Err(ConfigError::MissingLeadingSlash {
            pattern: pattern.to_string(),
        });
    }

    let mut tokens = Vec::with_capacity(4);
    let mut pos = 0;
    let mut lit_start = 0;

    while let Some(c) = pattern[pos..].chars().next() {
        let next = pos + c.len_utf8();

        if syntax.param_prefix == Some(c) {
            push_literal(&mut tokens, &pattern[lit_start..pos]);
            let end = pattern[next..]
                .find('/')
                .map_or(pattern.len(), |offset| next + offset);
            let name = &pattern[next..end];
            if name.is_empty() {
                return Err(ConfigError::EmptyParamName {
                    pattern: pattern.to_string(),
                    position: pos,
                });
            }
            tokens.push(Token::Param(ParamToken {
                name: Arc::from(name),
                kind: ParamKind::Segment,
            }));
            pos = end;
            lit_start = end;
            continue;
        }

        if c == syntax.open {
            push_literal(&mut tokens, &pattern[lit_start..pos]);
            let close_at =
                find_close(pattern, next, syntax).ok_or_else(|| ConfigError::UnclosedParam {
                    pattern: pattern.to_string(),
                    position: pos,
                })?;
            let body = &pattern[next..close_at];
            let (name, constraint) = match body.find(syntax.separator) {
                Some(split) => (
                    &body[..split],
                    Some(&body[split + syntax.separator.len_utf8()..]),
                ),
                None => (body, None),
            };
            if name.is_empty() {
                return Err(ConfigError::EmptyParamName {
                    pattern: pattern.to_string(),
                    position: pos,
                });
            }
            let kind = match constraint {
                Some(source) if !source.is_empty() => ParamKind::Constrained(source.to_string()),
                _ => ParamKind::Segment,
            };
            tokens.push(Token::Param(ParamToken {
                name: Arc::from(name),
                kind,
            }));
            pos = close_at + syntax.close.len_utf8();
            lit_start = pos;
            continue;
        }

        if c == syntax.close {
            return Err(ConfigError::UnmatchedClose {
                pattern: pattern.to_string(),
                position: pos,
            });
        }

        if c == syntax.wildcard && pattern[..pos].ends_with('/') {
            if next == pattern.len() {
                push_literal(&mut tokens, &pattern[lit_start..pos]);
                tokens.push(Token::Param(ParamToken {
                    name: Arc::from(wildcard_name),
                    kind: ParamKind::Wildcard,
                }));
                lit_start = next;
            } else if pattern[next..].starts_with('/') {
                return Err(ConfigError::MisplacedWildcard {
                    pattern: pattern.to_string(),
                    position: pos,
                });
            }
        }

        pos = next;
    }

    push_literal(&mut tokens, &pattern[lit_start..]);
    Ok(tokens)
}

fn push_literal<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.is_empty() {
        tokens.push(Token::Literal(text));
    }
}

/// Byte offset of the delimiter closing a bracket opened just before `from`.
/// Nested brackets inside a constraint (`{id:[0-9]{2,4}}`) are balanced.
fn find_close(pattern: &str, from: usize, syntax: &PatternSyntax) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, c) in pattern[from..].char_indices() {
        if c == syntax.open {
            depth += 1;
        } else if c == syntax.close {
            depth -= 1;
            if depth == 0 {
                return Some(from + offset);
            }
        }
    }
    None
}
