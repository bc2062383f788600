//! Tokenizer for path templates.
//!
//! Grammar (path-to-regexp flavoured):
//! - `:name` named parameter, one non-empty segment by default
//! - `:name(regex)` named parameter with a custom pattern
//! - `(regex)` unnamed parameter, keyed by its zero-based index
//! - `*` unnamed catch-all, same as `(.*)`
//! - a trailing `?` after any parameter makes it optional
//! - `\` escapes the next character

use super::error::PatternError;

/// Pattern used by named parameters without an explicit `(regex)`.
pub(crate) const SEGMENT_PATTERN: &str = "[^/]+?";

/// Pattern used by the `*` shorthand.
pub(crate) const WILDCARD_PATTERN: &str = ".*";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Param(Param),
}

/// A placeholder in a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Param {
    /// Identifier without the colon, or the group index for unnamed groups.
    pub name: String,
    /// `/` when the placeholder directly follows a slash, otherwise empty.
    pub prefix: String,
    pub pattern: String,
    pub optional: bool,
    pub named: bool,
    /// Source text of the placeholder (prefix excluded), e.g. `:id?`.
    pub raw: String,
}

pub(crate) fn tokenize(template: &str) -> Result<Vec<Token>, PatternError> {
    let chars: Vec<(usize, char)> = template.char_indices().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut unnamed = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            '\\' => {
                match chars.get(i + 1) {
                    Some(&(_, escaped)) => literal.push(escaped),
                    None => literal.push('\\'),
                }
                i += 2;
            }
            ':' => {
                let mut j = i + 1;
                let mut name = String::new();
                while let Some(&(_, ch)) = chars.get(j) {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        name.push(ch);
                        j += 1;
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(PatternError::MissingParameterName {
                        template: template.to_string(),
                        position: offset,
                    });
                }
                let mut pattern = SEGMENT_PATTERN.to_string();
                if matches!(chars.get(j), Some(&(_, '('))) {
                    let (body, next) = read_group(template, &chars, j)?;
                    pattern = body;
                    j = next;
                }
                let optional = matches!(chars.get(j), Some(&(_, '?')));
                if optional {
                    j += 1;
                }
                let raw = slice(template, &chars, i, j);
                push_param(&mut tokens, &mut literal, name, pattern, optional, true, raw);
                i = j;
            }
            '(' => {
                let (body, mut j) = read_group(template, &chars, i)?;
                let optional = matches!(chars.get(j), Some(&(_, '?')));
                if optional {
                    j += 1;
                }
                let raw = slice(template, &chars, i, j);
                push_param(
                    &mut tokens,
                    &mut literal,
                    unnamed.to_string(),
                    body,
                    optional,
                    false,
                    raw,
                );
                unnamed += 1;
                i = j;
            }
            '*' => {
                push_param(
                    &mut tokens,
                    &mut literal,
                    unnamed.to_string(),
                    WILDCARD_PATTERN.to_string(),
                    false,
                    false,
                    "*".to_string(),
                );
                unnamed += 1;
                i += 1;
            }
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn push_param(
    tokens: &mut Vec<Token>,
    literal: &mut String,
    name: String,
    pattern: String,
    optional: bool,
    named: bool,
    raw: String,
) {
    let prefix = if literal.ends_with('/') {
        literal.pop();
        "/".to_string()
    } else {
        String::new()
    };
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
    tokens.push(Token::Param(Param {
        name,
        prefix,
        pattern,
        optional,
        named,
        raw,
    }));
}

/// Reads a `( ... )` group starting at `open`; returns its body and the
/// index just past the closing paren.
fn read_group(
    template: &str,
    chars: &[(usize, char)],
    open: usize,
) -> Result<(String, usize), PatternError> {
    let open_offset = chars[open].0;
    let mut depth = 1usize;
    let mut body = String::new();
    let mut j = open + 1;

    while let Some(&(offset, c)) = chars.get(j) {
        match c {
            '\\' => {
                body.push(c);
                if let Some(&(_, escaped)) = chars.get(j + 1) {
                    body.push(escaped);
                }
                j += 2;
                continue;
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if body.is_empty() {
                        return Err(PatternError::EmptyGroup {
                            template: template.to_string(),
                            position: open_offset,
                        });
                    }
                    return Ok((body, j + 1));
                }
            }
            '(' => {
                if captures(chars, j) {
                    return Err(PatternError::NestedCapture {
                        template: template.to_string(),
                        position: offset,
                    });
                }
                depth += 1;
            }
            _ => {}
        }
        body.push(c);
        j += 1;
    }

    Err(PatternError::UnbalancedGroup {
        template: template.to_string(),
        position: open_offset,
    })
}

/// Whether the group opening at `open` is a capturing one: plain `(`,
/// `(?P<name>` or `(?<name>`.
fn captures(chars: &[(usize, char)], open: usize) -> bool {
    let next = |k: usize| chars.get(open + k).map(|&(_, c)| c);
    match (next(1), next(2)) {
        (Some('?'), Some('P')) => next(3) == Some('<'),
        (Some('?'), Some('<')) => !matches!(next(3), Some('=' | '!')),
        (Some('?'), _) => false,
        _ => true,
    }
}

fn slice(template: &str, chars: &[(usize, char)], start: usize, end: usize) -> String {
    let from = chars[start].0;
    let to = chars.get(end).map_or(template.len(), |&(offset, _)| offset);
    template[from..to].to_string()
}
