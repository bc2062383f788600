//! Path templates: matching concrete paths and building paths from parameters.
//!
//! A [`PathPattern`] is compiled once from a template such as
//! `/substate/:id/c` and can then:
//! - extract named parameters from a concrete path ([`PathPattern::matches`])
//! - substitute parameter values back into the template ([`PathPattern::build`])
//!
//! The free functions [`match_uri`] and [`build_uri`] compile on every call
//! with default [`RouterOptions`]; route tables keep compiled patterns instead.

mod error;
mod template;

pub use error::PatternError;

use crate::config::RouterOptions;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::borrow::Cow;
use template::{tokenize, Param, Token, SEGMENT_PATTERN};
use tracing::warn;

/// Values extracted from (or substituted into) a path template.
///
/// A placeholder that is part of the template but did not capture anything
/// maps to `None` rather than being left out.
pub type Params = BTreeMap<String, Option<String>>;

/// A compiled path template.
#[derive(Clone, Debug)]
pub struct PathPattern {
    template: String,
    tokens: Vec<Token>,
    regex: Regex,
}

impl PathPattern {
    /// Compile a template with the given options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mindset_router::pattern::PathPattern;
    /// use mindset_router::RouterOptions;
    ///
    /// let pattern = PathPattern::compile("/users/:id", &RouterOptions::default()).unwrap();
    /// let params = pattern.matches("/users/42").unwrap();
    /// assert_eq!(params["id"].as_deref(), Some("42"));
    /// assert!(pattern.matches("/teams/42").is_none());
    /// ```
    pub fn compile(template: &str, options: &RouterOptions) -> Result<Self, PatternError> {
        let tokens = tokenize(template)?;
        let source = regex_source(&tokens, options);
        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.sensitive)
            .build()
            .map_err(|e| PatternError::Regex {
                template: template.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            template: template.to_string(),
            tokens,
            regex,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names, in template order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params().map(|p| p.name.as_str())
    }

    /// Names of the `:name` placeholders only (unnamed groups excluded).
    pub fn named_keys(&self) -> impl Iterator<Item = &str> {
        self.params().filter(|p| p.named).map(|p| p.name.as_str())
    }

    pub fn has_placeholders(&self) -> bool {
        self.params().next().is_some()
    }

    /// Match a concrete path. Returns `None` when the path does not match.
    ///
    /// Captured values are percent-decoded.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        Some(
            self.params()
                .enumerate()
                .map(|(i, p)| {
                    let value = captures.get(i + 1).map(|m| decode(m.as_str()));
                    (p.name.clone(), value)
                })
                .collect(),
        )
    }

    /// Substitute placeholder values into the template.
    ///
    /// Literal text is copied verbatim. Values of `:name` placeholders are
    /// percent-encoded; values of custom groups keep their `/`. An empty
    /// value counts as missing: an optional placeholder without a value
    /// disappears together with its `/` prefix, a required one is left as
    /// written in the template.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mindset_router::pattern::{PathPattern, Params};
    /// use mindset_router::RouterOptions;
    ///
    /// let pattern = PathPattern::compile("/substate/:id/c", &RouterOptions::default()).unwrap();
    /// let mut values = Params::new();
    /// values.insert("id".to_string(), Some("817".to_string()));
    /// assert_eq!(pattern.build(&values), "/substate/817/c");
    /// ```
    pub fn build(&self, values: &Params) -> String {
        if !self.has_placeholders() {
            return self.template.clone();
        }

        let mut path = String::with_capacity(self.template.len());
        for token in &self.tokens {
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Param(param) => match values
                    .get(&param.name)
                    .and_then(Option::as_deref)
                    .filter(|v| !v.is_empty())
                {
                    Some(value) => {
                        path.push_str(&param.prefix);
                        path.push_str(&encode(param, value));
                    }
                    None if param.optional => {}
                    None => {
                        warn!(
                            template = %self.template,
                            placeholder = %param.name,
                            "no value for placeholder, keeping it verbatim"
                        );
                        path.push_str(&param.prefix);
                        path.push_str(&param.raw);
                    }
                },
            }
        }
        path
    }

    fn params(&self) -> impl Iterator<Item = &Param> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Param(p) => Some(p),
            Token::Literal(_) => None,
        })
    }
}

fn encode<'a>(param: &Param, value: &'a str) -> Cow<'a, str> {
    if param.pattern == SEGMENT_PATTERN {
        return urlencoding::encode(value);
    }
    if !value.contains(['%', '?', '#', ' ']) {
        return Cow::Borrowed(value);
    }
    let mut encoded = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            '?' => encoded.push_str("%3F"),
            '#' => encoded.push_str("%23"),
            ' ' => encoded.push_str("%20"),
            _ => encoded.push(c),
        }
    }
    Cow::Owned(encoded)
}

/// Invalid UTF-8 after decoding keeps the raw capture.
fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), Cow::into_owned)
}

fn regex_source(tokens: &[Token], options: &RouterOptions) -> String {
    let mut source = String::from("^");
    let last = tokens.len().saturating_sub(1);

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(text) => {
                let text = if i == last && !options.strict {
                    text.strip_suffix('/').unwrap_or(text)
                } else {
                    text.as_str()
                };
                source.push_str(&regex::escape(text));
            }
            Token::Param(param) => {
                let prefix = regex::escape(&param.prefix);
                if param.optional {
                    source.push_str(&format!("(?:{prefix}({}))?", param.pattern));
                } else {
                    source.push_str(&format!("{prefix}({})", param.pattern));
                }
            }
        }
    }

    if !options.strict {
        source.push_str("(?:/)?");
    }
    if options.end {
        source.push('$');
    } else {
        source.push_str("(?:/|$)");
    }
    source
}

/// Match `path` against `template`.
///
/// An absent template always matches with no parameters; this is how
/// states without a declared path are treated.
///
/// # Example
///
/// ```rust
/// use mindset_router::pattern::match_uri;
///
/// let params = match_uri(Some("/substate/:id/c"), "/substate/816/c").unwrap().unwrap();
/// assert_eq!(params["id"].as_deref(), Some("816"));
///
/// assert!(match_uri(Some("/about"), "/home").unwrap().is_none());
/// assert!(match_uri(None, "/anything").unwrap().unwrap().is_empty());
/// ```
pub fn match_uri(template: Option<&str>, path: &str) -> Result<Option<Params>, PatternError> {
    match template {
        None => Ok(Some(Params::new())),
        Some(template) => Ok(PathPattern::compile(template, &RouterOptions::default())?.matches(path)),
    }
}

/// Build a path by substituting `values` into `template`.
///
/// ```rust
/// use mindset_router::pattern::{build_uri, Params};
///
/// let mut values = Params::new();
/// values.insert("param".to_string(), Some("815".to_string()));
/// assert_eq!(build_uri("/substate/:param/c", &values).unwrap(), "/substate/815/c");
/// assert_eq!(build_uri("/about", &values).unwrap(), "/about");
/// ```
pub fn build_uri(template: &str, values: &Params) -> Result<String, PatternError> {
    Ok(PathPattern::compile(template, &RouterOptions::default())?.build(values))
}
