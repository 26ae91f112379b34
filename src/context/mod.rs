pub mod normalize;

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::entity::PiiEntity;
use crate::error::{PiiError, Result};

pub use normalize::NormalizedText;

/// Default number of characters inspected on each side of a match.
pub const DEFAULT_WIDTH: usize = 64;

/// How context values are matched against the window text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Plain substring anywhere in the window.
    String,
    /// Whole word (or word sequence) delimited by non-word characters.
    Word,
    /// Regular expression, matched against normalized text.
    Regex,
}

impl std::str::FromStr for ContextKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(ContextKind::String),
            "word" => Ok(ContextKind::Word),
            "regex" => Ok(ContextKind::Regex),
            _ => Err(format!("unknown context type: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
enum ContextMatcher {
    Literal(AhoCorasick),
    Pattern(Regex),
}

impl ContextMatcher {
    fn is_match(&self, haystack: &str) -> bool {
        match self {
            ContextMatcher::Literal(ac) => ac.is_match(haystack),
            ContextMatcher::Pattern(re) => re.is_match(haystack),
        }
    }
}

/// A parsed context requirement: one of `values` must appear within
/// `before` characters ahead of a match or `after` characters behind it.
#[derive(Debug, Clone)]
pub struct ContextSpec {
    kind: ContextKind,
    values: Vec<String>,
    before: usize,
    after: usize,
    matcher: ContextMatcher,
}

impl ContextSpec {
    pub fn new(kind: ContextKind, values: Vec<String>, before: usize, after: usize) -> Result<Self> {
        let values: Vec<String> = match kind {
            ContextKind::Regex => values,
            ContextKind::String | ContextKind::Word => values
                .iter()
                .map(|v| NormalizedText::new(v).as_str().trim().to_string())
                .collect(),
        };
        if values.is_empty() || values.iter().any(|v| v.is_empty()) {
            return Err(PiiError::InvalidDefinition {
                reason: "context values must be non-empty".into(),
            });
        }

        let matcher = match kind {
            ContextKind::String => {
                ContextMatcher::Literal(AhoCorasick::new(&values).map_err(|e| {
                    PiiError::InvalidPattern {
                        name: "context".into(),
                        reason: e.to_string(),
                    }
                })?)
            }
            ContextKind::Word => {
                let alt: Vec<String> = values.iter().map(|v| regex::escape(v)).collect();
                let pattern = format!(r"(?:^|\W)(?:{})(?:\W|$)", alt.join("|"));
                ContextMatcher::Pattern(compile_context(&pattern)?)
            }
            ContextKind::Regex => {
                let alt: Vec<String> = values.iter().map(|v| format!("(?:{v})")).collect();
                ContextMatcher::Pattern(compile_context(&alt.join("|"))?)
            }
        };

        Ok(Self {
            kind,
            values,
            before,
            after,
            matcher,
        })
    }

    /// Parse a context specification as found in a detector definition.
    ///
    /// Accepted shapes: a string, a list of strings, or an object
    /// `{value, width, type}` where `width` is a number or a `[before, after]`
    /// pair and `type` is `string`, `word` (default) or `regex`.
    pub fn parse(spec: &Value) -> Result<Self> {
        match spec {
            Value::String(_) | Value::Array(_) => Self::new(
                ContextKind::Word,
                parse_values(spec)?,
                DEFAULT_WIDTH,
                DEFAULT_WIDTH,
            ),
            Value::Object(map) => {
                let values = map.get("value").ok_or_else(|| PiiError::InvalidDefinition {
                    reason: "context object without 'value'".into(),
                })?;
                let kind = match map.get("type") {
                    None => ContextKind::Word,
                    Some(Value::String(s)) => s
                        .parse()
                        .map_err(|reason| PiiError::InvalidDefinition { reason })?,
                    Some(other) => {
                        return Err(PiiError::InvalidDefinition {
                            reason: format!("context type must be a string, got {other}"),
                        })
                    }
                };
                let (before, after) = match map.get("width") {
                    None => (DEFAULT_WIDTH, DEFAULT_WIDTH),
                    Some(w) => parse_width(w)?,
                };
                Self::new(kind, parse_values(values)?, before, after)
            }
            other => Err(PiiError::InvalidDefinition {
                reason: format!("invalid context specification: {other}"),
            }),
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn width(&self) -> (usize, usize) {
        (self.before, self.after)
    }

    /// Check the context around the raw span `start..end`, given the
    /// normalized chunk text.
    pub fn check(&self, norm: &NormalizedText, start: usize, end: usize) -> bool {
        let (s, e) = norm.map_span(start, end);
        let text = norm.as_str();
        let ws = word_start(text, back_chars(text, s, self.before));
        let we = word_end(text, forward_chars(text, e, self.after));
        let window = format!("{} {}", &text[ws..s], &text[e..we]);
        self.matcher.is_match(&window)
    }
}

/// Context windows are lowercased, so patterns match case-insensitively.
fn compile_context(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| PiiError::InvalidPattern {
            name: "context".into(),
            reason: e.to_string(),
        })
}

fn parse_values(v: &Value) -> Result<Vec<String>> {
    match v {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(PiiError::InvalidDefinition {
                    reason: format!("context value must be a string, got {other}"),
                }),
            })
            .collect(),
        other => Err(PiiError::InvalidDefinition {
            reason: format!("invalid context value: {other}"),
        }),
    }
}

fn parse_width(w: &Value) -> Result<(usize, usize)> {
    let as_width = |v: &Value| {
        v.as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| PiiError::InvalidDefinition {
                reason: format!("invalid context width: {v}"),
            })
    };
    match w {
        Value::Array(pair) if pair.len() == 2 => Ok((as_width(&pair[0])?, as_width(&pair[1])?)),
        Value::Array(_) => Err(PiiError::InvalidDefinition {
            reason: format!("context width must be a number or a pair: {w}"),
        }),
        other => {
            let n = as_width(other)?;
            Ok((n, n))
        }
    }
}

/// Position `n` characters before `pos` (clamped at 0).
fn back_chars(text: &str, pos: usize, n: usize) -> usize {
    if n == 0 {
        return pos;
    }
    text[..pos]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(pos)
}

/// Position `n` characters after `pos` (clamped at the end).
fn forward_chars(text: &str, pos: usize, n: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Move `pos` back so it does not cut a word in half.
fn word_start(text: &str, mut pos: usize) -> usize {
    while let (Some(prev), Some(cur)) = (text[..pos].chars().next_back(), text[pos..].chars().next())
    {
        if !(prev.is_alphanumeric() && cur.is_alphanumeric()) {
            break;
        }
        pos -= prev.len_utf8();
    }
    pos
}

/// Move `pos` forward so it does not cut a word in half.
fn word_end(text: &str, mut pos: usize) -> usize {
    while let (Some(prev), Some(cur)) = (text[..pos].chars().next_back(), text[pos..].chars().next())
    {
        if !(prev.is_alphanumeric() && cur.is_alphanumeric()) {
            break;
        }
        pos += cur.len_utf8();
    }
    pos
}

/// Wraps a raw finder and drops the candidates whose surroundings do not
/// satisfy the context. The chunk text is normalized on the first candidate
/// and reused for the rest.
pub struct ContextFilter<'a, I> {
    inner: I,
    raw: &'a str,
    spec: &'a ContextSpec,
    normalized: Option<NormalizedText>,
}

impl<'a, I> ContextFilter<'a, I> {
    pub fn new(inner: I, raw: &'a str, spec: &'a ContextSpec) -> Self {
        Self {
            inner,
            raw,
            spec,
            normalized: None,
        }
    }
}

impl<I> Iterator for ContextFilter<'_, I>
where
    I: Iterator<Item = PiiEntity>,
{
    type Item = PiiEntity;

    fn next(&mut self) -> Option<PiiEntity> {
        loop {
            let candidate = self.inner.next()?;
            let raw = self.raw;
            let norm = self
                .normalized
                .get_or_insert_with(|| NormalizedText::new(raw));
            if self.spec.check(norm, candidate.pos, candidate.end()) {
                return Some(candidate);
            }
        }
    }
}
