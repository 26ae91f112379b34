use regex::{Regex, RegexBuilder};

use crate::error::{PiiError, Result};

use super::{EntityIter, TaskArgs};

/// Raw finder for a detector expressed as a regular expression.
///
/// Patterns are compiled in verbose mode (whitespace and `#` comments are
/// ignored; write a literal space as `\x20` or `[\ ]`) with Unicode-aware
/// classes.
#[derive(Debug, Clone)]
pub struct PatternTask {
    regex: Regex,
}

impl PatternTask {
    pub fn new(pattern: &str, name: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .ignore_whitespace(true)
            .unicode(true)
            .build()
            .map_err(|e| PiiError::InvalidPattern {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// One occurrence per non-overlapping match, left to right.
    pub fn find<'a>(&'a self, args: &'a TaskArgs, text: &'a str, chunk_id: &'a str) -> EntityIter<'a> {
        Box::new(
            self.regex
                .find_iter(text)
                .map(move |m| args.entity(m.as_str(), chunk_id, m.start())),
        )
    }
}
