//! Path specifications for extra tree-bearing component properties.
//!
//! A path is a dot-separated list of segments. A segment ending in `[]` marks
//! a property holding a sequence to be visited per element. The last segment
//! names the property holding the sub-tree; earlier segments address nested
//! mappings.
//!
//! ```text
//! header            single component in `header`
//! tabs[]            sequence of components in `tabs`
//! items[].content   `content` of every mapping in the `items` sequence
//! config.footer     `footer` inside the `config` mapping
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ErrorCode;

const ARRAY_MARKER: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path specification is empty")]
    Empty,
    #[error("path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
    #[error("path '{path}' has a malformed segment '{segment}'")]
    MalformedSegment { path: String, segment: String },
}

impl ErrorCode for PathError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "E_PATH_EMPTY",
            Self::EmptySegment { .. } => "E_PATH_EMPTY_SEGMENT",
            Self::MalformedSegment { .. } => "E_PATH_MALFORMED_SEGMENT",
        }
    }
}

/// One parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    /// The property holds a sequence; apply the rest of the path per element.
    pub array: bool,
}

/// A parsed path specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropPath {
    raw: String,
    segments: Vec<Segment>,
}

impl PropPath {
    /// Parse a dot-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for an empty path, an empty segment (`a..b`), or
    /// a segment whose name is missing or contains stray brackets.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let segments = raw
            .split('.')
            .enumerate()
            .map(|(position, part)| parse_segment(raw, position, part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { raw: raw.to_owned(), segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn parse_segment(raw: &str, position: usize, part: &str) -> Result<Segment, PathError> {
    if part.is_empty() {
        return Err(PathError::EmptySegment { path: raw.to_owned(), position });
    }

    let (name, array) = match part.strip_suffix(ARRAY_MARKER) {
        Some(name) => (name, true),
        None => (part, false),
    };

    if name.is_empty() || name.contains(['[', ']']) || name.chars().any(char::is_whitespace) {
        return Err(PathError::MalformedSegment { path: raw.to_owned(), segment: part.to_owned() });
    }

    Ok(Segment { name: name.to_owned(), array })
}

impl FromStr for PropPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[path = "path_test.rs"]
mod tests;
