//! Drill paths into a node's output
//!
//! A drill path records where the user is inside a node's nested output.
//! Object keys and array indices are separate segment kinds; in text form
//! indices are written in brackets (`items[0].name`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PickerError, Result};

/// One step into a nested value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index, displayed as `[n]`
    Index(usize),
}

impl PathSegment {
    /// Interpret a field label: `[n]` is an index, anything else a key
    pub fn from_label(label: &str) -> Self {
        match parse_bracket_index(label) {
            Some(index) => Self::Index(index),
            None => Self::Key(label.to_string()),
        }
    }

    /// Label shown in field lists (`name` or `[0]`)
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Index(index) => write!(f, "[{}]", index),
        }
    }
}

fn parse_bracket_index(label: &str) -> Option<usize> {
    label
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|digits| {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                digits.parse().ok()
            }
        })
}

/// Ordered sequence of segments from a node's output root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrillPath {
    segments: Vec<PathSegment>,
}

impl DrillPath {
    /// The empty path (a node's top level)
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parse the text form, e.g. `items[0].name` or `[2][1]`
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        if text.is_empty() {
            return Ok(Self { segments });
        }

        for part in text.split('.') {
            if part.is_empty() {
                return Err(PickerError::invalid_path(text, "empty segment"));
            }

            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };
            if !key.is_empty() {
                if key.contains(']') {
                    return Err(PickerError::invalid_path(text, "unmatched ']'"));
                }
                segments.push(PathSegment::Key(key.to_string()));
            }

            while !rest.is_empty() {
                let close = rest
                    .find(']')
                    .ok_or_else(|| PickerError::invalid_path(text, "unclosed '['"))?;
                let index = parse_bracket_index(&rest[..=close]).ok_or_else(|| {
                    PickerError::invalid_path(text, format!("bad index '{}'", &rest[..=close]))
                })?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(PickerError::invalid_path(text, "text after ']'"));
                }
            }
        }

        Ok(Self { segments })
    }

    /// Segments in order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Descend one level
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Ascend one level, returning the removed segment
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Return to the root
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// A copy of this path extended by one segment
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }
}

impl fmt::Display for DrillPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i > 0 => write!(f, ".{}", key)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}
