//! Hierarchical resource keys and wildcard patterns.
//!
//! # Responsibility
//! - Parse and validate dot-separated resource keys (`services.routes`).
//! - Match consumption patterns containing one wildcard segment (`*.routes`).
//!
//! # Invariants
//! - A parsed key always has at least one segment; segments are never empty.
//! - At most one segment is the wildcard marker `*`.
//! - Provided keys (as opposed to consumption patterns) never contain a
//!   wildcard; the registry enforces that at declaration time.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wildcard segment marker used in consumption patterns.
pub const WILDCARD_SEGMENT: &str = "*";

/// Immutable dot-separated resource key.
///
/// Comparable by exact segment match; a wildcard segment in a pattern matches
/// any single segment at that position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    raw: String,
}

impl ResourceKey {
    /// Parses one resource key or consumption pattern.
    pub fn parse(value: &str) -> Result<Self, ResourceKeyError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ResourceKeyError::Empty);
        }

        let mut wildcards = 0usize;
        for segment in trimmed.split('.') {
            if segment.is_empty() {
                return Err(ResourceKeyError::EmptySegment(trimmed.to_string()));
            }
            if segment == WILDCARD_SEGMENT {
                wildcards += 1;
                continue;
            }
            if !is_valid_segment(segment) {
                return Err(ResourceKeyError::InvalidSegment {
                    key: trimmed.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        if wildcards > 1 {
            return Err(ResourceKeyError::MultipleWildcards(trimmed.to_string()));
        }

        Ok(Self {
            raw: trimmed.to_string(),
        })
    }

    /// Returns the raw dotted form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns key segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }

    /// Returns `true` when the key contains a wildcard segment.
    pub fn is_pattern(&self) -> bool {
        self.segments().any(|segment| segment == WILDCARD_SEGMENT)
    }

    /// Returns `true` when this key, read as a pattern, matches `exact`.
    ///
    /// Segment counts must be equal; the wildcard segment matches any single
    /// segment at its position. An exact key matches only itself.
    pub fn matches(&self, exact: &ResourceKey) -> bool {
        let mut own = self.segments();
        let mut other = exact.segments();
        loop {
            match (own.next(), other.next()) {
                (None, None) => return true,
                (Some(pattern), Some(segment)) => {
                    if pattern != WILDCARD_SEGMENT && pattern != segment {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn is_valid_segment(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Resource key parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKeyError {
    /// Key text is empty or whitespace-only.
    Empty,
    /// Key contains an empty segment (`a..b`, leading/trailing dot).
    EmptySegment(String),
    /// Segment contains characters outside `[a-z0-9_-]`.
    InvalidSegment { key: String, segment: String },
    /// More than one wildcard segment.
    MultipleWildcards(String),
}

impl Display for ResourceKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "resource key must not be empty"),
            Self::EmptySegment(key) => {
                write!(f, "resource key contains empty segment: `{key}`")
            }
            Self::InvalidSegment { key, segment } => {
                write!(f, "resource key `{key}` has invalid segment: `{segment}`")
            }
            Self::MultipleWildcards(key) => {
                write!(f, "resource key has more than one wildcard: `{key}`")
            }
        }
    }
}

impl Error for ResourceKeyError {}
