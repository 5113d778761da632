//! Rule-path grammar.
//!
//! Validation rules address payload locations with dotted paths such as
//! `nested.foo`, `array.*`, or `nested.*.bar`, where `*` means "every
//! element of the sequence or mapping at this position". Paths are parsed
//! into a typed representation once and reused, instead of re-splitting
//! strings at every lookup.

use std::fmt;
use std::str::FromStr;

/// One step of a rule path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal mapping key.
    Key(String),
    /// The `*` marker: every element at this position.
    Wildcard,
}

/// Error type for rule-path parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidRulePath {
    #[error("rule path is empty")]
    Empty,

    #[error("rule path {0:?} contains an empty segment")]
    EmptySegment(String),
}

/// A parsed dotted rule path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePath {
    segments: Vec<Segment>,
}

impl RulePath {
    /// The path's segments, in order. Never empty.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any segment is a wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }
}

impl FromStr for RulePath {
    type Err = InvalidRulePath;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(InvalidRulePath::Empty);
        }

        let mut segments = Vec::new();
        for part in raw.split('.') {
            match part {
                "" => return Err(InvalidRulePath::EmptySegment(raw.to_string())),
                "*" => segments.push(Segment::Wildcard),
                key => segments.push(Segment::Key(key.to_string())),
            }
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for RulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Key(key) => f.write_str(key)?,
                Segment::Wildcard => f.write_str("*")?,
            }
        }
        Ok(())
    }
}

/// An ordered, duplicate-free set of rule paths.
///
/// Used both for the rules a request declares and for the matched key set a
/// validator reports back. Order is declaration order; later duplicates are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePathSet {
    paths: Vec<RulePath>,
}

impl RulePathSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Parses a list of dotted path strings.
    ///
    /// Malformed entries (empty strings, empty segments such as `"a..b"`)
    /// address nothing and are skipped rather than treated as fatal.
    pub fn parse<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for entry in raw {
            match entry.as_ref().parse::<RulePath>() {
                Ok(path) => set.insert(path),
                Err(error) => {
                    tracing::debug!(path = entry.as_ref(), %error, "Skipping malformed rule path");
                }
            }
        }
        set
    }

    /// Adds a path, keeping the first occurrence on duplicates.
    pub fn insert(&mut self, path: RulePath) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Whether the set contains the given path.
    pub fn contains(&self, path: &RulePath) -> bool {
        self.paths.contains(path)
    }

    /// Iterates paths in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RulePath> {
        self.paths.iter()
    }

    /// Number of paths in the set.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<RulePath> for RulePathSet {
    fn from_iter<I: IntoIterator<Item = RulePath>>(iter: I) -> Self {
        let mut set = Self::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RulePathSet {
    type Item = &'a RulePath;
    type IntoIter = std::slice::Iter<'a, RulePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
