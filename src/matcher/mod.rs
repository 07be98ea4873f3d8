mod captures;
mod core;

pub use self::captures::Captures;

pub(crate) use self::core::parse_pattern;

use crate::bitset::BitSet;
use crate::error::RouterError;
use crate::strmap::StrMap;

/// Segment-indexed path matcher.
///
/// Patterns are made of static segments, `:name` captures and an optional
/// trailing `*name` wildcard. Every segment position keeps a bitset of the
/// patterns that accept it, so a lookup is a handful of bitset
/// intersections followed by a ranking of the survivors.
#[derive(Debug)]
pub struct PathMatcher<T> {
    segments: Vec<Segment>,
    patterns: Vec<Pattern>,
    endpoints: Vec<T>,
}

#[derive(Debug)]
struct Segment {
    static_map: StrMap<BitSet>,
    dynamic: BitSet,
    wildcard: BitSet,
}

#[derive(Debug)]
struct Pattern {
    segment_num: usize,
    rank: u64,
    wildcard: Option<Box<str>>,
    captures: Vec<(Box<str>, usize)>,
}

impl<T> Default for PathMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathMatcher<T> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            patterns: Vec::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.patterns.clear();
        self.endpoints.clear();
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn find<'a>(&'a self, path: &'a str) -> Option<(&'a T, Captures<'a>)> {
        self.find_with(path, |_, _| true)
    }

    /// Finds the most specific endpoint accepted by `accept`.
    ///
    /// Candidates are tried from the most specific to the least specific;
    /// equally specific patterns are tried in insertion order.
    pub fn find_by<'a>(
        &'a self,
        path: &'a str,
        accept: impl FnMut(&'a T, &Captures<'a>) -> bool,
    ) -> Option<(&'a T, Captures<'a>)> {
        self.find_with(path, accept)
    }

    pub fn insert(&mut self, pattern: &str, data: T) -> &mut Self {
        if let Err(e) = self.try_insert(pattern, data) {
            panic!("{}", e);
        }
        self
    }

    pub fn try_insert(&mut self, pattern: &str, data: T) -> Result<&mut Self, RouterError> {
        match self.insert_endpoint(pattern, data) {
            Ok(()) => Ok(self),
            Err(reason) => Err(RouterError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason,
            }),
        }
    }
}
