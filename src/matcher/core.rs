use super::captures::Captures;
use super::{PathMatcher, Pattern, Segment};

use crate::bitset::BitSet;
use crate::strmap::StrMap;

use std::cmp::Ordering;

use smallvec::SmallVec;

const STAR: char = '*';
const COLON: char = ':';
const SLASH: char = '/';

const MAX_SEGMENTS: usize = 64;

pub(crate) struct ParsedPattern<'a> {
    parts: SmallVec<[&'a str; 8]>,
    wildcard: Option<&'a str>,
}

pub(crate) fn parse_pattern(pattern: &str) -> Result<ParsedPattern<'_>, &'static str> {
    let pattern = match pattern.strip_prefix(SLASH) {
        Some(p) => p,
        None => return Err("pattern must start with '/'"),
    };

    let mut parts: SmallVec<[&str; 8]> = pattern.split(SLASH).collect();

    if parts.len() > MAX_SEGMENTS {
        return Err("a pattern can not hold more than 64 segments");
    }

    let mut wildcard = None;
    if let Some(&last) = parts.last() {
        if let Some(name) = last.strip_prefix(STAR) {
            if name.is_empty() {
                return Err("capture name can not be empty");
            }
            wildcard = Some(name);
            parts.pop();
        }
    }

    for &part in &parts {
        if part.starts_with(STAR) {
            return Err("wildcard pattern can only appear at end");
        }
        if part == ":" {
            return Err("capture name can not be empty");
        }
    }

    Ok(ParsedPattern { parts, wildcard })
}

impl<T> PathMatcher<T> {
    fn extend_segments(segments: &mut Vec<Segment>, num: usize) {
        let base = match segments.last() {
            Some(s) => s.wildcard.clone(),
            None => BitSet::zero(),
        };

        segments.resize_with(num, || Segment {
            static_map: StrMap::new(),
            dynamic: base.clone(),
            wildcard: base.clone(),
        });
    }

    pub(super) fn insert_endpoint(&mut self, pattern: &str, data: T) -> Result<(), &'static str> {
        let ParsedPattern { parts, wildcard } = parse_pattern(pattern)?;

        let segment_num = parts.len() + usize::from(wildcard.is_some());

        let mut captures: Vec<(Box<str>, usize)> = Vec::new();
        let mut rank: u64 = 0;

        for (i, &part) in parts.iter().enumerate() {
            rank <<= 1;
            match part.strip_prefix(COLON) {
                Some(name) => captures.push((name.into(), i)),
                None => rank |= 1,
            }
        }
        if wildcard.is_some() {
            rank <<= 1;
        }

        if segment_num > self.segments.len() {
            Self::extend_segments(&mut self.segments, segment_num);
        }

        let id = self.patterns.len();

        for (&part, s) in parts.iter().zip(self.segments.iter_mut()) {
            if part.starts_with(COLON) {
                s.dynamic.set(id)
            } else {
                s.static_map.find_mut_with(part, BitSet::zero).set(id)
            }
        }

        if wildcard.is_some() {
            for s in &mut self.segments[parts.len()..] {
                s.dynamic.set(id);
                s.wildcard.set(id);
            }
        }

        self.endpoints.push(data);
        self.patterns.push(Pattern {
            segment_num,
            rank,
            wildcard: wildcard.map(Into::into),
            captures,
        });

        Ok(())
    }

    pub(super) fn find_with<'a>(
        &'a self,
        path: &'a str,
        mut accept: impl FnMut(&'a T, &Captures<'a>) -> bool,
    ) -> Option<(&'a T, Captures<'a>)> {
        if self.patterns.is_empty() {
            return None;
        }

        let path = trim_first_slash(path);
        let parts: SmallVec<[&str; 8]> = path.split(SLASH).collect();

        let mut enable_mask = BitSet::ones(self.patterns.len());

        for (&part, s) in parts.iter().zip(self.segments.iter()) {
            let mut e = s.dynamic.clone();
            if let Some(m) = s.static_map.find(part) {
                e.union_with(m);
            }
            enable_mask.intersect_with(&e);
        }
        if parts.len() > self.segments.len() {
            if let Some(last) = self.segments.last() {
                enable_mask.intersect_with(&last.wildcard);
            }
        }
        if enable_mask.is_zero() {
            return None;
        }

        let mut candidates: SmallVec<[usize; 8]> = enable_mask
            .iter_ones()
            .filter(|&i| self.patterns[i].segment_num <= parts.len())
            .collect();
        candidates.sort_by(|&i, &j| self.specificity(i, j));

        for idx in candidates {
            let route = &self.patterns[idx];
            let mut captures = Captures::new();
            for &(ref name, i) in route.captures.iter() {
                captures.buf.push((&**name, parts[i]));
            }
            if let Some(ref name) = route.wildcard {
                let pos = route.segment_num - 1;
                let offset: usize = parts[..pos].iter().map(|p| p.len() + 1).sum();
                captures.buf.push((&**name, &path[offset..]));
            }

            let data = &self.endpoints[idx];
            if accept(data, &captures) {
                return Some((data, captures));
            }
        }

        None
    }

    fn specificity(&self, i: usize, j: usize) -> Ordering {
        let lhs = &self.patterns[i];
        let rhs = &self.patterns[j];
        rhs.segment_num
            .cmp(&lhs.segment_num)
            .then(rhs.rank.cmp(&lhs.rank))
            .then(lhs.wildcard.is_some().cmp(&rhs.wildcard.is_some()))
            .then(i.cmp(&j))
    }
}

#[inline(always)]
fn trim_first_slash(s: &str) -> &str {
    s.strip_prefix(SLASH).unwrap_or(s)
}
