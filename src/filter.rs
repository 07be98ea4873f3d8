use crate::error::RouterError;

use std::collections::HashMap;

use http::Method;
use smallvec::SmallVec;

const PIPE: char = '|';
const COLON: char = ':';
const COMMA: char = ',';

/// An ordered list of filter names without duplicates.
///
/// Filters run in list order, so the position of a name is significant:
/// pushing a filter whose name is already present keeps the first entry,
/// parameters included. `throttle:10,1` is dropped after `throttle:60,1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterList {
    names: Vec<Box<str>>,
}

impl FilterList {
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Parses a `|` separated list such as `"auth|csrf|throttle:60,1"`.
    pub fn parse(spec: &str) -> Result<Self, RouterError> {
        let mut list = Self::new();
        list.try_extend(spec)?;
        Ok(list)
    }

    /// Validates every name in `spec` before appending any of them.
    pub fn try_extend(&mut self, spec: &str) -> Result<&mut Self, RouterError> {
        let names: SmallVec<[&str; 4]> = spec.split(PIPE).collect();
        for &name in &names {
            validate_filter(name)?;
        }
        for name in names {
            self.push(name);
        }
        Ok(self)
    }

    /// Checks for a filter by name; parameters are ignored on both sides.
    pub fn contains(&self, name: &str) -> bool {
        let name = filter_name(name);
        self.names.iter().any(|n| filter_name(n) == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|n| &**n)
    }

    pub fn to_vec(&self) -> Vec<&str> {
        self.iter().collect()
    }

    pub(crate) fn push(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.into());
        true
    }

    pub(crate) fn extend_from(&mut self, other: &FilterList) {
        for name in other.iter() {
            self.push(name);
        }
    }
}

/// Filter names given either as one `|` separated string or as a list of
/// such strings.
pub trait IntoFilterList {
    fn into_filter_list(self) -> Result<FilterList, RouterError>;
}

impl IntoFilterList for &str {
    fn into_filter_list(self) -> Result<FilterList, RouterError> {
        FilterList::parse(self)
    }
}

impl IntoFilterList for String {
    fn into_filter_list(self) -> Result<FilterList, RouterError> {
        FilterList::parse(&self)
    }
}

impl<S: AsRef<str>> IntoFilterList for &[S] {
    fn into_filter_list(self) -> Result<FilterList, RouterError> {
        let mut list = FilterList::new();
        for spec in self {
            list.try_extend(spec.as_ref())?;
        }
        Ok(list)
    }
}

impl<S: AsRef<str>> IntoFilterList for Vec<S> {
    fn into_filter_list(self) -> Result<FilterList, RouterError> {
        self.as_slice().into_filter_list()
    }
}

fn validate_filter(name: &str) -> Result<(), RouterError> {
    let invalid = |reason| RouterError::InvalidFilter {
        name: name.to_owned(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("filter name can not be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("filter name can not contain whitespace"));
    }
    if name.starts_with(COLON) {
        return Err(invalid("filter name can not start with ':'"));
    }
    Ok(())
}

fn filter_name(filter: &str) -> &str {
    match filter.find(COLON) {
        Some(i) => &filter[..i],
        None => filter,
    }
}

/// Splits `"throttle:60,1"` into `("throttle", ["60", "1"])`.
pub fn filter_parts(name: &str) -> (&str, SmallVec<[&str; 4]>) {
    match name.find(COLON) {
        Some(i) => (&name[..i], name[i + 1..].split(COMMA).collect()),
        None => (name, SmallVec::new()),
    }
}

/// Filters bound to HTTP verbs, keyed by the lowercased verb.
#[derive(Debug, Clone, Default)]
pub struct VerbFilters {
    map: HashMap<Box<str>, FilterList>,
}

impl VerbFilters {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Appends `filters` to every verb in `verbs`.
    ///
    /// Nothing is recorded unless every verb and every filter name is valid.
    pub fn bind<V, F>(&mut self, verbs: V, filters: F) -> Result<(), RouterError>
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        F: IntoFilterList,
    {
        let filters = filters.into_filter_list()?;
        let verbs = verbs
            .into_iter()
            .map(|v| normalize_verb(v.as_ref()))
            .collect::<Result<SmallVec<[String; 4]>, _>>()?;

        for verb in verbs {
            self.map
                .entry(verb.into())
                .or_insert_with(FilterList::new)
                .extend_from(&filters);
        }
        Ok(())
    }

    pub fn get(&self, verb: &str) -> Option<&FilterList> {
        self.map.get(verb.to_ascii_lowercase().as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterList)> + '_ {
        self.map.iter().map(|(k, v)| (&**k, v))
    }
}

fn normalize_verb(verb: &str) -> Result<String, RouterError> {
    let upper = verb.to_ascii_uppercase();
    if Method::from_bytes(upper.as_bytes()).is_err() {
        return Err(RouterError::InvalidVerb {
            verb: verb.to_owned(),
        });
    }
    Ok(verb.to_ascii_lowercase())
}
