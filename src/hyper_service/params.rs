use crate::matcher::Captures;

use std::str::FromStr;

/// Owned path parameters handed to handlers and filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    items: Vec<(Box<str>, Box<str>)>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find_map(|(n, v)| if &**n == name { Some(&**v) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.items.iter().map(|(n, v)| (&**n, &**v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Params {
    pub(super) fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub(super) fn from_captures(caps: &Captures<'_>) -> Self {
        let items = caps
            .iter()
            .map(|&(name, value)| (name.into(), value.into()))
            .collect();
        Self { items }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::iter::Map<
        std::vec::IntoIter<(Box<str>, Box<str>)>,
        fn((Box<str>, Box<str>)) -> (String, String),
    >;

    fn into_iter(self) -> Self::IntoIter {
        fn into_strings((n, v): (Box<str>, Box<str>)) -> (String, String) {
            (n.into(), v.into())
        }
        self.items
            .into_iter()
            .map(into_strings as fn((Box<str>, Box<str>)) -> (String, String))
    }
}
