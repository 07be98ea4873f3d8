use crate::error::RouterError;
use crate::matcher::{Captures, PathMatcher};

use std::collections::HashMap;

pub use http::Method;

/// One path matcher per HTTP method.
#[derive(Debug)]
pub struct HttpRouter<T> {
    method_map: HashMap<Method, PathMatcher<T>>,
}

impl<T> Default for HttpRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HttpRouter<T> {
    pub fn new() -> Self {
        Self {
            method_map: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.method_map.clear();
    }

    pub fn find<'a>(&'a self, method: &Method, path: &'a str) -> Option<(&'a T, Captures<'a>)> {
        self.method_map.get(method)?.find(path)
    }

    pub fn find_by<'a>(
        &'a self,
        method: &Method,
        path: &'a str,
        accept: impl FnMut(&'a T, &Captures<'a>) -> bool,
    ) -> Option<(&'a T, Captures<'a>)> {
        self.method_map.get(method)?.find_by(path, accept)
    }

    pub fn insert(&mut self, method: Method, pattern: &str, data: T) -> &mut Self {
        self.access_router(method).insert(pattern, data);
        self
    }

    pub fn try_insert(
        &mut self,
        method: Method,
        pattern: &str,
        data: T,
    ) -> Result<&mut Self, RouterError> {
        self.access_router(method).try_insert(pattern, data)?;
        Ok(self)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> + '_ {
        self.method_map.keys()
    }
}

impl<T> HttpRouter<T> {
    fn access_router(&mut self, method: Method) -> &mut PathMatcher<T> {
        self.method_map.entry(method).or_insert_with(PathMatcher::new)
    }
}
