use super::Router;

use crate::filter::FilterList;
use crate::matcher::Captures;
use crate::route::Route;

use http::Method;
use tracing::trace;

/// A route selected for a request.
#[derive(Debug)]
pub struct Matched<'a, T> {
    route: &'a Route<T>,
    captures: Captures<'a>,
    verb_filters: Option<&'a FilterList>,
}

impl<'a, T> Matched<'a, T> {
    pub fn route(&self) -> &'a Route<T> {
        self.route
    }

    pub fn data(&self) -> &'a T {
        &self.route.data
    }

    pub fn captures(&self) -> &Captures<'a> {
        &self.captures
    }

    pub fn into_captures(self) -> Captures<'a> {
        self.captures
    }

    /// Filters to run before the handler: the filters bound to the request
    /// verb, then the route's own merged filters.
    pub fn before_filters(&self) -> FilterList {
        let mut list = FilterList::new();
        if let Some(verb) = self.verb_filters {
            list.extend_from(verb);
        }
        list.extend_from(&self.route.before);
        list
    }

    pub fn after_filters(&self) -> &'a FilterList {
        &self.route.after
    }
}

impl<T> Router<T> {
    /// Looks a request up in the table built by the last merge.
    ///
    /// Routes registered since then are not visible; use
    /// [`dispatch`](Router::dispatch) to merge first.
    pub fn find<'a>(&'a self, method: &Method, path: &'a str) -> Option<Matched<'a, T>> {
        let routes = &self.routes;
        let (&id, captures) = self
            .table
            .find_by(method, path, |&id, caps| routes[id.0].accepts(caps))?;

        Some(Matched {
            route: &self.routes[id.0],
            captures,
            verb_filters: self.verb_filters.get(method.as_str()),
        })
    }

    /// Merges pending groups, then looks the request up.
    pub fn dispatch<'a>(&'a mut self, method: &Method, path: &'a str) -> Option<Matched<'a, T>> {
        self.merge_groups();
        let ret = self.find(method, path);
        if ret.is_none() {
            trace!(%method, path, "no route matched");
        }
        ret
    }

    /// Methods with a route accepting `path`, in no particular order.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let routes = &self.routes;
        self.table
            .methods()
            .filter(|&m| {
                self.table
                    .find_by(m, path, |&id, caps| routes[id.0].accepts(caps))
                    .is_some()
            })
            .cloned()
            .collect()
    }
}
