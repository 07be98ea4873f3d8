use super::params::Params;
use super::{Request, Response};

use crate::error::RouterError;
use crate::filter::{filter_parts, FilterList};
use crate::router::Router;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A before filter. Returning a response stops the request there.
pub type BeforeFn = dyn Fn(&Request, &Params, &[&str]) -> Option<Response> + Send + Sync;

/// An after filter, run on the handler's response.
pub type AfterFn = dyn Fn(&mut Response, &[&str]) + Send + Sync;

/// Filter implementations, looked up by the name part of `name:arg1,arg2`.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    before: HashMap<String, Arc<BeforeFn>>,
    after: HashMap<String, Arc<AfterFn>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&Request, &Params, &[&str]) -> Option<Response> + Send + Sync + 'static,
    {
        self.before.insert(name.to_owned(), Arc::new(f));
        self
    }

    pub fn after<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Response, &[&str]) + Send + Sync + 'static,
    {
        self.after.insert(name.to_owned(), Arc::new(f));
        self
    }

    pub(super) fn get_before(&self, name: &str) -> Option<&Arc<BeforeFn>> {
        self.before.get(name)
    }

    pub(super) fn get_after(&self, name: &str) -> Option<&Arc<AfterFn>> {
        self.after.get(name)
    }

    /// Fails on the first filter referenced by `router` that is not
    /// registered. Verb filters run as before filters.
    pub(super) fn check<T>(&self, router: &Router<T>) -> Result<(), RouterError> {
        for (_, verb) in router.all_verb_filters().iter() {
            check_list(verb, &self.before)?;
        }
        for route in router.routes() {
            check_list(route.before_filters(), &self.before)?;
            check_list(route.after_filters(), &self.after)?;
        }
        Ok(())
    }
}

fn check_list<V>(list: &FilterList, registered: &HashMap<String, V>) -> Result<(), RouterError> {
    for filter in list.iter() {
        let (name, _) = filter_parts(filter);
        if !registered.contains_key(name) {
            return Err(RouterError::UnknownFilter {
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("before", &self.before.keys().collect::<Vec<_>>())
            .field("after", &self.after.keys().collect::<Vec<_>>())
            .finish()
    }
}
