mod dispatch;
mod merge;

pub use self::dispatch::Matched;

use crate::error::RouterError;
use crate::filter::{FilterList, IntoFilterList, VerbFilters};
use crate::group::{GroupId, RouteGroup};
use crate::http_router::HttpRouter;
use crate::matcher::parse_pattern;
use crate::route::{unwrap_config, Methods, Route, RouteId, RouteMut};

use std::collections::HashMap;

use http::Method;

/// An HTTP router with verb filters and nested route groups.
///
/// Routes are registered into an arena and compiled into the lookup table by
/// [`merge_groups`](Router::merge_groups), which [`dispatch`](Router::dispatch)
/// runs first. Groups created since the last merge stay pending until then;
/// their filters are folded onto their routes, outer groups first.
#[derive(Debug)]
pub struct Router<T> {
    pub(crate) routes: Vec<Route<T>>,
    names: HashMap<Box<str>, RouteId>,
    pub(crate) pending: Vec<RouteGroup>,
    open: Vec<OpenGroup>,
    next_group: usize,
    verb_filters: VerbFilters,
    table: HttpRouter<RouteId>,
    compiled: usize,
}

#[derive(Debug)]
struct OpenGroup {
    id: GroupId,
    prefix: String,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            names: HashMap::new(),
            pending: Vec::new(),
            open: Vec::new(),
            next_group: 0,
            verb_filters: VerbFilters::new(),
            table: HttpRouter::new(),
            compiled: 0,
        }
    }

    pub fn route<M>(&mut self, methods: M, pattern: &str, data: T) -> RouteMut<'_, T>
    where
        M: IntoIterator<Item = Method>,
    {
        unwrap_config(self.try_route(methods, pattern, data))
    }

    pub fn try_route<M>(
        &mut self,
        methods: M,
        pattern: &str,
        data: T,
    ) -> Result<RouteMut<'_, T>, RouterError>
    where
        M: IntoIterator<Item = Method>,
    {
        let mut list = Methods::new();
        for method in methods {
            if !list.contains(&method) {
                list.push(method);
            }
        }
        if list.is_empty() {
            return Err(RouterError::InvalidVerb {
                verb: String::new(),
            });
        }

        let pattern = join_paths(self.current_prefix(), pattern);
        let invalid = parse_pattern(&pattern).err();
        if let Some(reason) = invalid {
            return Err(RouterError::InvalidPattern { pattern, reason });
        }

        let id = RouteId(self.routes.len());
        self.routes.push(Route {
            id,
            methods: list,
            pattern: pattern.into(),
            name: None,
            data,
            before: FilterList::new(),
            after: FilterList::new(),
            constraints: Vec::new(),
            group: None,
        });

        Ok(RouteMut { router: self, id })
    }

    /// Binds filters to HTTP verbs, e.g. `router.on(vec!["post", "put"], "csrf|auth")`
    /// or `router.on(vec!["post"], vec!["csrf", "auth"])`.
    pub fn on<V, F>(&mut self, verbs: V, filters: F) -> &mut Self
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        F: IntoFilterList,
    {
        unwrap_config(self.try_on(verbs, filters))
    }

    pub fn try_on<V, F>(&mut self, verbs: V, filters: F) -> Result<&mut Self, RouterError>
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        F: IntoFilterList,
    {
        self.verb_filters.bind(verbs, filters)?;
        Ok(self)
    }

    pub fn verb_filters(&self, verb: &str) -> Option<&FilterList> {
        self.verb_filters.get(verb)
    }

    pub fn all_verb_filters(&self) -> &VerbFilters {
        &self.verb_filters
    }

    pub fn get_route(&self, id: RouteId) -> Option<&Route<T>> {
        self.routes.get(id.0)
    }

    pub fn get_route_mut(&mut self, id: RouteId) -> Option<RouteMut<'_, T>> {
        if id.0 < self.routes.len() {
            Some(RouteMut { router: self, id })
        } else {
            None
        }
    }

    pub fn named(&self, name: &str) -> Option<&Route<T>> {
        let &id = self.names.get(name)?;
        self.routes.get(id.0)
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route<T>> + '_ {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Groups created since the last merge, in creation order.
    pub fn pending_groups(&self) -> &[RouteGroup] {
        &self.pending
    }
}

macro_rules! define_method {
    ($name:ident, $try_name:ident, [$($method:ident),+]) => {
        pub fn $name(&mut self, pattern: &str, data: T) -> RouteMut<'_, T> {
            self.route(vec![$(Method::$method),+], pattern, data)
        }

        pub fn $try_name(&mut self, pattern: &str, data: T) -> Result<RouteMut<'_, T>, RouterError> {
            self.try_route(vec![$(Method::$method),+], pattern, data)
        }
    };
}

impl<T> Router<T> {
    define_method!(get, try_get, [GET, HEAD]);
    define_method!(post, try_post, [POST]);
    define_method!(put, try_put, [PUT]);
    define_method!(patch, try_patch, [PATCH]);
    define_method!(delete, try_delete, [DELETE]);
    define_method!(options, try_options, [OPTIONS]);
    define_method!(any, try_any, [GET, HEAD, POST, PUT, PATCH, DELETE]);
}

impl<T> Router<T> {
    pub(crate) fn route_at(&self, id: RouteId) -> &Route<T> {
        &self.routes[id.0]
    }

    pub(crate) fn route_at_mut(&mut self, id: RouteId) -> &mut Route<T> {
        &mut self.routes[id.0]
    }

    pub(crate) fn set_name(&mut self, id: RouteId, name: &str) {
        let route = &mut self.routes[id.0];
        if let Some(old) = route.name.take() {
            if self.names.get(&old) == Some(&id) {
                self.names.remove(&old);
            }
        }
        route.name = Some(name.into());
        self.names.insert(name.into(), id);
    }

    fn rebuild_names(&mut self) {
        self.names.clear();
        for route in &self.routes {
            if let Some(ref name) = route.name {
                self.names.insert(name.clone(), route.id);
            }
        }
    }

    fn current_prefix(&self) -> &str {
        self.open.last().map(|g| g.prefix.as_str()).unwrap_or("")
    }
}

fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() && !prefix.is_empty() {
        return prefix.to_owned();
    }
    format!("{}/{}", prefix, path)
}
