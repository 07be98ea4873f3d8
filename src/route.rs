use crate::error::RouterError;
use crate::filter::FilterList;
use crate::group::GroupId;
use crate::router::Router;

use std::fmt;

use http::Method;
use regex::Regex;
use smallvec::SmallVec;

/// Position of a route in its router, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(pub(crate) usize);

impl RouteId {
    pub fn index(self) -> usize {
        self.0
    }
}

pub(crate) type Methods = SmallVec<[Method; 2]>;

#[derive(Debug)]
pub struct Route<T> {
    pub(crate) id: RouteId,
    pub(crate) methods: Methods,
    pub(crate) pattern: Box<str>,
    pub(crate) name: Option<Box<str>>,
    pub(crate) data: T,
    pub(crate) before: FilterList,
    pub(crate) after: FilterList,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) group: Option<GroupId>,
}

impl<T> Route<T> {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The full pattern, including the prefixes of enclosing groups.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn before_filters(&self) -> &FilterList {
        &self.before
    }

    pub fn after_filters(&self) -> &FilterList {
        &self.after
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Checks every constraint against the captured parameters.
    ///
    /// A constraint whose parameter was not captured is ignored.
    pub fn accepts(&self, captures: &[(&str, &str)]) -> bool {
        captures.iter().all(|&(name, value)| {
            self.constraints
                .iter()
                .filter(|c| c.name() == name)
                .all(|c| c.is_match(value))
        })
    }

    pub(crate) fn set_constraint(&mut self, constraint: Constraint) {
        match self
            .constraints
            .iter_mut()
            .find(|c| c.name == constraint.name)
        {
            Some(c) => *c = constraint,
            None => self.constraints.push(constraint),
        }
    }

    pub(crate) fn has_constraint(&self, name: &str) -> bool {
        self.constraints.iter().any(|c| &*c.name == name)
    }
}

/// A `where` constraint: a capture name and the anchored regex its value
/// must match.
#[derive(Clone)]
pub struct Constraint {
    name: Box<str>,
    expr: Box<str>,
    regex: Regex,
}

impl Constraint {
    pub fn new(name: &str, expr: &str) -> Result<Self, RouterError> {
        let regex = Regex::new(&format!("^(?:{})$", expr)).map_err(|source| {
            RouterError::InvalidConstraint {
                name: name.to_owned(),
                source,
            }
        })?;
        Ok(Self {
            name: name.into(),
            expr: expr.into(),
            regex,
        })
    }

    /// Builds `(a|b|c)` from a list of alternatives.
    pub fn any_of<S: AsRef<str>>(name: &str, alternatives: &[S]) -> Result<Self, RouterError> {
        let joined: Vec<&str> = alternatives.iter().map(AsRef::as_ref).collect();
        Self::new(name, &format!("({})", joined.join("|")))
    }

    pub(crate) fn from_pairs<I, K, V>(pairs: I) -> Result<Vec<Self>, RouterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(name, expr)| Self::new(name.as_ref(), expr.as_ref()))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("expr", &self.expr)
            .finish()
    }
}

/// Chainable access to a freshly registered route.
pub struct RouteMut<'r, T> {
    pub(crate) router: &'r mut Router<T>,
    pub(crate) id: RouteId,
}

impl<'r, T> RouteMut<'r, T> {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn route(&self) -> &Route<T> {
        self.router.route_at(self.id)
    }

    /// Names the route. A later route registered with the same name takes
    /// the name over.
    pub fn name(self, name: &str) -> Self {
        self.router.set_name(self.id, name);
        self
    }

    pub fn before(self, filters: &str) -> Self {
        unwrap_config(self.try_before(filters))
    }

    pub fn try_before(self, filters: &str) -> Result<Self, RouterError> {
        self.router.route_at_mut(self.id).before.try_extend(filters)?;
        Ok(self)
    }

    pub fn after(self, filters: &str) -> Self {
        unwrap_config(self.try_after(filters))
    }

    pub fn try_after(self, filters: &str) -> Result<Self, RouterError> {
        self.router.route_at_mut(self.id).after.try_extend(filters)?;
        Ok(self)
    }

    pub fn where_(self, name: &str, expr: &str) -> Self {
        unwrap_config(self.try_where(name, expr))
    }

    pub fn try_where(self, name: &str, expr: &str) -> Result<Self, RouterError> {
        let constraint = Constraint::new(name, expr)?;
        Ok(self.constrain(Some(constraint)))
    }

    /// Restricts `name` to one of `alternatives`, e.g. `["json", "xml"]`.
    pub fn where_any<S: AsRef<str>>(self, name: &str, alternatives: &[S]) -> Self {
        unwrap_config(self.try_where_any(name, alternatives))
    }

    pub fn try_where_any<S: AsRef<str>>(
        self,
        name: &str,
        alternatives: &[S],
    ) -> Result<Self, RouterError> {
        let constraint = Constraint::any_of(name, alternatives)?;
        Ok(self.constrain(Some(constraint)))
    }

    /// Sets several constraints from `(name, expr)` pairs. Nothing is set
    /// unless every expression compiles.
    pub fn wheres<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        unwrap_config(self.try_wheres(pairs))
    }

    pub fn try_wheres<I, K, V>(self, pairs: I) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let constraints = Constraint::from_pairs(pairs)?;
        Ok(self.constrain(constraints))
    }

    fn constrain(self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        let route = self.router.route_at_mut(self.id);
        for constraint in constraints {
            route.set_constraint(constraint);
        }
        self
    }
}

pub(crate) fn unwrap_config<R>(ret: Result<R, RouterError>) -> R {
    match ret {
        Ok(r) => r,
        Err(e) => panic!("{}", e),
    }
}
