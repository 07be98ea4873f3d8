use crate::error::RouterError;
use crate::filter::FilterList;
use crate::route::{unwrap_config, Constraint, RouteId};
use crate::router::Router;

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::ops::Range;

use serde::Deserialize;

/// Identity of a group, assigned when its callback starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub(crate) usize);

/// Attributes shared by every route declared inside a group.
///
/// Built either with the chainable methods or deserialized from an
/// attribute bag:
///
/// ```json
/// { "prefix": "/admin", "before": "auth|csrf", "after": ["log"],
///   "where": { "id": "[0-9]+", "format": ["json", "xml"] } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawAttributes")]
pub struct GroupAttributes {
    pub(crate) prefix: Option<String>,
    pub(crate) before: FilterList,
    pub(crate) after: FilterList,
    pub(crate) constraints: Vec<Constraint>,
}

impl GroupAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(s: &str) -> Result<Self, RouterError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, RouterError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_owned());
        self
    }

    pub fn before(self, filters: &str) -> Self {
        unwrap_config(self.try_before(filters))
    }

    pub fn try_before(mut self, filters: &str) -> Result<Self, RouterError> {
        self.before.try_extend(filters)?;
        Ok(self)
    }

    pub fn after(self, filters: &str) -> Self {
        unwrap_config(self.try_after(filters))
    }

    pub fn try_after(mut self, filters: &str) -> Result<Self, RouterError> {
        self.after.try_extend(filters)?;
        Ok(self)
    }

    pub fn where_(self, name: &str, expr: &str) -> Self {
        unwrap_config(self.try_where(name, expr))
    }

    pub fn try_where(mut self, name: &str, expr: &str) -> Result<Self, RouterError> {
        self.constraints.push(Constraint::new(name, expr)?);
        Ok(self)
    }

    pub fn where_any<S: AsRef<str>>(self, name: &str, alternatives: &[S]) -> Self {
        unwrap_config(self.try_where_any(name, alternatives))
    }

    pub fn try_where_any<S: AsRef<str>>(
        mut self,
        name: &str,
        alternatives: &[S],
    ) -> Result<Self, RouterError> {
        self.constraints.push(Constraint::any_of(name, alternatives)?);
        Ok(self)
    }

    pub fn get_prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn before_filters(&self) -> &FilterList {
        &self.before
    }

    pub fn after_filters(&self) -> &FilterList {
        &self.after
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAttributes {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    before: Option<OneOrMany>,
    #[serde(default)]
    after: Option<OneOrMany>,
    #[serde(default, rename = "where")]
    constraints: BTreeMap<String, OneOrMany>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_filters(self) -> Result<FilterList, RouterError> {
        let mut list = FilterList::new();
        match self {
            Self::One(s) => {
                list.try_extend(&s)?;
            }
            Self::Many(v) => {
                for s in v {
                    list.try_extend(&s)?;
                }
            }
        }
        Ok(list)
    }

    fn into_constraint(self, name: &str) -> Result<Constraint, RouterError> {
        match self {
            Self::One(expr) => Constraint::new(name, &expr),
            Self::Many(alternatives) => Constraint::any_of(name, &alternatives),
        }
    }
}

impl TryFrom<RawAttributes> for GroupAttributes {
    type Error = RouterError;

    fn try_from(raw: RawAttributes) -> Result<Self, Self::Error> {
        let before = match raw.before {
            Some(v) => v.into_filters()?,
            None => FilterList::new(),
        };
        let after = match raw.after {
            Some(v) => v.into_filters()?,
            None => FilterList::new(),
        };
        let constraints = raw
            .constraints
            .into_iter()
            .map(|(name, v)| v.into_constraint(&name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            prefix: raw.prefix,
            before,
            after,
            constraints,
        })
    }
}

/// Routes registered by one group callback, waiting for the next merge.
#[derive(Debug)]
pub struct RouteGroup {
    pub(crate) id: GroupId,
    pub(crate) parent: Option<GroupId>,
    pub(crate) depth: usize,
    pub(crate) routes: Vec<RouteId>,
    pub(crate) span: Range<usize>,
    pub(crate) before: FilterList,
    pub(crate) after: FilterList,
}

impl RouteGroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Number of groups that were open when this group was created.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Routes declared directly inside this group.
    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }

    /// Every route declared while the group callback ran, nested groups
    /// included.
    pub fn span(&self) -> impl Iterator<Item = RouteId> {
        self.span.clone().map(RouteId)
    }

    pub fn before_filters(&self) -> &FilterList {
        &self.before
    }

    pub fn after_filters(&self) -> &FilterList {
        &self.after
    }
}

/// Chainable access to a freshly created group.
pub struct GroupMut<'r, T> {
    pub(crate) router: &'r mut Router<T>,
    pub(crate) index: usize,
}

impl<'r, T> GroupMut<'r, T> {
    pub fn group(&self) -> &RouteGroup {
        &self.router.pending[self.index]
    }

    pub fn id(&self) -> GroupId {
        self.group().id
    }

    pub fn depth(&self) -> usize {
        self.group().depth
    }

    pub fn before(self, filters: &str) -> Self {
        unwrap_config(self.try_before(filters))
    }

    pub fn try_before(self, filters: &str) -> Result<Self, RouterError> {
        self.router.pending[self.index].before.try_extend(filters)?;
        Ok(self)
    }

    pub fn after(self, filters: &str) -> Self {
        unwrap_config(self.try_after(filters))
    }

    pub fn try_after(self, filters: &str) -> Result<Self, RouterError> {
        self.router.pending[self.index].after.try_extend(filters)?;
        Ok(self)
    }

    /// Constrains a parameter on every route of the group, nested groups
    /// included.
    pub fn where_(self, name: &str, expr: &str) -> Self {
        unwrap_config(self.try_where(name, expr))
    }

    pub fn try_where(self, name: &str, expr: &str) -> Result<Self, RouterError> {
        let constraint = Constraint::new(name, expr)?;
        Ok(self.constrain(&[constraint]))
    }

    pub fn where_any<S: AsRef<str>>(self, name: &str, alternatives: &[S]) -> Self {
        unwrap_config(self.try_where_any(name, alternatives))
    }

    pub fn try_where_any<S: AsRef<str>>(
        self,
        name: &str,
        alternatives: &[S],
    ) -> Result<Self, RouterError> {
        let constraint = Constraint::any_of(name, alternatives)?;
        Ok(self.constrain(&[constraint]))
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
        Ok(self.constrain(&constraints))
    }

    fn constrain(self, constraints: &[Constraint]) -> Self {
        let span = self.router.pending[self.index].span.clone();
        for id in span {
            for constraint in constraints {
                self.router.routes[id].set_constraint(constraint.clone());
            }
        }
        self
    }
}
