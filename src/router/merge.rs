use super::{join_paths, OpenGroup, Router};

use crate::filter::FilterList;
use crate::group::{GroupAttributes, GroupId, GroupMut, RouteGroup};
use crate::http_router::HttpRouter;
use crate::route::RouteId;

use std::collections::HashMap;
use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

impl<T> Router<T> {
    /// Declares a group of routes sharing `attributes`.
    ///
    /// Every route registered by `f`, directly or through nested groups, gets
    /// the group prefix and constraints right away. The group filters are
    /// applied by the next [`merge_groups`](Router::merge_groups).
    pub fn group(&mut self, attributes: GroupAttributes, f: impl FnOnce(&mut Self)) -> GroupMut<'_, T> {
        let ret = self.try_group(attributes, |router| {
            f(router);
            Ok::<(), Infallible>(())
        });
        match ret {
            Ok(group) => group,
            Err(never) => match never {},
        }
    }

    /// Like [`group`](Router::group), with a fallible callback.
    ///
    /// When `f` fails, every route and group it registered is discarded and
    /// the error is returned unchanged. A panic in `f` discards them the
    /// same way before it resumes.
    pub fn try_group<F, E>(&mut self, attributes: GroupAttributes, f: F) -> Result<GroupMut<'_, T>, E>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
    {
        let GroupAttributes {
            prefix,
            before,
            after,
            constraints,
        } = attributes;

        let id = GroupId(self.next_group);
        self.next_group += 1;

        let depth = self.open.len();
        let parent = self.open.last().map(|g| g.id);
        let prefix = match prefix {
            Some(ref p) => join_paths(self.current_prefix(), p),
            None => self.current_prefix().to_owned(),
        };

        let high_water = self.routes.len();
        let pending_len = self.pending.len();

        self.open.push(OpenGroup { id, prefix });
        let ret = panic::catch_unwind(AssertUnwindSafe(|| f(self)));

        let ret = match ret {
            Ok(ret) => ret,
            Err(payload) => {
                self.open.truncate(depth);
                self.discard(high_water, pending_len);
                debug!(group = id.0, depth, "route group callback panicked");
                panic::resume_unwind(payload)
            }
        };

        let closed = self.open.pop().map(|g| g.id);
        assert_eq!(closed, Some(id), "route group stack is corrupted");

        if let Err(e) = ret {
            self.discard(high_water, pending_len);
            debug!(group = id.0, depth, "discarded route group");
            return Err(e);
        }

        let mut routes: Vec<RouteId> = Vec::new();
        for route in &mut self.routes[high_water..] {
            for constraint in &constraints {
                if !route.has_constraint(constraint.name()) {
                    route.set_constraint(constraint.clone());
                }
            }
            if route.group.is_none() {
                route.group = Some(id);
                routes.push(route.id);
            }
        }

        debug!(
            group = id.0,
            depth,
            routes = routes.len(),
            nested = self.pending.len() - pending_len,
            "defined route group"
        );

        self.pending.push(RouteGroup {
            id,
            parent,
            depth,
            routes,
            span: high_water..self.routes.len(),
            before,
            after,
        });

        let index = self.pending.len() - 1;
        Ok(GroupMut {
            router: self,
            index,
        })
    }

    fn discard(&mut self, high_water: usize, pending_len: usize) {
        self.routes.truncate(high_water);
        self.pending.truncate(pending_len);
        self.rebuild_names();
    }

    /// Folds pending group filters onto their routes and recompiles the
    /// lookup table.
    ///
    /// Each grouped route ends up with the filters of its outermost group
    /// first, then each inner group in turn, then the filters attached to
    /// the route itself, without duplicates. Does nothing when no group is
    /// pending and no route was added since the last merge.
    ///
    /// # Panics
    /// Panics when called from inside a group callback, or when a pending
    /// group's ancestry disagrees with its recorded depth.
    pub fn merge_groups(&mut self) {
        assert!(
            self.open.is_empty(),
            "route groups can not be merged while a group is being defined"
        );

        if self.pending.is_empty() && self.compiled == self.routes.len() {
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        let index: HashMap<GroupId, usize> = pending
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id, i))
            .collect();

        for group in &pending {
            let chain = ancestors(&pending, &index, group);
            assert_eq!(
                chain.len(),
                group.depth,
                "route group {} has depth {} but {} enclosing groups are pending",
                group.id.0,
                group.depth,
                chain.len(),
            );

            for &id in &group.routes {
                let route = &mut self.routes[id.0];
                assert_eq!(route.group, Some(group.id), "route group membership is corrupted");

                let mut before = FilterList::new();
                let mut after = FilterList::new();
                for g in chain.iter().copied().chain(Some(group)) {
                    before.extend_from(&g.before);
                    after.extend_from(&g.after);
                }
                before.extend_from(&route.before);
                after.extend_from(&route.after);

                route.before = before;
                route.after = after;
            }
        }

        let mut table = HttpRouter::new();
        for route in &self.routes {
            for method in &route.methods {
                table.insert(method.clone(), &route.pattern, route.id);
            }
        }
        self.table = table;
        self.compiled = self.routes.len();

        debug!(
            groups = pending.len(),
            routes = self.routes.len(),
            "merged route groups"
        );
    }
}

/// Enclosing groups of `group`, outermost first.
fn ancestors<'g>(
    pending: &'g [RouteGroup],
    index: &HashMap<GroupId, usize>,
    group: &RouteGroup,
) -> Vec<&'g RouteGroup> {
    let mut chain: Vec<&'g RouteGroup> = Vec::with_capacity(group.depth);
    let mut parent = group.parent;
    while let Some(id) = parent {
        let i = match index.get(&id) {
            Some(&i) => i,
            None => panic!(
                "route group {} refers to group {} which is not pending",
                group.id.0, id.0
            ),
        };
        assert!(
            chain.len() < group.depth,
            "route group {} has more enclosing groups than its depth {}",
            group.id.0,
            group.depth,
        );
        chain.push(&pending[i]);
        parent = pending[i].parent;
    }
    chain.reverse();
    chain
}
