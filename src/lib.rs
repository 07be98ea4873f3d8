#![deny(unsafe_code)]

mod bitset;
mod error;
mod filter;
mod group;
mod http_router;
mod matcher;
mod route;
mod router;
mod strmap;

pub use self::error::RouterError;
pub use self::filter::{filter_parts, FilterList, IntoFilterList, VerbFilters};
pub use self::group::{GroupAttributes, GroupId, GroupMut, RouteGroup};
pub use self::http_router::{HttpRouter, Method};
pub use self::matcher::{Captures, PathMatcher};
pub use self::route::{Constraint, Route, RouteId, RouteMut};
pub use self::router::{Matched, Router};

#[cfg(feature = "hyper-service")]
pub mod hyper_service;
