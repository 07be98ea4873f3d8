#![forbid(unsafe_code)]

mod filters;
mod handler;
mod params;
mod service;

pub use self::filters::{AfterFn, BeforeFn, FilterRegistry};
pub use self::handler::{BoxHandler, Handler};
pub use self::params::Params;
pub use self::service::RouterService;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

pub type Request = hyper::Request<hyper::Body>;
pub type Response = hyper::Response<hyper::Body>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type BoxError = Box<dyn StdError + Send + Sync>;
