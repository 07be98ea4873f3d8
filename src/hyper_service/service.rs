use super::filters::{AfterFn, FilterRegistry};
use super::handler::{BoxHandler, Handler};
use super::params::Params;
use super::{BoxError, BoxFuture, Request, Response};

use crate::error::RouterError;
use crate::filter::filter_parts;
use crate::router::Router;

use std::future;
use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::service::Service;
use smallvec::SmallVec;
use tracing::trace;

/// A hyper service over a merged [`Router`].
///
/// The router is merged once on construction and shared read-only between
/// clones, so one service can be handed to every connection.
pub struct RouterService<H = BoxHandler> {
    shared: Arc<Shared<H>>,
}

struct Shared<H> {
    router: Router<H>,
    filters: FilterRegistry,
    default: H,
}

impl<H> Clone for RouterService<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H> RouterService<H> {
    /// Merges `router` and checks that every filter it references is
    /// registered. `default` handles requests no route accepts.
    pub fn new(
        mut router: Router<H>,
        filters: FilterRegistry,
        default: H,
    ) -> Result<Self, RouterError> {
        router.merge_groups();
        filters.check(&router)?;
        Ok(Self {
            shared: Arc::new(Shared {
                router,
                filters,
                default,
            }),
        })
    }

    pub fn router(&self) -> &Router<H> {
        &self.shared.router
    }
}

impl<H> Service<Request> for RouterService<H>
where
    H: Handler + Send + Sync,
{
    type Response = Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Response, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        self.shared.handle(req)
    }
}

impl<H: Handler> Shared<H> {
    fn handle(&self, req: Request) -> BoxFuture<'static, Result<Response, BoxError>> {
        let path = req.uri().path().to_owned();
        let matched = match self.router.find(req.method(), &path) {
            Some(m) => m,
            None => {
                trace!(method = %req.method(), path = %path, "no route matched");
                return self.default.call(req, Params::empty());
            }
        };
        let params = Params::from_captures(matched.captures());

        let before = matched.before_filters();
        for filter in before.iter() {
            let (name, args) = filter_parts(filter);
            if let Some(f) = self.filters.get_before(name) {
                if let Some(res) = (**f)(&req, &params, &args[..]) {
                    trace!(filter, path = %path, "request stopped by before filter");
                    return Box::pin(future::ready(Ok(res)));
                }
            }
        }

        let after: Vec<(Arc<AfterFn>, Vec<String>)> = matched
            .after_filters()
            .iter()
            .filter_map(|filter| {
                let (name, args) = filter_parts(filter);
                let f = self.filters.get_after(name)?;
                Some((Arc::clone(f), args.iter().map(|&a| a.to_owned()).collect()))
            })
            .collect();

        let fut = matched.data().call(req, params);
        Box::pin(async move {
            let mut res = fut.await?;
            for (f, args) in after {
                let args: SmallVec<[&str; 4]> = args.iter().map(String::as_str).collect();
                (*f)(&mut res, &args[..]);
            }
            Ok(res)
        })
    }
}
