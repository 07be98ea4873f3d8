#![cfg(feature = "hyper-service")]

use enhanced_router::hyper_service::{BoxHandler, FilterRegistry, Params, RouterService};
use enhanced_router::{GroupAttributes, Router, RouterError};

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::service::Service;
use hyper::{Body, Request, Response, StatusCode};

async fn echo(_: Request<Body>, params: Params) -> Result<Response<Body>, Infallible> {
    let body: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    Ok(Response::new(Body::from(body.join("&"))))
}

async fn not_found(_: Request<Body>, _: Params) -> Result<Response<Body>, Infallible> {
    let mut res = Response::new(Body::from("not found"));
    *res.status_mut() = StatusCode::NOT_FOUND;
    Ok(res)
}

fn handler<F, Fut>(f: F) -> BoxHandler
where
    F: Fn(Request<Body>, Params) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Response<Body>, Infallible>> + Send + 'static,
{
    Box::new(f)
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(service: &mut RouterService, req: Request<Body>) -> (StatusCode, Response<Body>, String) {
    let res = service.call(req).await.unwrap();
    let status = res.status();
    let (parts, body) = res.into_parts();
    let bytes = hyper::body::to_bytes(body).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    (status, Response::from_parts(parts, Body::empty()), text)
}

fn registry(calls: Arc<AtomicUsize>) -> FilterRegistry {
    let mut filters = FilterRegistry::new();
    filters
        .before("auth", |req, _, _| {
            if req.headers().contains_key("authorization") {
                None
            } else {
                let mut res = Response::new(Body::from("unauthorized"));
                *res.status_mut() = StatusCode::UNAUTHORIZED;
                Some(res)
            }
        })
        .before("count", move |_, _, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            None
        })
        .before("only", |_, params, args| {
            let id = params.get("id").unwrap_or_default();
            if args.contains(&id) {
                None
            } else {
                let mut res = Response::new(Body::empty());
                *res.status_mut() = StatusCode::FORBIDDEN;
                Some(res)
            }
        })
        .after("tag", |res, args| {
            let value = args.join(",");
            res.headers_mut()
                .insert("x-tag", value.parse().unwrap());
        });
    filters
}

fn router() -> Router<BoxHandler> {
    let mut router: Router<BoxHandler> = Router::new();
    router.on(vec!["post"], "count");
    router.get("/open/:name", handler(echo)).after("tag:open");
    router
        .group(GroupAttributes::new().prefix("/admin").before("auth"), |admin| {
            admin
                .group(GroupAttributes::new().before("count"), |users| {
                    users.get("/users/:id", handler(echo)).before("only:1,2");
                    users.post("/users", handler(echo));
                })
                .after("tag:users");
        })
        .after("tag:admin");
    router
}

#[tokio::test]
async fn routes_through_groups_and_filters() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service = RouterService::new(router(), registry(calls.clone()), handler(not_found)).unwrap();

    let mut req = request("GET", "/admin/users/2");
    req.headers_mut().insert("authorization", "token".parse().unwrap());
    let (status, res, body) = send(&mut service, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "id=2");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // outer after filters run first, so the inner tag is written last
    let tags: Vec<_> = res.headers().get_all("x-tag").iter().collect();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0], "users");
}

#[tokio::test]
async fn before_filter_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service = RouterService::new(router(), registry(calls.clone()), handler(not_found)).unwrap();

    let (status, _, body) = send(&mut service, request("GET", "/admin/users/2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "unauthorized");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn filter_arguments_are_passed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service = RouterService::new(router(), registry(calls), handler(not_found)).unwrap();

    let mut req = request("GET", "/admin/users/3");
    req.headers_mut().insert("authorization", "token".parse().unwrap());
    let (status, _, _) = send(&mut service, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, res, body) = send(&mut service, request("GET", "/open/bob")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "name=bob");
    assert_eq!(res.headers()["x-tag"], "open");
}

#[tokio::test]
async fn verb_filters_run_first() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service = RouterService::new(router(), registry(calls.clone()), handler(not_found)).unwrap();

    let (status, _, _) = send(&mut service, request("POST", "/admin/users")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unmatched_requests_use_default_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service = RouterService::new(router(), registry(calls), handler(not_found)).unwrap();

    let (status, _, body) = send(&mut service, request("GET", "/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "not found");

    let (status, _, _) = send(&mut service, request("DELETE", "/open/bob")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn unknown_filters_are_rejected() {
    let mut router: Router<BoxHandler> = Router::new();
    router.get("/a", handler(echo)).before("missing:1");

    match RouterService::new(router, FilterRegistry::new(), handler(not_found)) {
        Err(RouterError::UnknownFilter { name }) => assert_eq!(name, "missing"),
        _ => panic!("unknown filter was accepted"),
    }

    let mut router: Router<BoxHandler> = Router::new();
    router.on(vec!["get"], "count");
    router.get("/a", handler(echo));
    assert!(RouterService::new(router, FilterRegistry::new(), handler(not_found)).is_err());
}
