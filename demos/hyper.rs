use enhanced_router::hyper_service::{BoxHandler, FilterRegistry, Params, RouterService};
use enhanced_router::{GroupAttributes, Router};

use std::convert::Infallible as Never;

use hyper::service::make_service_fn;
use hyper::{Body, Request, Response, StatusCode};

async fn not_found(_: Request<Body>, _: Params) -> Result<Response<Body>, Never> {
    let mut res = Response::new(Body::from("404 Not Found"));
    *res.status_mut() = StatusCode::NOT_FOUND;
    Ok(res)
}

async fn hello(_: Request<Body>, params: Params) -> Result<Response<Body>, Never> {
    let name = params.get("name").unwrap_or("world");
    Ok(Response::new(Body::from(format!("hello, {}!", name))))
}

async fn file(_: Request<Body>, params: Params) -> Result<Response<Body>, Never> {
    let path = params.get("filepath").unwrap_or_default();
    Ok(Response::new(Body::from(format!("access file: {}", path))))
}

#[tokio::main(basic_scheduler)]
async fn main() {
    let mut router: Router<BoxHandler> = Router::new();
    router.get("/hello/:name", Box::new(hello));
    router
        .group(GroupAttributes::new().prefix("/api/v1"), |api| {
            api.group(GroupAttributes::new().prefix("/file"), |files| {
                files.get("/*filepath", Box::new(file));
            })
            .before("log");
        })
        .before("auth");

    let mut filters = FilterRegistry::new();
    filters
        .before("auth", |req, _, _| {
            if req.headers().contains_key("authorization") {
                None
            } else {
                let mut res = Response::new(Body::from("401 Unauthorized"));
                *res.status_mut() = StatusCode::UNAUTHORIZED;
                Some(res)
            }
        })
        .before("log", |req, _, _| {
            println!("{} {}", req.method(), req.uri().path());
            None
        });

    let service = RouterService::new(router, filters, Box::new(not_found) as BoxHandler).unwrap();

    let make = make_service_fn(|_| {
        let service = service.clone();
        async move { Ok::<_, Never>(service) }
    });

    let addr = "127.0.0.1:3000";

    let server = hyper::Server::bind(&addr.parse().unwrap()).serve(make);

    println!("Server is listening on: http://{}", addr);
    println!("hello: http://{}/hello/world", addr);
    println!("api: http://{}/api/v1/file/path/to/public/file", addr);
    println!("404: http://{}/other/path", addr);
    println!();

    server.await.unwrap();
}
