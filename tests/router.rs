use enhanced_router::{Method, Router, RouterError};

#[test]
fn router_dispatch_merges_first() {
    let mut router: Router<usize> = Router::new();
    router.get("/hello/:name", 1);

    assert!(router.find(&Method::GET, "/hello/world").is_none());

    {
        let matched = router.dispatch(&Method::GET, "/hello/world").unwrap();
        assert_eq!(*matched.data(), 1);
        assert_eq!(matched.captures().get("name"), Some("world"));
    }

    assert!(router.find(&Method::GET, "/hello/world").is_some());
}

#[test]
fn router_methods() {
    let mut router: Router<usize> = Router::new();
    router.get("/r", 1);
    router.post("/r", 2);
    router.put("/r", 3);
    router.patch("/r", 4);
    router.delete("/r", 5);
    router.options("/r", 6);
    router.any("/any", 7);
    router.route(vec![Method::TRACE, Method::TRACE], "/trace", 8);
    router.merge_groups();

    let cases = [
        (Method::GET, 1),
        (Method::HEAD, 1),
        (Method::POST, 2),
        (Method::PUT, 3),
        (Method::PATCH, 4),
        (Method::DELETE, 5),
        (Method::OPTIONS, 6),
    ];
    for (method, data) in cases.iter() {
        assert_eq!(*router.find(method, "/r").unwrap().data(), *data);
    }

    for method in &[
        Method::GET,
        Method::HEAD,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ] {
        assert_eq!(*router.find(method, "/any").unwrap().data(), 7);
    }
    assert!(router.find(&Method::OPTIONS, "/any").is_none());

    let trace = router.find(&Method::TRACE, "/trace").unwrap();
    assert_eq!(trace.route().methods(), &[Method::TRACE]);
}

#[test]
fn router_allowed_methods() {
    let mut router: Router<usize> = Router::new();
    router.post("/items", 1);
    router.put("/items", 2);
    router.delete("/other", 3);
    router.merge_groups();

    let mut allowed = router.allowed_methods("/items");
    allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(allowed, vec![Method::POST, Method::PUT]);
}

#[test]
fn router_invalid_registration() {
    let mut router: Router<usize> = Router::new();

    match router.try_get("/a/*rest/b", 1) {
        Err(RouterError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "/a/*rest/b"),
        _ => panic!("invalid pattern was accepted"),
    }
    assert!(matches!(
        router.try_route(Vec::new(), "/a", 1),
        Err(RouterError::InvalidVerb { .. })
    ));
    assert!(router.is_empty());
}

#[test]
#[should_panic(expected = "capture name can not be empty")]
fn router_invalid_registration_panics() {
    let mut router: Router<usize> = Router::new();
    router.get("/a/:", 1);
}

#[test]
fn router_named_routes() {
    let mut router: Router<usize> = Router::new();
    router.get("/users", 1).name("users.index");
    router.get("/users/:id", 2).name("users.show");

    assert_eq!(*router.named("users.index").unwrap().data(), 1);
    assert_eq!(router.named("users.show").unwrap().pattern(), "/users/:id");
    assert!(router.named("users.edit").is_none());

    router.get("/people/:id", 3).name("users.show");
    assert_eq!(*router.named("users.show").unwrap().data(), 3);
    assert_eq!(router.len(), 3);
}

#[test]
fn router_rename_route() {
    let mut router: Router<usize> = Router::new();
    let id = router.get("/a", 1).name("first").id();
    router.get_route_mut(id).unwrap().name("second");

    assert!(router.named("first").is_none());
    assert_eq!(router.named("second").unwrap().id(), id);
    assert_eq!(router.get_route(id).unwrap().name(), Some("second"));
}

#[test]
fn router_constraints() {
    let mut router: Router<usize> = Router::new();
    router.get("/users/:id", 1).where_("id", "[0-9]+");
    router.get("/users/:name", 2);
    router.merge_groups();

    let matched = router.find(&Method::GET, "/users/42").unwrap();
    assert_eq!(*matched.data(), 1);

    let matched = router.find(&Method::GET, "/users/bob").unwrap();
    assert_eq!(*matched.data(), 2);
    assert_eq!(matched.captures().get("name"), Some("bob"));
}

#[test]
fn router_constraints_are_anchored() {
    let mut router: Router<usize> = Router::new();
    router.get("/posts/:slug", 1).where_("slug", "[a-z]+");

    assert!(router.dispatch(&Method::GET, "/posts/hello").is_some());
    assert!(router.dispatch(&Method::GET, "/posts/hello42").is_none());
}

#[test]
fn router_invalid_constraint() {
    let mut router: Router<usize> = Router::new();
    let ret = router.get("/users/:id", 1).try_where("id", "[0-9");
    assert!(matches!(ret, Err(RouterError::InvalidConstraint { .. })));
}

#[test]
fn router_route_filters() {
    let mut router: Router<usize> = Router::new();
    router
        .post("/comments", 1)
        .before("auth|csrf")
        .before("auth")
        .after("log");
    router.on(vec!["post"], "throttle:60,1");

    let matched = router.dispatch(&Method::POST, "/comments").unwrap();
    assert_eq!(
        matched.before_filters().to_vec(),
        ["throttle:60,1", "auth", "csrf"]
    );
    assert_eq!(matched.after_filters().to_vec(), ["log"]);
    assert_eq!(matched.route().before_filters().to_vec(), ["auth", "csrf"]);
}

#[test]
fn router_invalid_route_filter() {
    let mut router: Router<usize> = Router::new();
    assert!(matches!(
        router.get("/a", 1).try_before("auth|"),
        Err(RouterError::InvalidFilter { .. })
    ));
    assert!(matches!(
        router.get("/b", 2).try_after("has space"),
        Err(RouterError::InvalidFilter { .. })
    ));
    assert!(router
        .routes()
        .all(|r| r.before_filters().is_empty() && r.after_filters().is_empty()));
}

#[test]
fn router_routes_after_merge_need_another_merge() {
    let mut router: Router<usize> = Router::new();
    router.get("/a", 1);
    router.merge_groups();
    router.get("/b", 2);

    assert!(router.find(&Method::GET, "/b").is_none());
    router.merge_groups();
    assert_eq!(*router.find(&Method::GET, "/b").unwrap().data(), 2);
    assert_eq!(*router.find(&Method::GET, "/a").unwrap().data(), 1);
}

#[test]
fn router_constraint_lists_and_maps() {
    let mut router: Router<usize> = Router::new();
    router
        .get("/feed/:format", 1)
        .where_any("format", &["rss", "atom"]);
    router
        .get("/archive/:year/:month", 2)
        .wheres(vec![("year", "[0-9]{4}"), ("month", "[0-9]{2}")]);
    router.merge_groups();

    let feed = router.find(&Method::GET, "/feed/atom").unwrap();
    assert_eq!(feed.route().constraints()[0].expr(), "(rss|atom)");
    drop(feed);
    assert!(router.find(&Method::GET, "/feed/json").is_none());

    assert!(router.find(&Method::GET, "/archive/2020/01").is_some());
    assert!(router.find(&Method::GET, "/archive/20/01").is_none());

    let ret = router.get("/tags/:tag", 3).try_where_any("tag", &["(unclosed"]);
    assert!(matches!(ret, Err(RouterError::InvalidConstraint { .. })));
}
