//! Tests for the route table.

#[cfg(test)]
mod router_tests {
    use std::sync::{Arc, Mutex};

    use crate::parser::{HttpRequest, Method};
    use crate::router::{compare_patterns, path_segments, Params, Route, RouteTable, Segment};
    use crate::server::{HttpResponse, StatusCode};

    struct Case {
        route_method: &'static str,
        route_pattern: &'static str,
        method: &'static str,
        path: &'static str,
        matched: bool,
        params: &'static [(&'static str, &'static str)],
    }

    const fn case(
        route_method: &'static str,
        route_pattern: &'static str,
        method: &'static str,
        path: &'static str,
        matched: bool,
        params: &'static [(&'static str, &'static str)],
    ) -> Case {
        Case {
            route_method,
            route_pattern,
            method,
            path,
            matched,
            params,
        }
    }

    const CASES: &[Case] = &[
        // simple paths
        case("GET", "/one", "GET", "/one", true, &[]),
        case("GET", "/two", "GET", "/two", true, &[]),
        // method case
        case("get", "/methodcase", "GET", "/methodcase", true, &[]),
        case("Get", "/methodcase", "get", "/methodcase", true, &[]),
        case("GET", "/methodcase", "get", "/methodcase", true, &[]),
        case("GET", "/method1", "POST", "/method1", false, &[]),
        case("DELETE", "/method2", "GET", "/method2", false, &[]),
        // all methods
        case("*", "/all-methods", "GET", "/all-methods", true, &[]),
        case("*", "/all-methods", "POST", "/all-methods", true, &[]),
        case("*", "/all-methods", "PUT", "/all-methods", true, &[]),
        // nested
        case("GET", "/parent/child/one", "GET", "/parent/child/one", true, &[]),
        case("GET", "/parent/child/one", "GET", "/parent/child/two", false, &[]),
        // slashes
        case("GET", "slashes/one", "GET", "/slashes/one", true, &[]),
        case("GET", "/slashes/two", "GET", "slashes/two", true, &[]),
        case("GET", "slashes/three/", "GET", "/slashes/three", true, &[]),
        case("GET", "/slashes/four", "GET", "slashes/four/", true, &[]),
        // literal segments are case-sensitive
        case("GET", "/Case", "GET", "/case", false, &[]),
        // prefixes
        case("GET", "/prefix/", "GET", "/prefix/anything/else", true, &[]),
        case("GET", "/not-prefix", "GET", "/not-prefix/anything/else", false, &[]),
        case("GET", "/prefixdots...", "GET", "/prefixdots/anything/else", true, &[]),
        case("GET", "/prefixdots...", "GET", "/prefixdots", true, &[]),
        case("GET", "/prefixdots...", "GET", "/prefixdotsandmore", true, &[]),
        case("GET", "/prefixdots...", "GET", "/prefix", false, &[]),
        // path params
        case("GET", "/path-param/:id", "GET", "/path-param/123", true, &[("id", "123")]),
        case(
            "GET",
            "/path-params/:era/:group/:member",
            "GET",
            "/path-params/60s/beatles/lennon",
            true,
            &[("era", "60s"), ("group", "beatles"), ("member", "lennon")],
        ),
        case(
            "GET",
            "/path-params-prefix/:era/:group/:member/",
            "GET",
            "/path-params-prefix/60s/beatles/lennon/yoko",
            true,
            &[("era", "60s"), ("group", "beatles"), ("member", "lennon")],
        ),
        case(
            "GET",
            "/files/:user/docs...",
            "GET",
            "/files/ann/docs2024/report.txt",
            true,
            &[("user", "ann")],
        ),
        // segment counts
        case("GET", "/not/enough", "GET", "/not/enough/items", false, &[]),
        case("GET", "/not/enough/items", "GET", "/not/enough", false, &[]),
        case("GET", "/path-param/:id", "GET", "/path-param", false, &[]),
    ];

    #[test]
    fn test_match_cases() {
        for case in CASES {
            let mut table = RouteTable::new();
            table.register(case.route_method, case.route_pattern, ());

            let found = table.lookup(case.method, case.path);
            assert_eq!(
                found.is_some(),
                case.matched,
                "{} {} against {} {}",
                case.method,
                case.path,
                case.route_method,
                case.route_pattern
            );

            if let Some(found) = found {
                let expected: Params = case.params.iter().copied().collect();
                assert_eq!(found.params, expected, "params for {}", case.path);
            }
        }
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(path_segments("/"), vec![""]);
        assert_eq!(path_segments(""), vec![""]);
        assert_eq!(path_segments("/a/b/"), vec!["a", "b"]);
        assert_eq!(path_segments("a//b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_route_parsing() {
        let route = Route::new("Post", "/files/:user/docs...", ());
        assert_eq!(route.method(), "post");
        assert_eq!(route.pattern(), "/files/:user/docs...");
        assert!(route.is_prefix());
        assert_eq!(
            route.segments(),
            &[
                Segment::Literal("files".to_string()),
                Segment::Param("user".to_string()),
                Segment::Prefix("docs".to_string()),
            ]
        );

        assert!(Route::new("GET", "/dir/", ()).is_prefix());
        assert!(!Route::new("GET", "/dir", ()).is_prefix());
    }

    #[test]
    fn test_repeated_param_name_keeps_last_value() {
        let mut table = RouteTable::new();
        table.register("GET", "/:a/:a", ());

        let found = table.lookup("GET", "/x/y").unwrap();
        assert_eq!(found.params.get("a"), "y");
        assert_eq!(found.params.len(), 1);
    }

    fn patterns<H>(table: &RouteTable<H>) -> Vec<&str> {
        table.iter().map(Route::pattern).collect()
    }

    #[test]
    fn test_sort_order() {
        let registered = [
            "/:slug",
            "/",
            "/cool/balloon",
            "/cool/:slug",
            "/cool/another",
            "/rss/:ok",
            "/cool",
            "/rss.xml",
        ];
        let expected = vec![
            "/",
            "/cool",
            "/cool/another",
            "/cool/balloon",
            "/rss.xml",
            "/cool/:slug",
            "/rss/:ok",
            "/:slug",
        ];

        let mut forward = RouteTable::new();
        for pattern in registered {
            forward.register("GET", pattern, ());
        }
        assert_eq!(patterns(&forward), expected);

        let mut backward = RouteTable::new();
        for pattern in registered.iter().rev() {
            backward.register("GET", *pattern, ());
        }
        assert_eq!(patterns(&backward), expected);
    }

    #[test]
    fn test_compare_patterns_ignores_case_then_breaks_ties() {
        use std::cmp::Ordering;

        assert_eq!(compare_patterns("/About", "/blog"), Ordering::Less);
        assert_eq!(compare_patterns("/ABOUT", "/about"), Ordering::Less);
        assert_eq!(compare_patterns("/about", "/about"), Ordering::Equal);
        assert_eq!(compare_patterns("/zebra", "/a/:id"), Ordering::Less);
        assert_eq!(compare_patterns("/a/:id", "/:id"), Ordering::Less);
        assert_eq!(compare_patterns("/:a", "/:b"), Ordering::Less);
    }

    #[test]
    fn test_specific_routes_win() {
        let mut table = RouteTable::new();
        table.register("GET", "/:slug", "slug");
        table.register("GET", "/cool/:slug", "cool-slug");
        table.register("GET", "/cool/balloon", "balloon");
        table.register("GET", "/", "root");

        let handler = |path| table.lookup("GET", path).map(|m| *m.route.handler());
        assert_eq!(handler("/"), Some("root"));
        assert_eq!(handler("/anything"), Some("slug"));
        assert_eq!(handler("/cool/balloon"), Some("balloon"));
        assert_eq!(handler("/cool/other"), Some("cool-slug"));
        assert_eq!(handler("/cool/other/deeper"), None);
    }

    #[test]
    fn test_duplicate_registration_first_wins() {
        let mut table = RouteTable::new();
        table.register("GET", "/dup", "first");
        table.register("GET", "/dup", "second");

        assert_eq!(table.count(), 2);
        let found = table.lookup("GET", "/dup").unwrap();
        assert_eq!(*found.route.handler(), "first");
    }

    #[test]
    fn test_wildcard_and_specific_method_share_a_pattern() {
        let mut table = RouteTable::new();
        table.register("GET", "/route", "get");
        table.register("DELETE", "/route", "delete");
        table.register("*", "/route", "any");

        let handler = |method| table.lookup(method, "/route").map(|m| *m.route.handler());
        assert_eq!(handler("GET"), Some("get"));
        assert_eq!(handler("delete"), Some("delete"));
        assert_eq!(handler("PATCH"), Some("any"));
    }

    #[test]
    fn test_remove() {
        let mut table = RouteTable::new();
        table.register("GET", "/user", ());
        table.register("GET", "/user", ());
        table.register("POST", "/user", ());
        table.register("GET", "/user/", ());
        table.register("GET", "/account", ());
        assert_eq!(table.count(), 5);

        assert_eq!(table.remove("get", "/user"), 2);
        assert_eq!(table.count(), 3);
        assert!(table.lookup("GET", "/user").is_some(), "prefix route /user/ still matches");
        assert!(table.lookup("POST", "/user").is_some());

        assert_eq!(table.remove("GET", "/user/"), 1);
        assert!(table.lookup("GET", "/user").is_none());

        assert_eq!(table.remove("GET", "/missing"), 0);
        assert_eq!(table.count(), 2);
    }

    #[test]
    fn test_remove_adjacent_duplicates() {
        let mut table = RouteTable::new();
        for _ in 0..3 {
            table.register("GET", "/same", ());
        }
        table.register("GET", "/other", ());

        assert_eq!(table.remove("GET", "/same"), 3);
        assert_eq!(patterns(&table), vec!["/other"]);
    }

    #[test]
    fn test_remove_wildcard() {
        let mut table = RouteTable::new();
        table.register("*", "/all", ());
        table.register("GET", "/all", ());

        assert_eq!(table.remove("*", "/all"), 1);
        assert_eq!(table.iter().next().map(Route::method), Some("get"));
    }

    fn recording_table(log: &Arc<Mutex<Vec<String>>>) -> RouteTable {
        let mut table = RouteTable::new();
        for pattern in ["/one", "/two", "/user/:name"] {
            let log = Arc::clone(log);
            table.handle("GET", pattern, move |res: &mut HttpResponse, req: &HttpRequest| {
                log.lock().unwrap().push(format!("{pattern} name={}", req.param("name")));
                res.write_str(pattern);
            });
        }
        table
    }

    #[test]
    fn test_dispatch_invokes_only_the_matched_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let table = recording_table(&log);

        let mut res = HttpResponse::default();
        table.dispatch(&mut res, HttpRequest::new(Method::GET, "/one"));

        assert_eq!(res.status, StatusCode::Ok);
        assert_eq!(res.body_string(), "/one");
        assert_eq!(*log.lock().unwrap(), vec!["/one name=".to_string()]);
    }

    #[test]
    fn test_dispatch_attaches_params() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let table = recording_table(&log);

        let mut res = HttpResponse::default();
        table.dispatch(&mut res, HttpRequest::new(Method::GET, "/user/john?tab=posts"));

        assert_eq!(*log.lock().unwrap(), vec!["/user/:name name=john".to_string()]);
    }

    #[test]
    fn test_dispatch_decodes_escaped_path() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let table = recording_table(&log);

        let mut res = HttpResponse::default();
        table.dispatch(&mut res, HttpRequest::new(Method::GET, "/user/John%20Doe"));
        table.dispatch(&mut res, HttpRequest::new(Method::GET, "/%6Fne"));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["/user/:name name=John Doe".to_string(), "/one name=".to_string()]
        );
    }

    #[test]
    fn test_lookup_binds_params() {
        let mut table = RouteTable::new();
        assert!(table.is_empty());
        table.register("GET", "/:org/repos/:repo", ());
        assert!(!table.is_empty());

        let found = table.lookup("get", "/rust-lang/repos/cargo").unwrap();
        assert!(found.params.contains("org"));
        assert!(!found.params.contains("repos"));

        let mut bound: Vec<_> = found.params.iter().collect();
        bound.sort();
        assert_eq!(bound, vec![("org", "rust-lang"), ("repo", "cargo")]);

        assert!(table.lookup("GET", "/rust-lang/issues/cargo").is_none());
    }

    #[test]
    fn test_dispatch_falls_back_to_not_found() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let table = recording_table(&log);

        let mut res = HttpResponse::default();
        table.dispatch(&mut res, HttpRequest::new(Method::POST, "/one"));

        assert_eq!(res.status, StatusCode::NotFound);
        assert_eq!(res.body_string(), "404 page not found\n");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_not_found() {
        let mut table: RouteTable = RouteTable::new();
        table.set_not_found(|res: &mut HttpResponse, req: &HttpRequest| {
            res.set_status(StatusCode::NotFound);
            res.write_str(&format!("nothing at {}", req.route_path()));
        });

        let mut res = HttpResponse::default();
        table.dispatch(&mut res, HttpRequest::new(Method::GET, "/missing?x=1"));

        assert_eq!(res.status, StatusCode::NotFound);
        assert_eq!(res.body_string(), "nothing at /missing");
    }

    #[test]
    fn test_removed_route_falls_through() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table = recording_table(&log);
        assert_eq!(table.remove("GET", "/two"), 1);

        let mut res = HttpResponse::default();
        table.dispatch(&mut res, HttpRequest::new(Method::GET, "/two"));

        assert_eq!(res.status, StatusCode::NotFound);
        assert_eq!(table.count(), 2);
    }

    #[test]
    fn test_route_listing_serializes() {
        let mut table = RouteTable::new();
        table.register("GET", "/static/", ());

        let listing = serde_json::to_value(table.routes()).unwrap();
        assert_eq!(
            listing,
            serde_json::json!([{ "method": "get", "pattern": "/static/", "prefix": true }])
        );
    }
}
