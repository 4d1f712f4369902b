use pathtrie::{
    router::{ConstraintCompiler, ParamMatcher, ParamValues, PatternSyntax, Router, Store},
    MatchPriority, RouterConfig,
};

use http::Method;

fn example_table() -> Router<&'static str> {
    let mut router = Router::new();
    router.get("/", "root_handler").unwrap();
    router.get("/zoo/animals", "get_animals").unwrap();
    router.post("/zoo/animals", "create_animal").unwrap();
    router.get("/zoo/animals/:id", "get_animal").unwrap();
    router.put("/zoo/animals/:id", "update_animal").unwrap();
    router.patch("/zoo/animals/:id", "patch_animal").unwrap();
    router.delete("/zoo/animals/:id", "delete_animal").unwrap();
    router.head("/zoo/health", "health_check").unwrap();
    router.options("/zoo/health", "supported_ops").unwrap();
    router.trace("/zoo/health", "trace_route").unwrap();
    router.connect("/zoo/tunnel", "open_tunnel").unwrap();
    router
}

fn assert_route_match(router: &Router<&'static str>, method: Method, path: &str, expected: &str) {
    match router.find(&method, path) {
        Some(m) => assert_eq!(
            *m.payload, expected,
            "Handler mismatch for {method} {path}: expected '{expected}', got '{}'",
            m.payload
        ),
        None => assert_eq!(
            expected, "<none>",
            "Expected route to match for {method} {path}"
        ),
    }
}

#[test]
fn test_router_verbs() {
    let router = example_table();
    assert_route_match(&router, Method::GET, "/zoo/animals", "get_animals");
    assert_route_match(&router, Method::POST, "/zoo/animals", "create_animal");
    assert_route_match(&router, Method::GET, "/zoo/animals/123", "get_animal");
    assert_route_match(&router, Method::PUT, "/zoo/animals/123", "update_animal");
    assert_route_match(&router, Method::PATCH, "/zoo/animals/123", "patch_animal");
    assert_route_match(&router, Method::DELETE, "/zoo/animals/123", "delete_animal");
    assert_route_match(&router, Method::HEAD, "/zoo/health", "health_check");
    assert_route_match(&router, Method::OPTIONS, "/zoo/health", "supported_ops");
    assert_route_match(&router, Method::TRACE, "/zoo/health", "trace_route");
    assert_route_match(&router, Method::CONNECT, "/zoo/tunnel", "open_tunnel");
}

#[test]
fn test_router_unknown_path_and_root() {
    let router = example_table();
    assert_route_match(&router, Method::GET, "/unknown", "<none>");
    assert_route_match(&router, Method::GET, "/", "root_handler");
    assert_route_match(&router, Method::POST, "/zoo/animals/1", "<none>");
}

#[test]
fn test_exact_static_match() {
    let mut router = Router::new();
    router.get("/users/new", "H1").unwrap();
    let m = router.find(&Method::GET, "/users/new").unwrap();
    assert_eq!(*m.payload, "H1");
    assert!(m.path_params.is_empty());
}

#[test]
fn test_parameter_capture() {
    let mut router = Router::new();
    assert_eq!(router.get("/users/:id", "H2").unwrap(), 1);
    let m = router.find(&Method::GET, "/users/42").unwrap();
    assert_eq!(*m.payload, "H2");
    assert_eq!(m.path_params.len(), 1);
    assert_eq!(&*m.path_params[0].0, "id");
    assert_eq!(m.path_params[0].1, "42");
}

#[test]
fn test_static_precedes_param_in_either_order() {
    for static_first in [true, false] {
        let mut router = Router::new();
        if static_first {
            router.get("/users/new", "H1").unwrap();
            router.get("/users/:id", "H2").unwrap();
        } else {
            router.get("/users/:id", "H2").unwrap();
            router.get("/users/new", "H1").unwrap();
        }
        assert_route_match(&router, Method::GET, "/users/new", "H1");
        assert_route_match(&router, Method::GET, "/users/7", "H2");
    }
}

#[test]
fn test_insertion_order_tie_break() {
    let mut router = Router::new();
    router.get("/a/:x", "H3").unwrap();
    router.get("/a/:y", "H4").unwrap();
    let m = router.find(&Method::GET, "/a/1").unwrap();
    assert_eq!(*m.payload, "H3");
    assert_eq!(m.get_path_param("x"), Some("1"));
    assert_eq!(m.get_path_param("y"), None);
}

#[test]
fn test_wildcard_capture() {
    let mut router = Router::new();
    router.get("/files/*", "H5").unwrap();
    let m = router.find(&Method::GET, "/files/a/b/c").unwrap();
    assert_eq!(*m.payload, "H5");
    assert_eq!(m.get_path_param("*"), Some("a/b/c"));

    let m = router.find(&Method::GET, "/files/").unwrap();
    assert_eq!(m.get_path_param("*"), Some(""));
}

#[test]
fn test_no_match_on_empty_and_unrelated_store() {
    let empty: Router<&'static str> = Router::new();
    assert!(empty.find(&Method::GET, "/unregistered/path").is_none());

    let mut router = Router::new();
    router.get("/users", "list").unwrap();
    assert!(router.find(&Method::GET, "/unregistered/path").is_none());
}

#[test]
fn test_idempotent_read() {
    let router = example_table();
    let first = router.find(&Method::GET, "/zoo/animals/9").unwrap();
    let second = router.find(&Method::GET, "/zoo/animals/9").unwrap();
    assert!(std::ptr::eq(first.payload, second.payload));
    assert_eq!(first.path_params, second.path_params);
}

#[test]
fn test_regex_rejection_falls_through() {
    let mut router = Router::new();
    router.get("/items/<id:[0-9]+>", "numeric").unwrap();
    assert_route_match(&router, Method::GET, "/items/123", "numeric");
    assert_route_match(&router, Method::GET, "/items/abc", "<none>");
    assert_route_match(&router, Method::GET, "/items/123abc", "<none>");

    router.get("/items/:slug", "by_slug").unwrap();
    assert_route_match(&router, Method::GET, "/items/abc", "by_slug");
    assert_route_match(&router, Method::GET, "/items/123", "numeric");
}

#[test]
fn test_registration_priority_config() {
    let config = RouterConfig {
        priority: MatchPriority::Registration,
        ..RouterConfig::default()
    };
    let mut router = Router::with_config(config);
    router.get("/users/:id", "H2").unwrap();
    router.get("/users/new", "H1").unwrap();
    assert_route_match(&router, Method::GET, "/users/new", "H2");
}

#[test]
fn test_braces_syntax() {
    let config = RouterConfig {
        syntax: PatternSyntax::braces(),
        ..RouterConfig::default()
    };
    let mut router = Router::with_config(config);
    router.get("/pets/{id:[0-9]{1,3}}", "get_pet").unwrap();
    router.get("/owners/:owner/pets", "owner_pets").unwrap();

    let m = router.find(&Method::GET, "/pets/42").unwrap();
    assert_eq!(m.get_path_param("id"), Some("42"));
    assert!(router.find(&Method::GET, "/pets/4242").is_none());
    assert_route_match(&router, Method::GET, "/owners/ada/pets", "owner_pets");
}

#[test]
fn test_store_used_directly() {
    let mut store = Store::new();
    assert_eq!(store.add("/users/:id/posts/:post", 1u8).unwrap(), 2);
    assert_eq!(store.add("/users/:id/posts/:post", 2u8).unwrap(), 2);
    assert_eq!(store.duplicates(), 1);

    let mut values = ParamValues::new();
    let found = store.get("/users/5/posts/6", &mut values).unwrap();
    assert_eq!(*found.payload, 1);
    let names: Vec<&str> = found.names.iter().map(|n| n.as_ref()).collect();
    assert_eq!(names, ["id", "post"]);
    assert_eq!(&values[..2], ["5", "6"]);
}

/// Constraint compiler that only accepts a literal word list, no regex involved.
#[derive(Clone)]
struct OneOf;

struct Words(Vec<String>);

impl ParamMatcher for Words {
    fn match_anchored(&self, text: &str) -> Option<usize> {
        self.0
            .iter()
            .filter(|w| text.starts_with(w.as_str()))
            .map(String::len)
            .max()
    }
}

impl ConstraintCompiler for OneOf {
    type Matcher = Words;

    fn compile(&self, source: &str) -> Result<Words, String> {
        if source.is_empty() {
            return Err("empty word list".to_string());
        }
        Ok(Words(source.split('|').map(str::to_string).collect()))
    }
}

#[test]
fn test_injected_constraint_compiler() {
    let mut router = Router::with_compiler(OneOf, RouterConfig::default());
    router.get("/colors/<c:red|green>", "color").unwrap();
    let m = router.find(&Method::GET, "/colors/green").unwrap();
    assert_eq!(m.get_path_param("c"), Some("green"));
    assert!(router.find(&Method::GET, "/colors/blue").is_none());
}
