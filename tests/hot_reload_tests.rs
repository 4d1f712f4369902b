use http::Method;
use pathtrie::{
    hot_reload::{reload_routes, watch_routes},
    load_router,
    router::SharedRouter,
};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::temp_files;

const TABLE_V1: &str = r#"
routes:
  - { method: GET, path: /foo, handler: foo_one }
"#;

const TABLE_V2: &str = r#"
routes:
  - { method: GET, path: /foo, handler: foo_two }
  - { method: GET, path: "/bar/:id", handler: bar }
"#;

const TABLE_BROKEN: &str = r#"
routes:
  - { method: GET, path: "/foo/<id", handler: broken }
"#;

fn handler_for(shared: &SharedRouter<String>, path: &str) -> Option<String> {
    shared
        .load()
        .find(&Method::GET, path)
        .map(|m| m.payload.clone())
}

fn wait_for<F: Fn() -> bool>(cond: F) -> bool {
    for _ in 0..40 {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    cond()
}

#[test]
fn test_watch_routes_reload() {
    let file = temp_files::create_temp_yaml(TABLE_V1);
    let path = file.path().to_path_buf();
    let shared = Arc::new(SharedRouter::new(load_router(&path).unwrap()));

    let watcher = watch_routes(&path, Arc::clone(&shared)).expect("watch_routes");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(&path, TABLE_V2).unwrap();
    assert!(wait_for(|| handler_for(&shared, "/foo").as_deref() == Some("foo_two")));
    assert_eq!(handler_for(&shared, "/bar/1").as_deref(), Some("bar"));

    drop(watcher);

    // A broken table leaves the current router in place.
    let broken = temp_files::create_temp_yaml(TABLE_BROKEN);
    assert!(reload_routes(broken.path(), &shared).is_err());
    assert_eq!(handler_for(&shared, "/foo").as_deref(), Some("foo_two"));
}
