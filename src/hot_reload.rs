//! # Hot Reload Module
//!
//! Watches a route table file and swaps a freshly built router into a
//! [`SharedRouter`] whenever the file changes, without interrupting lookups.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pathtrie::{hot_reload::watch_routes, router::SharedRouter, table::load_router};
//! use std::sync::Arc;
//!
//! let shared = Arc::new(SharedRouter::new(load_router("routes.yaml")?));
//! let _watcher = watch_routes("routes.yaml", Arc::clone(&shared))?;
//! // keep `_watcher` alive for as long as reloads should happen
//! ```
//!
//! ## Error Handling
//!
//! If the new table fails to parse or contains a bad pattern:
//! - The error is logged at `warn`
//! - The previous router remains active
//!
//! Saving a half-edited file therefore never takes routes away.

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::router::SharedRouter;
use crate::table::load_router;

/// Rebuild the router from `path` and swap it into `shared`.
///
/// On failure `shared` is left untouched and the error is returned.
pub fn reload_routes(path: &Path, shared: &SharedRouter<String>) -> anyhow::Result<usize> {
    let router = load_router(path)?;
    let count = router.routes().len();
    router.log_summary();
    shared.replace(router);
    Ok(count)
}

/// Watch a route table file and rebuild the shared router when it changes.
pub fn watch_routes<P>(
    table_path: P,
    shared: Arc<SharedRouter<String>>,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
{
    let path: PathBuf = table_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match reload_routes(&watch_path, &shared) {
                        Ok(routes) => info!(
                            path = %watch_path.display(),
                            routes,
                            "hot-reload: route table applied"
                        ),
                        Err(e) => warn!(
                            path = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous routes"
                        ),
                    }
                }
            }
            Err(e) => warn!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use http::Method;
    use std::io::Write;

    #[test]
    fn reload_failure_keeps_previous_router() {
        let mut router = Router::new();
        router.get("/health", "v1".to_string()).unwrap();
        let shared = SharedRouter::new(router);

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "routes:\n  - {{ method: GET, path: \"/x/<id\", handler: x }}").unwrap();

        assert!(reload_routes(file.path(), &shared).is_err());
        let current = shared.load();
        assert_eq!(current.find(&Method::GET, "/health").unwrap().payload, "v1");
    }

    #[test]
    fn reload_success_swaps_router() {
        let shared = SharedRouter::new(Router::new());
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "routes:\n  - {{ method: GET, path: /health, handler: v2 }}").unwrap();

        assert_eq!(reload_routes(file.path(), &shared).unwrap(), 1);
        assert_eq!(shared.load().find(&Method::GET, "/health").unwrap().payload, "v2");
    }
}
