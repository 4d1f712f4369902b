//! Copy-on-write router handle.
//!
//! A [`Router`] is built once and then only read. When routes have to change
//! while requests are being served, a new router is built off to the side and
//! swapped in atomically; in-flight lookups keep using the router they loaded.

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;

use super::constraint::{ConstraintCompiler, RegexCompiler};
use super::core::Router;

/// Atomically replaceable [`Router`] for hot-path reads
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use pathtrie::router::{Router, SharedRouter};
///
/// let mut v1 = Router::new();
/// v1.get("/health", "v1").unwrap();
/// let shared = SharedRouter::new(v1);
///
/// let mut v2 = Router::new();
/// v2.get("/health", "v2").unwrap();
/// shared.replace(v2);
///
/// let router = shared.load();
/// assert_eq!(*router.find(&Method::GET, "/health").unwrap().payload, "v2");
/// ```
pub struct SharedRouter<T, C: ConstraintCompiler = RegexCompiler> {
    inner: ArcSwap<Router<T, C>>,
}

impl<T, C: ConstraintCompiler> SharedRouter<T, C> {
    /// Wrap a built router
    pub fn new(router: Router<T, C>) -> Self {
        Self {
            inner: ArcSwap::from_pointee(router),
        }
    }

    /// Current router, for one request. Cheap; does not clone the table.
    #[inline]
    pub fn load(&self) -> Guard<Arc<Router<T, C>>> {
        self.inner.load()
    }

    /// Current router as an owned `Arc`, for holding across a longer scope
    #[must_use]
    pub fn load_full(&self) -> Arc<Router<T, C>> {
        self.inner.load_full()
    }

    /// Swap in `router`, returning the one it replaces
    pub fn replace(&self, router: Router<T, C>) -> Arc<Router<T, C>> {
        self.inner.swap(Arc::new(router))
    }
}

impl<T, C> SharedRouter<T, C>
where
    T: Clone,
    C: ConstraintCompiler + Clone,
    C::Matcher: Clone,
{
    /// Clone the current router, let `f` modify the copy, then swap it in.
    ///
    /// Nothing is swapped when `f` fails. Concurrent `update` calls are not
    /// serialised against each other; callers that update from several threads
    /// must hold their own lock around this call.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns.
    pub fn update<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut Router<T, C>) -> Result<(), E>,
    {
        let mut next = Router::clone(&self.inner.load());
        f(&mut next)?;
        self.inner.store(Arc::new(next));
        Ok(())
    }
}

impl<T, C: ConstraintCompiler> From<Router<T, C>> for SharedRouter<T, C> {
    fn from(router: Router<T, C>) -> Self {
        Self::new(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::ConfigError;
    use http::Method;
    use std::thread;

    #[test]
    fn update_adds_routes_without_disturbing_loaded_snapshot() {
        let mut router = Router::new();
        router.get("/a", "a".to_string()).unwrap();
        let shared = SharedRouter::new(router);

        let before = shared.load_full();
        shared
            .update(|r| r.get("/b", "b".to_string()).map(|_| ()))
            .unwrap();

        assert!(before.find(&Method::GET, "/b").is_none());
        let after = shared.load();
        assert_eq!(after.find(&Method::GET, "/a").unwrap().payload, "a");
        assert_eq!(after.find(&Method::GET, "/b").unwrap().payload, "b");
    }

    #[test]
    fn failed_update_keeps_current_router() {
        let mut router = Router::new();
        router.get("/a", 1u32).unwrap();
        let shared = SharedRouter::new(router);

        let result: Result<(), ConfigError> = shared.update(|r| {
            r.get("/b", 2)?;
            r.get("/c/<id:[>", 3)?;
            Ok(())
        });
        assert!(result.is_err());
        assert!(shared.load().find(&Method::GET, "/b").is_none());
    }

    #[test]
    fn concurrent_readers_see_a_complete_router() {
        let mut router = Router::new();
        router.get("/items/:id", 1u32).unwrap();
        let shared = Arc::new(SharedRouter::new(router));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let router = shared.load();
                        let m = router.find(&Method::GET, "/items/9").unwrap();
                        assert!(*m.payload == 1 || *m.payload == 2);
                        assert_eq!(m.get_path_param("id"), Some("9"));
                    }
                })
            })
            .collect();

        let mut next = Router::new();
        next.get("/items/:id", 2u32).unwrap();
        shared.replace(next);

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(*shared.load().find(&Method::GET, "/items/9").unwrap().payload, 2);
    }
}
