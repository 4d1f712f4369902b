use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::constraint::{ConstraintCompiler, RegexCompiler};
use super::core::ParamValues;
use super::error::ConfigError;
use super::pattern::{tokenize, ParamKind, PatternSyntax, Token};
use super::radix::{Capture, Node, Order, Piece, NO_ORDER};
use crate::runtime_config::{MatchPriority, RouterConfig};

/// Successful [`Store::get`] result
///
/// `names[i]` labels the value the lookup wrote into slot `i` of the caller's
/// parameter buffer.
#[derive(Debug)]
pub struct Found<'s, T> {
    /// Payload registered with the matching pattern
    pub payload: &'s T,
    /// Parameter names collected along the matching pattern
    pub names: &'s [Arc<str>],
}

// Manual impls: a derive would require `T: Clone`.
impl<T> Clone for Found<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Found<'_, T> {}

/// Outcome of [`Store::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Added {
    pub(crate) params: usize,
    /// `false` when an identical pattern already held a payload
    pub(crate) registered: bool,
}

/// Routing table for one HTTP method
///
/// Owns the root of a radix tree and hands out registration sequence numbers.
/// Patterns are added during start-up through [`Store::add`]; requests are
/// resolved through [`Store::get`], which never mutates the tree and can be
/// called from any number of threads at once.
///
/// # Example
///
/// ```rust
/// use pathtrie::router::{ParamValues, Store};
///
/// let mut store = Store::new();
/// store.add("/users/:id", "get_user").unwrap();
///
/// let mut values = ParamValues::new();
/// let found = store.get("/users/42", &mut values).unwrap();
/// assert_eq!(*found.payload, "get_user");
/// assert_eq!(found.names[0].as_ref(), "id");
/// assert_eq!(values[0], "42");
/// ```
pub struct Store<T, C: ConstraintCompiler = RegexCompiler> {
    root: Node<T, C::Matcher>,
    compiler: C,
    syntax: PatternSyntax,
    wildcard_name: Arc<str>,
    priority: MatchPriority,
    /// Last order handed out
    count: Order,
    routes: usize,
    duplicates: usize,
    max_params: usize,
}

impl<T> Store<T> {
    /// Empty store with the default syntax and the `regex` backed compiler
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&RouterConfig::default())
    }

    /// Empty store using `config` and the `regex` backed compiler
    #[must_use]
    pub fn with_config(config: &RouterConfig) -> Self {
        Self::with_compiler(RegexCompiler, config)
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: ConstraintCompiler> Store<T, C> {
    /// Empty store with an injected constraint compiler
    pub fn with_compiler(compiler: C, config: &RouterConfig) -> Self {
        Self {
            root: Node::root(),
            compiler,
            syntax: config.syntax.clone(),
            wildcard_name: Arc::from(config.wildcard_name.as_str()),
            priority: config.priority,
            count: 0,
            routes: 0,
            duplicates: 0,
            max_params: 0,
        }
    }

    /// Register `pattern` with `payload`.
    ///
    /// Returns the number of parameters the pattern captures, which is the
    /// buffer size a lookup ending on this pattern needs. Registering an
    /// identical pattern again is not an error: the first payload is kept and
    /// the new one is dropped.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the pattern is malformed or a constraint does not
    /// compile. The tree is left untouched in that case.
    pub fn add(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.register(pattern, payload).map(|added| added.params)
    }

    /// [`Store::add`], also telling whether the pattern was new
    pub(crate) fn register(&mut self, pattern: &str, payload: T) -> Result<Added, ConfigError> {
        let tokens = tokenize(pattern, &self.syntax, &self.wildcard_name)?;
        let mut pieces = Vec::with_capacity(tokens.len());
        for token in tokens {
            pieces.push(match token {
                Token::Literal(text) => Piece::Literal(text.as_bytes()),
                Token::Param(token) => {
                    let capture = match &token.kind {
                        ParamKind::Segment => Capture::Segment,
                        ParamKind::Wildcard => Capture::Wildcard,
                        ParamKind::Constrained(source) => {
                            let matcher = self.compiler.compile(source).map_err(|reason| {
                                ConfigError::InvalidConstraint {
                                    pattern: pattern.to_string(),
                                    name: token.name.to_string(),
                                    reason,
                                }
                            })?;
                            Capture::Constrained(matcher)
                        }
                    };
                    Piece::Param { token, capture }
                }
            });
        }

        self.count += 1;
        let order = self.count;
        let inserted = self.root.insert(pieces, payload, order);
        if inserted.registered {
            self.routes += 1;
        } else {
            self.duplicates += 1;
            debug!(
                pattern = %pattern,
                "Duplicate route pattern ignored, first registration kept"
            );
        }
        self.max_params = self.max_params.max(inserted.params);
        Ok(Added {
            params: inserted.params,
            registered: inserted.registered,
        })
    }

    /// Resolve `path`, writing captured values into `values`.
    ///
    /// `values` is grown to [`Store::max_params`] slots when it is shorter.
    /// Returns `None` when no pattern matches the whole path.
    pub fn get<'s, 'p>(&'s self, path: &'p str, values: &mut ParamValues<'p>) -> Option<Found<'s, T>> {
        if values.len() < self.max_params {
            values.resize(self.max_params, "");
        }
        self.root
            .lookup(path, 0, values, NO_ORDER, self.priority)
            .map(|c| Found {
                payload: c.payload,
                names: c.names,
            })
    }

    /// Largest parameter count among the registered patterns
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// Number of distinct patterns holding a payload
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes
    }

    /// `true` when nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }

    /// Number of `add` calls ignored because the pattern was already registered
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of trie nodes, the root included
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Indented rendering of the tree, one node per line
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.root.fmt_tree(&mut out, 0);
        out
    }
}

impl<T, C> Clone for Store<T, C>
where
    T: Clone,
    C: ConstraintCompiler + Clone,
    C::Matcher: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            compiler: self.compiler.clone(),
            syntax: self.syntax.clone(),
            wildcard_name: Arc::clone(&self.wildcard_name),
            priority: self.priority,
            count: self.count,
            routes: self.routes,
            duplicates: self.duplicates,
            max_params: self.max_params,
        }
    }
}

impl<T, C: ConstraintCompiler> fmt::Debug for Store<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("routes", &self.routes)
            .field("duplicates", &self.duplicates)
            .field("max_params", &self.max_params)
            .field("priority", &self.priority)
            .field("nodes", &self.root.node_count())
            .finish()
    }
}
