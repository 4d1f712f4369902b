//! # Route Table Module
//!
//! Loads a routing table from a YAML or TOML file and builds a [`Router`] whose
//! payloads are handler names.
//!
//! ## File Format
//!
//! ```yaml
//! config:
//!   priority: static_first
//! routes:
//!   - { method: GET, path: "/users/:id", handler: get_user }
//!   - { method: GET, path: "/files/*", handler: serve_file }
//! ```
//!
//! The same structure in TOML uses `[config]` and `[[routes]]`. The `config`
//! section is optional; see [`RouterConfig`] for its keys. Environment
//! overrides (`PATHTRIE_*`) are applied on top of it when a router is built.

use anyhow::{bail, Context};
use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::router::{ConfigError, Router};
use crate::runtime_config::RouterConfig;

/// One `(method, path, handler)` line of a route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// HTTP method, case-insensitive (`GET`, `post`, ...)
    pub method: String,
    /// Route pattern
    pub path: String,
    /// Handler name returned on a match
    pub handler: String,
}

/// Parsed route table file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub config: RouterConfig,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Why a table entry could not be registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    InvalidMethod(String),
    Pattern(ConfigError),
}

/// A rejected entry, with its zero-based position in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProblem {
    pub index: usize,
    pub entry: RouteEntry,
    pub kind: ProblemKind,
}

impl fmt::Display for TableProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "route #{} ({} {} -> {}): ",
            self.index, self.entry.method, self.entry.path, self.entry.handler
        )?;
        match &self.kind {
            ProblemKind::InvalidMethod(m) => write!(f, "invalid HTTP method '{m}'"),
            ProblemKind::Pattern(e) => write!(f, "{e}"),
        }
    }
}

impl RouteTable {
    /// Parse a YAML table
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML route table")
    }

    /// Parse a TOML table
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse TOML route table")
    }

    /// Table config with `PATHTRIE_*` environment overrides applied
    #[must_use]
    pub fn effective_config(&self) -> RouterConfig {
        self.config.clone().with_env_overrides()
    }

    /// Register every entry into a router built with `config`.
    ///
    /// Returns the router together with the entries that were rejected. Rejected
    /// entries never leave partial state behind in the router.
    pub fn register(&self, config: RouterConfig) -> (Router<String>, Vec<TableProblem>) {
        let mut router = Router::with_config(config);
        let mut problems = Vec::new();

        for (index, entry) in self.routes.iter().enumerate() {
            let kind = match parse_method(&entry.method) {
                Ok(method) => match router.add(method, &entry.path, entry.handler.clone()) {
                    Ok(_) => continue,
                    Err(e) => ProblemKind::Pattern(e),
                },
                Err(_) => ProblemKind::InvalidMethod(entry.method.clone()),
            };
            debug!(index, method = %entry.method, path = %entry.path, "Route entry rejected");
            problems.push(TableProblem {
                index,
                entry: entry.clone(),
                kind,
            });
        }
        (router, problems)
    }

    /// Every problem in the table, without stopping at the first one
    #[must_use]
    pub fn check(&self) -> Vec<TableProblem> {
        self.register(self.effective_config()).1
    }

    /// Build a router, failing on the first rejected entry.
    pub fn build_router(&self) -> anyhow::Result<Router<String>> {
        let (router, problems) = self.register(self.effective_config());
        if let Some(first) = problems.first() {
            bail!(
                "{first}{}",
                match problems.len() {
                    1 => String::new(),
                    n => format!(" (and {} more)", n - 1),
                }
            );
        }
        Ok(router)
    }
}

/// Case-insensitive HTTP method, surrounding whitespace ignored
pub(crate) fn parse_method(raw: &str) -> Result<Method, http::method::InvalidMethod> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
}

/// Read and parse a route table; the format follows the file extension
/// (`.toml`, otherwise YAML).
pub fn load_table(path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route table {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    let table = if is_toml {
        RouteTable::from_toml_str(&content)
    } else {
        RouteTable::from_yaml_str(&content)
    };
    table.with_context(|| format!("Invalid route table {}", path.display()))
}

/// Load a table file and build its router
pub fn load_router(path: impl AsRef<Path>) -> anyhow::Result<Router<String>> {
    let path = path.as_ref();
    let router = load_table(path)?
        .build_router()
        .with_context(|| format!("Failed to build router from {}", path.display()))?;
    info!(
        path = %path.display(),
        routes = router.routes().len(),
        "Route table loaded"
    );
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_config::MatchPriority;

    const YAML: &str = r#"
config:
  priority: registration
routes:
  - { method: get, path: "/users/:id", handler: get_user }
  - { method: GET, path: /users/new, handler: new_user }
"#;

    #[test]
    fn yaml_table_with_config() {
        let table = RouteTable::from_yaml_str(YAML).unwrap();
        assert_eq!(table.config.priority, MatchPriority::Registration);
        assert_eq!(table.routes.len(), 2);

        let (router, problems) = table.register(table.config.clone());
        assert!(problems.is_empty());
        // Registration priority: the earlier parametric route wins.
        let m = router.find(&Method::GET, "/users/new").unwrap();
        assert_eq!(m.payload, "get_user");
    }

    #[test]
    fn toml_table_without_config() {
        let table = RouteTable::from_toml_str(
            r#"
[[routes]]
method = "POST"
path = "/users"
handler = "create_user"
"#,
        )
        .unwrap();
        assert_eq!(table.config, RouterConfig::default());
        let (router, problems) = table.register(RouterConfig::default());
        assert!(problems.is_empty());
        assert_eq!(router.find(&Method::POST, "/users").unwrap().payload, "create_user");
    }

    #[test]
    fn check_reports_every_problem() {
        let table = RouteTable::from_yaml_str(
            r#"
routes:
  - { method: GET, path: /ok, handler: ok }
  - { method: "G T", path: /bad-method, handler: a }
  - { method: GET, path: "/items/<id", handler: b }
  - { method: GET, path: "/items/<id:[>", handler: c }
"#,
        )
        .unwrap();
        let problems = table.register(RouterConfig::default()).1;
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[0].index, 1);
        assert!(matches!(problems[0].kind, ProblemKind::InvalidMethod(_)));
        assert!(matches!(
            problems[1].kind,
            ProblemKind::Pattern(ConfigError::UnclosedParam { .. })
        ));
        assert!(matches!(
            problems[2].kind,
            ProblemKind::Pattern(ConfigError::InvalidConstraint { .. })
        ));
        assert!(problems[0].to_string().starts_with("route #1 (G T /bad-method -> a)"));
    }

    #[test]
    fn build_router_fails_on_bad_entry() {
        let table = RouteTable::from_yaml_str(
            "routes:\n  - { method: GET, path: nope, handler: x }\n",
        )
        .unwrap();
        let err = table.build_router().unwrap_err();
        assert!(err.to_string().contains("must start with '/'"), "{err}");
    }
}
