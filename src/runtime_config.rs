//! # Runtime Configuration Module
//!
//! Settings that shape how patterns are parsed and how ambiguous lookups are
//! resolved. A [`RouterConfig`] usually comes from the `config` section of a
//! route table file and can be overridden from the environment.
//!
//! ## Environment Variables
//!
//! ### `PATHTRIE_PRIORITY`
//!
//! `static_first` (default) or `registration`. See [`MatchPriority`].
//!
//! ### `PATHTRIE_SLOW_MATCH_US`
//!
//! Lookups slower than this many microseconds are logged at `warn` level.
//! Accepts decimal (`1000`) or hexadecimal (`0x3e8`). Default: `1000`.
//!
//! ## Example
//!
//! ```rust
//! use pathtrie::runtime_config::{MatchPriority, RouterConfig};
//!
//! let config = RouterConfig::default().with_overrides(|key| match key {
//!     "PATHTRIE_PRIORITY" => Some("registration".to_string()),
//!     _ => None,
//! });
//! assert_eq!(config.priority, MatchPriority::Registration);
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::router::PatternSyntax;

/// Default slow-lookup threshold in microseconds
pub const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// How a lookup chooses between several patterns matching the same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPriority {
    /// At each node an exact terminal beats a static child, which beats
    /// parametric children; parametric siblings are ranked by registration order.
    /// `/users/new` wins over `/users/:id` whichever was registered first.
    #[default]
    StaticFirst,
    /// The earliest registered matching pattern wins, whatever its shape.
    Registration,
}

impl FromStr for MatchPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static_first" | "static-first" | "static" => Ok(MatchPriority::StaticFirst),
            "registration" | "order" => Ok(MatchPriority::Registration),
            other => Err(format!("unknown match priority '{other}'")),
        }
    }
}

impl fmt::Display for MatchPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPriority::StaticFirst => f.write_str("static_first"),
            MatchPriority::Registration => f.write_str("registration"),
        }
    }
}

/// Router construction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Parameter delimiters
    pub syntax: PatternSyntax,
    /// Tie-break rule for overlapping patterns
    pub priority: MatchPriority,
    /// Name under which a trailing wildcard's capture is reported
    pub wildcard_name: String,
    /// Lookups slower than this (microseconds) are logged at `warn`
    pub slow_match_us: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            syntax: PatternSyntax::default(),
            priority: MatchPriority::default(),
            wildcard_name: "*".to_string(),
            slow_match_us: DEFAULT_SLOW_MATCH_US,
        }
    }
}

impl RouterConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `PATHTRIE_*` environment variables on top of `self`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Unparseable values are ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(priority) = lookup("PATHTRIE_PRIORITY").and_then(|v| v.parse().ok()) {
            self.priority = priority;
        }
        if let Some(us) = lookup("PATHTRIE_SLOW_MATCH_US").and_then(|v| parse_number(&v)) {
            self.slow_match_us = us;
        }
        self
    }
}

fn parse_number(val: &str) -> Option<u64> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
