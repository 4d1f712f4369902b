use std::fmt;

/// Route registration error
///
/// Returned by `Store::add` / `Router::add` when a pattern cannot be turned into
/// trie nodes. These are configuration errors: they surface while the routing
/// table is being built and never at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The pattern does not start with `/`
    MissingLeadingSlash {
        /// The offending pattern
        pattern: String,
    },
    /// A bracketed parameter was opened but never closed (e.g. `/users/<id`)
    UnclosedParam {
        /// The offending pattern
        pattern: String,
        /// Byte offset of the opening delimiter
        position: usize,
    },
    /// A closing delimiter appeared without a matching opening one
    UnmatchedClose {
        /// The offending pattern
        pattern: String,
        /// Byte offset of the stray closing delimiter
        position: usize,
    },
    /// A parameter token has no name (`/users/:` or `/users/<:\d+>`)
    EmptyParamName {
        /// The offending pattern
        pattern: String,
        /// Byte offset of the token
        position: usize,
    },
    /// The wildcard is not the last token of the pattern
    MisplacedWildcard {
        /// The offending pattern
        pattern: String,
        /// Byte offset of the wildcard
        position: usize,
    },
    /// A parameter constraint failed to compile
    InvalidConstraint {
        /// The offending pattern
        pattern: String,
        /// Parameter carrying the constraint
        name: String,
        /// Compiler diagnostic
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingLeadingSlash { pattern } => {
                write!(f, "route pattern '{}' must start with '/'", pattern)
            }
            ConfigError::UnclosedParam { pattern, position } => write!(
                f,
                "route pattern '{}': parameter opened at byte {} is never closed",
                pattern, position
            ),
            ConfigError::UnmatchedClose { pattern, position } => write!(
                f,
                "route pattern '{}': closing delimiter at byte {} has no matching opening delimiter",
                pattern, position
            ),
            ConfigError::EmptyParamName { pattern, position } => write!(
                f,
                "route pattern '{}': parameter at byte {} has an empty name",
                pattern, position
            ),
            ConfigError::MisplacedWildcard { pattern, position } => write!(
                f,
                "route pattern '{}': wildcard at byte {} must be the last token",
                pattern, position
            ),
            ConfigError::InvalidConstraint {
                pattern,
                name,
                reason,
            } => write!(
                f,
                "route pattern '{}': constraint for parameter '{}' does not compile: {}",
                pattern, name, reason
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_pattern() {
        let err = ConfigError::UnclosedParam {
            pattern: "/users/<id".to_string(),
            position: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("/users/<id"));
        assert!(msg.contains("byte 7"));
    }

    #[test]
    fn invalid_constraint_carries_reason() {
        let err = ConfigError::InvalidConstraint {
            pattern: "/items/<id:[>".to_string(),
            name: "id".to_string(),
            reason: "unclosed character class".to_string(),
        };
        assert!(err.to_string().contains("unclosed character class"));
        assert!(err.to_string().contains("'id'"));
    }
}
