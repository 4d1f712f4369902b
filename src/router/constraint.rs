//! Parameter constraints.
//!
//! The trie does not know how to evaluate regular expressions. It is handed a
//! [`ConstraintCompiler`] when the store is created and asks it to compile each
//! `<name:source>` constraint once, at registration time. The compiled
//! [`ParamMatcher`] is stored on the parametric node and consulted on lookup.

use regex::Regex;

/// A compiled constraint attached to a parametric node.
pub trait ParamMatcher {
    /// Length in bytes of the match anchored at the start of `text`, or `None`
    /// when the constraint does not match there.
    fn match_anchored(&self, text: &str) -> Option<usize>;
}

/// Compiles constraint sources into matchers.
pub trait ConstraintCompiler {
    /// The compiled form kept on the node
    type Matcher: ParamMatcher;

    /// Compile `source`, returning a human readable reason on failure.
    fn compile(&self, source: &str) -> Result<Self::Matcher, String>;
}

/// Default compiler backed by the `regex` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCompiler;

/// A regex anchored at position 0 of the text it is matched against.
#[derive(Debug, Clone)]
pub struct AnchoredRegex(Regex);

impl AnchoredRegex {
    /// The anchored source that was compiled
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl ConstraintCompiler for RegexCompiler {
    type Matcher = AnchoredRegex;

    fn compile(&self, source: &str) -> Result<AnchoredRegex, String> {
        // `^(?:...)` keeps alternations like `a|b` anchored as a whole.
        Regex::new(&format!("^(?:{source})"))
            .map(AnchoredRegex)
            .map_err(|e| e.to_string())
    }
}

impl ParamMatcher for AnchoredRegex {
    #[inline]
    fn match_anchored(&self, text: &str) -> Option<usize> {
        self.0.find(text).map(|m| m.end())
    }
}
