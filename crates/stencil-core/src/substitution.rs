//! Ordered literal placeholder substitution
//!
//! Pairs are applied one after the other, each as a literal
//! replace-all over the whole content. A pair never re-scans its own
//! replacement text, but it does see text introduced by earlier pairs.

use std::fmt;

/// Ordered list of `(target, replacement)` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: impl Into<String>, replacement: impl Into<String>) {
        self.pairs.push((target.into(), replacement.into()));
    }

    pub fn with(mut self, target: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.push(target, replacement);
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Rewrite `content`, pair by pair, left to right
    ///
    /// Empty targets are skipped.
    pub fn apply(&self, content: &str) -> String {
        self.pairs
            .iter()
            .filter(|(target, _)| !target.is_empty())
            .fold(content.to_string(), |text, (target, replacement)| {
                text.replace(target.as_str(), replacement)
            })
    }
}

impl fmt::Display for Substitutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .pairs
            .iter()
            .map(|(t, r)| format!("{:?} -> {:?}", t, r))
            .collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}
