//! Slash-separated path algebra
//!
//! Catalog paths, component names and import paths are all handled as an
//! ordered list of segments. Joining never produces empty segments, so a
//! missing nested folder or an empty destination simply disappears from the
//! result instead of leaving `//` behind.

use std::fmt;
use std::path::{Path, PathBuf};

/// Ordered list of non-empty path components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegments(Vec<String>);

impl PathSegments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split on `/` and `\`, dropping empty segments
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(['/', '\\'])
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment (the "base folder" of a catalog destination)
    pub fn base(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Everything after the first segment
    pub fn strip_base(&self) -> Self {
        Self(self.0.iter().skip(1).cloned().collect())
    }

    /// Remove `prefix` if this path starts with it segment-wise
    pub fn strip_prefix(&self, prefix: &PathSegments) -> Option<Self> {
        if self.0.len() < prefix.0.len() || self.0[..prefix.0.len()] != prefix.0[..] {
            return None;
        }
        Some(Self(self.0[prefix.0.len()..].to_vec()))
    }

    /// Split off the last segment: `a/b/widget` -> (`a/b`, `widget`)
    pub fn split_leaf(&self) -> (Self, Option<&str>) {
        match self.0.split_last() {
            Some((leaf, parents)) => (Self(parents.to_vec()), Some(leaf.as_str())),
            None => (Self::new(), None),
        }
    }

    pub fn join(&self, other: &PathSegments) -> Self {
        let mut joined = self.0.clone();
        joined.extend(other.0.iter().cloned());
        Self(joined)
    }

    /// Append one raw piece, which may itself contain separators
    pub fn push(mut self, raw: &str) -> Self {
        self.0.extend(Self::parse(raw).0);
        self
    }

    /// Resolve against a filesystem root
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0.iter().fold(root.to_path_buf(), |path, s| path.join(s))
    }

    /// Forward-slash rendering, as used in import paths
    pub fn to_slash_string(&self) -> String {
        self.0.join("/")
    }
}

impl fmt::Display for PathSegments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slash_string())
    }
}

impl From<&str> for PathSegments {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Extension of a catalog file name including the dot (`.go`), or empty
pub fn extension_of(file: &str) -> String {
    let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_string(),
        _ => String::new(),
    }
}

/// Last segment of a catalog file path
pub fn file_name_of(file: &str) -> &str {
    file.rsplit(['/', '\\']).find(|s| !s.is_empty()).unwrap_or(file)
}
