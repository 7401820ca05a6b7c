//! Path scopes for rules.
//!
//! Path-scope globs use the path dialect: `*` stays within one path segment
//! and `**` crosses directory boundaries. An empty scope matches every
//! document.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Which document paths a rule applies to.
#[derive(Clone, Debug)]
pub struct PathScope {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for PathScope {
    fn default() -> Self {
        Self::everywhere()
    }
}

impl PathScope {
    /// Compile `patterns`. Blank patterns are ignored.
    pub fn new<I, S>(patterns: I) -> Result<Self, globset::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
        }
        Ok(Self {
            set: builder.build()?,
            patterns,
        })
    }

    /// A scope matching every path.
    pub fn everywhere() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns.is_empty() || self.set.is_match(path)
    }
}
