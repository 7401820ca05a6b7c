//! Exclusion of hierarchical names from reports.
//!
//! Patterns use the name-exclusion glob dialect: every character except `*`
//! is literal, and `*` matches any run of characters *including* the `\`
//! delimiter. Patterns match whole names. This is not the
//! path-scope dialect used to scope rules to documents.

use indexmap::IndexMap;
use regex::RegexSet;

/// Compiled exclusion patterns.
#[derive(Clone, Debug)]
pub struct ExcludeFilter {
    patterns: Vec<String>,
    set: RegexSet,
}

impl Default for ExcludeFilter {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: RegexSet::empty(),
        }
    }
}

/// Translate one glob into an anchored regular expression.
fn glob_to_regex(pattern: &str) -> String {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^(?s:{body})$")
}

impl ExcludeFilter {
    /// Compile `patterns` in order. Blank patterns are ignored; every other
    /// pattern is kept verbatim, surrounding whitespace included.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .filter(|p| !p.as_ref().trim().is_empty())
            .map(|p| p.as_ref().to_string())
            .collect();
        let set = RegexSet::new(patterns.iter().map(|p| glob_to_regex(p)))?;
        Ok(Self { patterns, set })
    }

    /// The source patterns, blanks removed.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    /// Keep non-excluded names, preserving order.
    pub fn filter_list<S: AsRef<str> + Clone>(&self, names: &[S]) -> Vec<S> {
        names
            .iter()
            .filter(|n| !self.is_excluded(n.as_ref()))
            .cloned()
            .collect()
    }

    /// Filter a target → dependents map.
    ///
    /// Entries whose target is excluded are dropped. Surviving entries lose
    /// their excluded dependents, and an entry left with no dependents is
    /// dropped as well.
    pub fn filter_grouped<S: AsRef<str> + Clone + std::hash::Hash + Eq>(
        &self,
        grouped: &IndexMap<S, Vec<S>>,
    ) -> IndexMap<S, Vec<S>> {
        grouped
            .iter()
            .filter(|(target, _)| !self.is_excluded(target.as_ref()))
            .filter_map(|(target, dependents)| {
                let kept = self.filter_list(dependents);
                (!kept.is_empty()).then(|| (target.clone(), kept))
            })
            .collect()
    }
}
