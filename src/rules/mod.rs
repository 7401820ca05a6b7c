//! Tree-mutating rules and their path scopes.
//!
//! A [`RuleSet`] is an ordered list of [`ScopedRule`]s. Order is part of the
//! meaning: later rules observe the tree as earlier rules left it, so a
//! rename can feed an argument replacement keyed on the new name.
//!
//! Every rule must be self-terminating: applying it to its own output
//! reports no change.

mod rename_config_key;
mod rename_namespace;
mod replace_argument;
mod scope;

pub use rename_config_key::{KeyRename, KeyRenameError, RenameConfigKeyRule};
pub use rename_namespace::RenameNamespaceRule;
pub use replace_argument::ReplaceArgumentRule;
pub use scope::PathScope;

use smol_str::SmolStr;
use std::path::Path;
use thiserror::Error;

use crate::syntax::Tree;

/// A fault raised inside a rule body.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("{0}")]
    Fault(String),

    #[error("rule panicked: {0}")]
    Panicked(String),
}

impl RuleError {
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }
}

/// One tree rewrite.
pub trait Rule: Send + Sync {
    /// Stable identifier reported in per-document results.
    fn id(&self) -> &str;

    /// Mutate `tree` in place. Returns whether anything changed.
    fn apply(&self, tree: &mut Tree) -> Result<bool, RuleError>;
}

/// A rule together with the documents it applies to.
pub struct ScopedRule {
    scope: PathScope,
    rule: Box<dyn Rule>,
}

impl ScopedRule {
    pub fn new(scope: PathScope, rule: impl Rule + 'static) -> Self {
        Self {
            scope,
            rule: Box::new(rule),
        }
    }

    pub fn id(&self) -> &str {
        self.rule.id()
    }

    pub fn scope(&self) -> &PathScope {
        &self.scope
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    pub fn applies_to(&self, path: &Path) -> bool {
        self.scope.matches(path)
    }
}

impl std::fmt::Debug for ScopedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedRule")
            .field("id", &self.id())
            .field("scope", &self.scope.patterns())
            .finish()
    }
}

/// Ordered, immutable-after-construction list of scoped rules.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<ScopedRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: ScopedRule) {
        self.rules.push(rule);
    }

    pub fn with(mut self, scope: PathScope, rule: impl Rule + 'static) -> Self {
        self.push(ScopedRule::new(scope, rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopedRule> {
        self.rules.iter()
    }

    pub fn ids(&self) -> Vec<SmolStr> {
        self.rules.iter().map(|r| SmolStr::new(r.id())).collect()
    }

    /// Rules applying to `path`, in declared order.
    pub fn matching<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a ScopedRule> + 'a {
        self.rules.iter().filter(move |r| r.applies_to(path))
    }
}
