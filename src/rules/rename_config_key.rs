//! Renames obsolete keys in configuration trees.

use smol_str::SmolStr;
use thiserror::Error;

use super::{Rule, RuleError};
use crate::base::constants::CONFIG_KEY_DELIMITER;
use crate::syntax::{NodeId, NodeKind, Tree};

/// Invalid key rename configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KeyRenameError {
    #[error("key path `{0}` has an empty segment")]
    EmptySegment(String),

    #[error("new key `{0}` must be a single non-empty key")]
    InvalidNewKey(String),

    #[error("renaming `{0}` to its own name has no effect")]
    NoOp(String),
}

/// Rename the key addressed by `path` to `new_key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRename {
    path: Vec<SmolStr>,
    new_key: SmolStr,
}

impl KeyRename {
    /// `path` is dotted (`framework.session.handler_id`).
    pub fn new(path: &str, new_key: &str) -> Result<Self, KeyRenameError> {
        let segments: Vec<SmolStr> = path.split(CONFIG_KEY_DELIMITER).map(SmolStr::new).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(KeyRenameError::EmptySegment(path.to_string()));
        }
        if new_key.is_empty() || new_key.contains(CONFIG_KEY_DELIMITER) {
            return Err(KeyRenameError::InvalidNewKey(new_key.to_string()));
        }
        if segments.last().is_some_and(|last| last == new_key) {
            return Err(KeyRenameError::NoOp(path.to_string()));
        }
        Ok(Self {
            path: segments,
            new_key: new_key.into(),
        })
    }

    pub fn path(&self) -> &[SmolStr] {
        &self.path
    }

    pub fn new_key(&self) -> &str {
        &self.new_key
    }
}

/// Applies [`KeyRename`]s in order. A rename whose new key already exists
/// next to the old one is skipped with a warning.
#[derive(Clone, Debug)]
pub struct RenameConfigKeyRule {
    id: SmolStr,
    renames: Vec<KeyRename>,
}

impl RenameConfigKeyRule {
    pub fn new(id: impl Into<SmolStr>, renames: Vec<KeyRename>) -> Self {
        Self {
            id: id.into(),
            renames,
        }
    }
}

fn find_entry(tree: &Tree, mapping: NodeId, key: &str) -> Option<NodeId> {
    if !matches!(tree.kind(mapping), NodeKind::Mapping) {
        return None;
    }
    tree.children(mapping)
        .iter()
        .copied()
        .find(|&child| matches!(tree.kind(child), NodeKind::Entry { key: k } if k == key))
}

/// The entry addressed by `path`, walking mappings from the root.
fn resolve_path(tree: &Tree, path: &[SmolStr]) -> Option<NodeId> {
    let (last, parents) = path.split_last()?;
    let mut mapping = tree.root();
    for key in parents {
        let entry = find_entry(tree, mapping, key)?;
        mapping = tree.only_child(entry)?;
    }
    find_entry(tree, mapping, last)
}

impl Rule for RenameConfigKeyRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&self, tree: &mut Tree) -> Result<bool, RuleError> {
        let mut changed = false;
        for rename in &self.renames {
            let Some(entry) = resolve_path(tree, &rename.path) else {
                continue;
            };
            let Some(mapping) = tree.parent(entry) else {
                continue;
            };
            if find_entry(tree, mapping, &rename.new_key).is_some() {
                tracing::warn!(
                    "[{}] not renaming `{}`: key `{}` already exists",
                    self.id,
                    rename.path.join("."),
                    rename.new_key
                );
                continue;
            }
            if let NodeKind::Entry { key } = tree.kind_mut(entry) {
                *key = rename.new_key.clone();
                changed = true;
            }
        }
        Ok(changed)
    }
}
