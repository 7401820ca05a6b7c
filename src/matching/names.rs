//! Renamed-namespace lookup.
//!
//! A [`RenameTable`] maps old scopes to new scopes. A name is governed by an
//! entry when it equals the old name or continues it past a segment
//! boundary. Entries are scanned in reverse lexicographic order of their old
//! names and the first governing entry wins. This is a fixed scan order, not
//! a longest-prefix match: with entries `App\Legacy` and `App\Legacy\Mail`,
//! `App\Legacy\Mail` sorts first and wins for `App\Legacy\Mail\Sender`, but
//! an entry `Vendor` would be tried before `App\...` regardless of length.

use indexmap::IndexMap;
use std::cmp::Reverse;
use thiserror::Error;

use crate::base::constants::NAME_DELIMITER;
use crate::base::{SymbolName, is_governed_by};

/// Invalid rename table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("duplicate rename entry for `{0}`")]
    Duplicate(SymbolName),

    #[error("rename `{old}` -> `{new}` would re-apply to its own output")]
    SelfGoverning { old: SymbolName, new: SymbolName },
}

/// One configured rename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameEntry {
    pub old_name: SymbolName,
    pub new_name: SymbolName,
}

/// A name together with the entry that governs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRename {
    pub current_name: String,
    pub old_name: SymbolName,
    pub new_name: SymbolName,
}

impl ResolvedRename {
    /// `current_name` with its `old_name` prefix replaced by `new_name`.
    ///
    /// A name that is not governed by `old_name` comes back unchanged.
    pub fn name_in_new_scope(&self) -> String {
        if self.new_name.as_str() == self.current_name
            || !is_governed_by(&self.current_name, self.old_name.as_str())
        {
            return self.current_name.clone();
        }
        match self.current_name.strip_prefix(self.old_name.as_str()) {
            Some(rest) => format!("{}{rest}", self.new_name),
            None => self.current_name.clone(),
        }
    }

    /// Whether the rewrite leaves the name untouched.
    pub fn is_identity(&self) -> bool {
        self.name_in_new_scope() == self.current_name
    }
}

/// Immutable table of renames with a precomputed scan order.
#[derive(Clone, Debug, Default)]
pub struct RenameTable {
    entries: IndexMap<SymbolName, SymbolName>,
    /// Indices into `entries`, reverse lexicographic by old name.
    scan_order: Vec<usize>,
}

impl RenameTable {
    /// Build a table. Old names must be unique, and a new name may not be
    /// governed by its own old name.
    pub fn new(entries: impl IntoIterator<Item = RenameEntry>) -> Result<Self, RenameError> {
        let mut map = IndexMap::new();
        for entry in entries {
            if entry.new_name.is_governed_by(&entry.old_name) {
                return Err(RenameError::SelfGoverning {
                    old: entry.old_name,
                    new: entry.new_name,
                });
            }
            if map.contains_key(&entry.old_name) {
                return Err(RenameError::Duplicate(entry.old_name));
            }
            map.insert(entry.old_name, entry.new_name);
        }

        let mut scan_order: Vec<usize> = (0..map.len()).collect();
        scan_order.sort_by_key(|&i| Reverse(map.get_index(i).map(|(old, _)| old.as_str())));

        Ok(Self {
            entries: map,
            scan_order,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in configuration order.
    pub fn entries(&self) -> impl Iterator<Item = (&SymbolName, &SymbolName)> {
        self.entries.iter()
    }

    /// Old names in the order they are tried.
    pub fn scan_order(&self) -> impl Iterator<Item = &SymbolName> {
        self.scan_order
            .iter()
            .filter_map(|&i| self.entries.get_index(i).map(|(old, _)| old))
    }

    /// Find the entry governing `name`, if any.
    pub fn match_renamed_namespace(&self, name: &str) -> Option<ResolvedRename> {
        let current = name.strip_prefix(NAME_DELIMITER).unwrap_or(name);
        self.scan_order.iter().find_map(|&i| {
            let (old, new) = self.entries.get_index(i)?;
            is_governed_by(current, old.as_str()).then(|| ResolvedRename {
                current_name: current.to_string(),
                old_name: old.clone(),
                new_name: new.clone(),
            })
        })
    }
}
