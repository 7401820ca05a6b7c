//! Renames symbols that fall under a renamed namespace.

use smol_str::SmolStr;

use super::{Rule, RuleError};
use crate::base::constants::{MEMBER_DELIMITER, NAME_DELIMITER};
use crate::matching::RenameTable;
use crate::syntax::{NodeKind, Tree};

/// Rewrites namespace declarations, imports, name references and call
/// targets governed by a [`RenameTable`] entry.
#[derive(Clone, Debug)]
pub struct RenameNamespaceRule {
    id: SmolStr,
    table: RenameTable,
}

impl RenameNamespaceRule {
    pub fn new(id: impl Into<SmolStr>, table: RenameTable) -> Self {
        Self {
            id: id.into(),
            table,
        }
    }

    pub fn table(&self) -> &RenameTable {
        &self.table
    }

    /// New spelling of `name`, keeping a leading delimiter if present.
    fn renamed(&self, name: &str) -> Option<SmolStr> {
        let resolved = self.table.match_renamed_namespace(name)?;
        if resolved.is_identity() {
            return None;
        }
        let renamed = resolved.name_in_new_scope();
        Some(if name.starts_with(NAME_DELIMITER) {
            SmolStr::new(format!("{NAME_DELIMITER}{renamed}"))
        } else {
            SmolStr::new(renamed)
        })
    }

    /// New spelling of a constant reference. Class constants
    /// (`\Old\Mail\Client::X`) have their class part renamed; global
    /// constants are renamed as a whole.
    fn renamed_constant(&self, name: &str) -> Option<SmolStr> {
        match name.rsplit_once(MEMBER_DELIMITER) {
            Some((class, member)) => {
                let class = self.renamed(class)?;
                Some(SmolStr::new(format!("{class}{MEMBER_DELIMITER}{member}")))
            }
            None => self.renamed(name),
        }
    }
}

impl Rule for RenameNamespaceRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&self, tree: &mut Tree) -> Result<bool, RuleError> {
        let mut changed = false;
        for id in tree.descendants(tree.root()) {
            let (target, new_name) = match tree.kind_mut(id) {
                NodeKind::Namespace { name }
                | NodeKind::Use { name, .. }
                | NodeKind::NameRef { name } => {
                    let new_name = self.renamed(name.as_str());
                    (name, new_name)
                }
                NodeKind::Call { callee, .. } => {
                    let new_name = self.renamed(callee.as_str());
                    (callee, new_name)
                }
                NodeKind::ConstRef { name } => {
                    let new_name = self.renamed_constant(name.as_str());
                    (name, new_name)
                }
                _ => continue,
            };
            if let Some(new_name) = new_name {
                tracing::trace!("[{}] {} -> {}", self.id, target, new_name);
                *target = new_name;
                changed = true;
            }
        }
        Ok(changed)
    }
}
