//! Replaces configured argument values at matching call sites.

use smol_str::SmolStr;
use std::sync::Arc;

use super::{Rule, RuleError};
use crate::matching::{
    ArgumentRewriter, ArgumentSlotResolver, ConstantTable, ReplacementSpec, SignatureProvider,
    ValueFolder, replace_argument,
};
use crate::syntax::{NodeKind, Tree};

/// Applies a list of [`ReplacementSpec`]s to every call in a tree.
///
/// Specs are tried in order against each call; several specs may rewrite
/// different arguments of the same call.
#[derive(Clone)]
pub struct ReplaceArgumentRule {
    id: SmolStr,
    specs: Vec<ReplacementSpec>,
    constants: Arc<ConstantTable>,
    signatures: Arc<dyn SignatureProvider>,
}

impl ReplaceArgumentRule {
    pub fn new(
        id: impl Into<SmolStr>,
        specs: Vec<ReplacementSpec>,
        constants: Arc<ConstantTable>,
        signatures: Arc<dyn SignatureProvider>,
    ) -> Self {
        Self {
            id: id.into(),
            specs,
            constants,
            signatures,
        }
    }

    pub fn specs(&self) -> &[ReplacementSpec] {
        &self.specs
    }
}

impl std::fmt::Debug for ReplaceArgumentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplaceArgumentRule")
            .field("id", &self.id)
            .field("specs", &self.specs)
            .finish_non_exhaustive()
    }
}

impl Rule for ReplaceArgumentRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&self, tree: &mut Tree) -> Result<bool, RuleError> {
        let folder = ValueFolder::new(&self.constants);
        let resolver = ArgumentSlotResolver::new(self.signatures.as_ref(), folder);
        let rewriter = ArgumentRewriter::new(folder);

        let mut changed = false;
        for call in tree.find_all(|kind| matches!(kind, NodeKind::Call { .. })) {
            for spec in &self.specs {
                if replace_argument(&resolver, &rewriter, tree, call, spec) {
                    tracing::trace!(
                        "[{}] {}::{}({}) rewritten",
                        self.id,
                        spec.callee,
                        spec.method,
                        spec.arg_name
                    );
                    changed = true;
                }
            }
        }
        Ok(changed)
    }
}
