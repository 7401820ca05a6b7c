//! Argument slot resolution and rewriting.
//!
//! Resolution is two-phase:
//!
//! 1. **Named first** - a named argument called `arg_name` is authoritative.
//!    If its value is not equivalent to the old value the call does not
//!    match, and positional lookup is never attempted.
//! 2. **Positional fallback** - only when no such named argument exists, the
//!    declared parameter list locates the slot by position.
//!
//! Rewriting fails closed: an out-of-range slot, a binding-kind mismatch or
//! an inequivalent value leaves the tree untouched.

use smol_str::SmolStr;
use thiserror::Error;

use super::signature::SignatureProvider;
use super::value::{ArgumentValue, ValueFolder, materialize, values_equal};
use crate::base::constants::NAME_DELIMITER;
use crate::base::{SymbolName, is_identifier};
use crate::syntax::{NodeId, NodeKind, Tree};

/// How an argument is bound at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Named,
    Positional,
}

/// The argument a replacement targets in one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentSlot {
    pub position: usize,
    pub binding: BindingKind,
    pub arg_name: SmolStr,
}

/// Invalid replacement configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplacementError {
    #[error("`{0}` is not a valid method name")]
    InvalidMethod(String),

    #[error("`{0}` is not a valid argument name")]
    InvalidArgument(String),

    #[error("old value of `{0}` contains an unresolved expression")]
    UnresolvedOld(String),

    #[error("new value of `{0}` contains an unresolved expression")]
    UnresolvedNew(String),

    #[error("old and new values of `{0}` are equal")]
    NoOp(String),
}

/// "Replace `old_value` with `new_value` in argument `arg_name` of
/// `callee::method`."
#[derive(Clone, Debug, PartialEq)]
pub struct ReplacementSpec {
    pub callee: SymbolName,
    pub method: SmolStr,
    pub arg_name: SmolStr,
    pub old_value: ArgumentValue,
    pub new_value: ArgumentValue,
}

impl ReplacementSpec {
    pub fn new(
        callee: SymbolName,
        method: &str,
        arg_name: &str,
        old_value: ArgumentValue,
        new_value: ArgumentValue,
    ) -> Result<Self, ReplacementError> {
        if !is_identifier(method) {
            return Err(ReplacementError::InvalidMethod(method.to_string()));
        }
        if !is_identifier(arg_name) {
            return Err(ReplacementError::InvalidArgument(arg_name.to_string()));
        }
        let label = format!("{callee}::{method}({arg_name})");
        if !old_value.is_resolved() {
            return Err(ReplacementError::UnresolvedOld(label));
        }
        if !new_value.is_resolved() {
            return Err(ReplacementError::UnresolvedNew(label));
        }
        if values_equal(&old_value, &new_value) {
            return Err(ReplacementError::NoOp(label));
        }
        Ok(Self {
            callee,
            method: method.into(),
            arg_name: arg_name.into(),
            old_value,
            new_value,
        })
    }

    /// Whether `call` is a call of this spec's `callee::method`.
    pub fn targets(&self, tree: &Tree, call: NodeId) -> bool {
        match tree.kind(call) {
            NodeKind::Call { callee, method } => {
                callee.trim_start_matches(NAME_DELIMITER) == self.callee.as_str()
                    && *method == self.method
            }
            _ => false,
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Locates the argument slot a [`ReplacementSpec`] targets.
#[derive(Clone, Copy)]
pub struct ArgumentSlotResolver<'a> {
    signatures: &'a dyn SignatureProvider,
    folder: ValueFolder<'a>,
}

impl<'a> ArgumentSlotResolver<'a> {
    pub fn new(signatures: &'a dyn SignatureProvider, folder: ValueFolder<'a>) -> Self {
        Self { signatures, folder }
    }

    /// Resolve the slot of `spec.arg_name` in `call`.
    ///
    /// A named slot is returned only when its value already matches
    /// `spec.old_value`. A positional slot is returned whenever the position
    /// exists and is positionally bound; its value is checked by
    /// [`ArgumentRewriter::rewrite`].
    pub fn resolve_slot(
        &self,
        tree: &Tree,
        call: NodeId,
        spec: &ReplacementSpec,
    ) -> Option<ArgumentSlot> {
        if !matches!(tree.kind(call), NodeKind::Call { .. }) {
            return None;
        }
        let args = tree.children(call);

        for (position, &arg) in args.iter().enumerate() {
            let NodeKind::Argument { name: Some(name) } = tree.kind(arg) else {
                continue;
            };
            if *name != spec.arg_name {
                continue;
            }
            let value = tree.only_child(arg)?;
            if !self.folder.matches(tree, value, &spec.old_value) {
                tracing::trace!(
                    "named argument `{}` of {}::{} has a different value",
                    spec.arg_name,
                    spec.callee,
                    spec.method
                );
                return None;
            }
            return Some(ArgumentSlot {
                position,
                binding: BindingKind::Named,
                arg_name: spec.arg_name.clone(),
            });
        }

        let Some(params) = self
            .signatures
            .resolve_parameters(spec.callee.as_str(), &spec.method)
        else {
            tracing::trace!("no signature for {}::{}", spec.callee, spec.method);
            return None;
        };
        let position = params.iter().find(|p| p.name == spec.arg_name)?.position;
        let &arg = args.get(position)?;
        match tree.kind(arg) {
            NodeKind::Argument { name: None } => Some(ArgumentSlot {
                position,
                binding: BindingKind::Positional,
                arg_name: spec.arg_name.clone(),
            }),
            _ => None,
        }
    }
}

// ============================================================================
// REWRITING
// ============================================================================

/// Swaps the value bound in a resolved slot.
#[derive(Clone, Copy)]
pub struct ArgumentRewriter<'a> {
    folder: ValueFolder<'a>,
}

impl<'a> ArgumentRewriter<'a> {
    pub fn new(folder: ValueFolder<'a>) -> Self {
        Self { folder }
    }

    /// Replace the value in `slot` with `spec.new_value`, keeping the
    /// binding kind (a named argument keeps its name). Returns the call on
    /// success and `None` without touching the tree otherwise.
    pub fn rewrite(
        &self,
        tree: &mut Tree,
        call: NodeId,
        slot: &ArgumentSlot,
        spec: &ReplacementSpec,
    ) -> Option<NodeId> {
        let &arg = tree.children(call).get(slot.position)?;
        let bound = match tree.kind(arg) {
            NodeKind::Argument { name: Some(name) } => {
                slot.binding == BindingKind::Named && *name == slot.arg_name
            }
            NodeKind::Argument { name: None } => slot.binding == BindingKind::Positional,
            _ => false,
        };
        if !bound {
            return None;
        }

        let value = tree.only_child(arg)?;
        if !self.folder.matches(tree, value, &spec.old_value) {
            return None;
        }
        let replacement = materialize(tree, &spec.new_value)?;
        tree.replace(value, replacement).then_some(call)
    }
}

/// Resolve and rewrite in one step. Returns true when `call` changed.
pub fn replace_argument(
    resolver: &ArgumentSlotResolver<'_>,
    rewriter: &ArgumentRewriter<'_>,
    tree: &mut Tree,
    call: NodeId,
    spec: &ReplacementSpec,
) -> bool {
    if !spec.targets(tree, call) {
        return false;
    }
    match resolver.resolve_slot(tree, call, spec) {
        Some(slot) => rewriter.rewrite(tree, call, &slot, spec).is_some(),
        None => false,
    }
}
