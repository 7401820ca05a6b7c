//! Value equivalence for argument rewriting.
//!
//! Comparison is total but conservative: anything that cannot be proven
//! equal compares unequal, and [`ArgumentValue::Unresolved`] never equals
//! anything, itself included.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::syntax::{NodeId, NodeKind, Scalar, Tree};

/// A value bound to an argument, resolved as far as constant folding allows.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentValue {
    Scalar(Scalar),
    Null,
    Array(Vec<ArgumentValue>),
    /// Runtime-dependent or unfoldable expression.
    Unresolved,
}

impl ArgumentValue {
    pub fn str(value: impl Into<SmolStr>) -> Self {
        Self::Scalar(Scalar::str(value))
    }

    /// Whether this value, and every element of it, is resolved.
    pub fn is_resolved(&self) -> bool {
        match self {
            ArgumentValue::Scalar(_) | ArgumentValue::Null => true,
            ArgumentValue::Array(items) => items.iter().all(ArgumentValue::is_resolved),
            ArgumentValue::Unresolved => false,
        }
    }
}

/// Structural equality with the conservative rules above.
pub fn values_equal(a: &ArgumentValue, b: &ArgumentValue) -> bool {
    match (a, b) {
        (ArgumentValue::Scalar(x), ArgumentValue::Scalar(y)) => x == y,
        (ArgumentValue::Null, ArgumentValue::Null) => true,
        (ArgumentValue::Array(xs), ArgumentValue::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}

// ============================================================================
// CONSTANT FOLDING
// ============================================================================

/// Known values of named constants (`App\Mode::STRICT` → `"strict"`).
#[derive(Clone, Debug, Default)]
pub struct ConstantTable {
    values: FxHashMap<SmolStr, ArgumentValue>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<SmolStr>, value: ArgumentValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Folds value-expression nodes into [`ArgumentValue`]s.
#[derive(Clone, Copy, Debug)]
pub struct ValueFolder<'a> {
    constants: &'a ConstantTable,
}

impl<'a> ValueFolder<'a> {
    pub fn new(constants: &'a ConstantTable) -> Self {
        Self { constants }
    }

    /// Fold the expression rooted at `id`. Anything that is not a literal,
    /// null, array, known constant or constant concatenation is unresolved.
    pub fn fold(&self, tree: &Tree, id: NodeId) -> ArgumentValue {
        match tree.kind(id) {
            NodeKind::Literal(scalar) => ArgumentValue::Scalar(scalar.clone()),
            NodeKind::Null => ArgumentValue::Null,
            NodeKind::Array | NodeKind::Sequence => ArgumentValue::Array(
                tree.children(id)
                    .iter()
                    .map(|&child| self.fold(tree, child))
                    .collect(),
            ),
            NodeKind::ConstRef { name } => self
                .constants
                .get(name.trim_start_matches(crate::base::constants::NAME_DELIMITER))
                .cloned()
                .unwrap_or(ArgumentValue::Unresolved),
            NodeKind::Concat => self.fold_concat(tree, id),
            _ => ArgumentValue::Unresolved,
        }
    }

    /// Equivalence of the expression at `id` with `expected`.
    pub fn matches(&self, tree: &Tree, id: NodeId, expected: &ArgumentValue) -> bool {
        values_equal(&self.fold(tree, id), expected)
    }

    fn fold_concat(&self, tree: &Tree, id: NodeId) -> ArgumentValue {
        let mut out = String::new();
        for &part in tree.children(id) {
            match self.fold(tree, part) {
                ArgumentValue::Scalar(Scalar::Str(s)) => out.push_str(&s),
                ArgumentValue::Scalar(Scalar::Int(i)) => out.push_str(&i.to_string()),
                ArgumentValue::Scalar(Scalar::UInt(u)) => out.push_str(&u.to_string()),
                _ => return ArgumentValue::Unresolved,
            }
        }
        ArgumentValue::str(out)
    }
}

/// Build nodes for `value` in `tree` and return the detached root.
///
/// Returns `None` for unresolved values, which have no tree form.
pub fn materialize(tree: &mut Tree, value: &ArgumentValue) -> Option<NodeId> {
    match value {
        ArgumentValue::Scalar(scalar) => Some(tree.alloc(NodeKind::Literal(scalar.clone()))),
        ArgumentValue::Null => Some(tree.alloc(NodeKind::Null)),
        ArgumentValue::Array(items) => {
            let array = tree.alloc(NodeKind::Array);
            for item in items {
                let child = materialize(tree, item)?;
                tree.attach(array, child);
            }
            Some(array)
        }
        ArgumentValue::Unresolved => None,
    }
}
