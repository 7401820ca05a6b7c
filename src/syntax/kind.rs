//! Node kinds for source and configuration trees.

use smol_str::SmolStr;
use std::fmt;

/// A literal scalar value.
///
/// Equality is strict: an integer never equals a float or a string with the
/// same digits.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    /// Integer above `i64::MAX`.
    UInt(u64),
    Float(f64),
    Str(SmolStr),
}

impl Scalar {
    pub fn str(value: impl Into<SmolStr>) -> Self {
        Self::Str(value.into())
    }

    /// Human-readable type name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) | Scalar::UInt(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::UInt(u) => write!(f, "{u}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// The kind of a tree node.
///
/// One closed set covers both document families so that every rule matches
/// exhaustively.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // Source documents
    SourceFile,
    Namespace { name: SmolStr },
    Use { name: SmolStr, alias: Option<SmolStr> },
    ClassDecl { name: SmolStr },
    NameRef { name: SmolStr },
    /// A call of `method` on `callee`; children are `Argument` nodes.
    Call { callee: SmolStr, method: SmolStr },
    /// One argument; `name` is set for named bindings. Exactly one child,
    /// the value expression.
    Argument { name: Option<SmolStr> },

    // Value expressions
    Literal(Scalar),
    Null,
    Array,
    /// Reference to a named constant (`App\Mode::STRICT`).
    ConstRef { name: SmolStr },
    /// Concatenation of its children, left to right.
    Concat,
    /// A runtime value that cannot be folded.
    Variable { name: SmolStr },

    // Configuration documents
    Mapping,
    /// A key of a mapping; exactly one child, the value.
    Entry { key: SmolStr },
    Sequence,
}

impl NodeKind {
    /// Short tag used by the tree dump.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::SourceFile => "source-file",
            NodeKind::Namespace { .. } => "namespace",
            NodeKind::Use { .. } => "use",
            NodeKind::ClassDecl { .. } => "class",
            NodeKind::NameRef { .. } => "name",
            NodeKind::Call { .. } => "call",
            NodeKind::Argument { .. } => "arg",
            NodeKind::Literal(_) => "lit",
            NodeKind::Null => "null",
            NodeKind::Array => "array",
            NodeKind::ConstRef { .. } => "const",
            NodeKind::Concat => "concat",
            NodeKind::Variable { .. } => "var",
            NodeKind::Mapping => "map",
            NodeKind::Entry { .. } => "entry",
            NodeKind::Sequence => "seq",
        }
    }

    /// Whether this kind can appear as a value expression.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal(_)
                | NodeKind::Null
                | NodeKind::Array
                | NodeKind::ConstRef { .. }
                | NodeKind::Concat
                | NodeKind::Variable { .. }
                | NodeKind::Mapping
                | NodeKind::Sequence
        )
    }
}
